//! Option aggregation: groups per-package option states by option name
//! across the whole package set and classifies each option.
//!
//! This is pure set algebra over in-memory data. Accumulation walks every
//! package once, filing package names into per-option sets; classification
//! then derives a status and the override partition for each option. The
//! same input always produces the same output.

use std::collections::{BTreeMap, BTreeSet};

use crate::collect::InstalledPackage;

/// Aggregate status of one option across all declaring packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionStatus {
    /// Every package that has the option on has it on by default.
    Unchanged,
    /// On in every declaring package, default or not.
    AlwaysEnabled,
    /// Off in every declaring package.
    AlwaysDisabled,
    /// On in some packages, off in others.
    Mixed,
}

/// Fully classified aggregate for one option name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSummary {
    pub name: String,
    pub status: OptionStatus,

    /// Packages with the option currently on.
    pub packages_on: BTreeSet<String>,
    /// Packages with the option currently off.
    pub packages_off: BTreeSet<String>,
    /// Packages declaring the option that have it default-on.
    pub packages_default: BTreeSet<String>,
    /// Packages whose port claims a default for an option the installed
    /// package does not declare at all.
    pub packages_default_bad: BTreeSet<String>,

    /// On, but not by default: an explicit enable.
    pub overridden_on: BTreeSet<String>,
    /// Default-on, but currently off: an explicit disable.
    pub overridden_off: BTreeSet<String>,
    /// On because that is the default.
    pub left_on: BTreeSet<String>,
    /// Off and not default-on.
    pub left_off: BTreeSet<String>,
}

#[derive(Debug, Default)]
struct Tally {
    packages_on: BTreeSet<String>,
    packages_off: BTreeSet<String>,
    packages_default: BTreeSet<String>,
    packages_default_bad: BTreeSet<String>,
}

impl Tally {
    fn into_summary(self, name: String) -> OptionSummary {
        let status = if self.packages_on == self.packages_default {
            OptionStatus::Unchanged
        } else if self.packages_off.is_empty() {
            OptionStatus::AlwaysEnabled
        } else if self.packages_on.is_empty() {
            OptionStatus::AlwaysDisabled
        } else {
            OptionStatus::Mixed
        };

        let overridden_on = &self.packages_on - &self.packages_default;
        let overridden_off = &self.packages_default - &self.packages_on;
        let left_on = &self.packages_default & &self.packages_on;
        let left_off = &self.packages_off - &self.packages_default;

        OptionSummary {
            name,
            status,
            packages_on: self.packages_on,
            packages_off: self.packages_off,
            packages_default: self.packages_default,
            packages_default_bad: self.packages_default_bad,
            overridden_on,
            overridden_off,
            left_on,
            left_off,
        }
    }
}

/// Aggregate and classify every option observed across `packages`.
///
/// The result is ordered lexicographically by option name, with one entry
/// per distinct option.
pub fn aggregate_options(packages: &[InstalledPackage]) -> Vec<OptionSummary> {
    let mut tallies: BTreeMap<String, Tally> = BTreeMap::new();

    for package in packages {
        for (option, &on) in &package.options {
            let tally = tallies.entry(option.clone()).or_default();
            if on {
                tally.packages_on.insert(package.name.clone());
            } else {
                tally.packages_off.insert(package.name.clone());
            }
        }

        for option in &package.default_options {
            let tally = tallies.entry(option.clone()).or_default();
            if package.options.contains_key(option) {
                tally.packages_default.insert(package.name.clone());
            } else {
                tally.packages_default_bad.insert(package.name.clone());
            }
        }
    }

    tallies
        .into_iter()
        .map(|(name, tally)| tally.into_summary(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn package(
        name: &str,
        origin: &str,
        options: &[(&str, bool)],
        defaults: &[&str],
    ) -> InstalledPackage {
        InstalledPackage {
            name: name.to_string(),
            origin: origin.to_string(),
            flavor: None,
            options: options
                .iter()
                .map(|&(option, on)| (option.to_string(), on))
                .collect(),
            default_options: defaults.iter().map(|&option| option.to_string()).collect(),
        }
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|&name| name.to_string()).collect()
    }

    fn summary<'a>(options: &'a [OptionSummary], name: &str) -> &'a OptionSummary {
        options
            .iter()
            .find(|option| option.name == name)
            .unwrap_or_else(|| panic!("no aggregate for {name}"))
    }

    mod classification {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn unchanged_when_on_matches_default() {
            let packages = vec![package("a-1.0", "cat/a", &[("SSL", true)], &["SSL"])];
            let options = aggregate_options(&packages);
            assert_eq!(summary(&options, "SSL").status, OptionStatus::Unchanged);
        }

        #[test]
        fn unchanged_wins_over_always_enabled() {
            // both predicates hold; the equality check is evaluated first
            let packages = vec![
                package("a-1.0", "cat/a", &[("FOO", true)], &["FOO"]),
                package("b-1.0", "cat/b", &[("FOO", true)], &["FOO"]),
            ];
            let options = aggregate_options(&packages);
            assert_eq!(summary(&options, "FOO").status, OptionStatus::Unchanged);
        }

        #[test]
        fn unchanged_even_with_packages_left_off() {
            let packages = vec![
                package("a-1.0", "cat/a", &[("SSL", true)], &["SSL"]),
                package("b-1.0", "cat/b", &[("SSL", false)], &[]),
            ];
            let options = aggregate_options(&packages);
            let ssl = summary(&options, "SSL");
            assert_eq!(ssl.status, OptionStatus::Unchanged);
            assert_eq!(ssl.left_off, set(&["b-1.0"]));
        }

        #[test]
        fn always_enabled_when_no_package_has_it_off() {
            let packages = vec![
                package("a-1.0", "cat/a", &[("FOO", true)], &["FOO"]),
                package("c-1.0", "cat/c", &[("FOO", true)], &[]),
            ];
            let options = aggregate_options(&packages);
            let foo = summary(&options, "FOO");
            assert_eq!(foo.status, OptionStatus::AlwaysEnabled);
            assert_eq!(foo.overridden_on, set(&["c-1.0"]));
        }

        #[test]
        fn always_disabled_when_no_package_has_it_on() {
            let packages = vec![
                package("a-1.0", "cat/a", &[("X11", false)], &["X11"]),
                package("b-1.0", "cat/b", &[("X11", false)], &[]),
            ];
            let options = aggregate_options(&packages);
            assert_eq!(summary(&options, "X11").status, OptionStatus::AlwaysDisabled);
        }

        #[test]
        fn mixed_when_split_both_ways() {
            let packages = vec![
                package("a-1.0", "cat/a", &[("SSL", true)], &["SSL"]),
                package("b-1.0", "cat/b", &[("SSL", false)], &["SSL"]),
            ];
            let options = aggregate_options(&packages);
            let ssl = summary(&options, "SSL");
            assert_eq!(ssl.status, OptionStatus::Mixed);
            assert_eq!(ssl.overridden_off, set(&["b-1.0"]));
            assert_eq!(ssl.left_on, set(&["a-1.0"]));
        }

        #[test]
        fn enabled_against_empty_defaults_is_always_enabled() {
            let packages = vec![package("c-1.0", "cat/c", &[("FOO", true)], &[])];
            let options = aggregate_options(&packages);
            let foo = summary(&options, "FOO");
            assert_eq!(foo.status, OptionStatus::AlwaysEnabled);
            assert_eq!(foo.overridden_on, set(&["c-1.0"]));
        }

        #[test]
        fn exactly_one_status_per_option() {
            let packages = vec![
                package(
                    "a-1.0",
                    "cat/a",
                    &[("P", true), ("Q", true), ("R", false), ("S", true)],
                    &["P", "R"],
                ),
                package(
                    "b-1.0",
                    "cat/b",
                    &[("P", true), ("Q", false), ("R", false), ("S", false)],
                    &["P", "S"],
                ),
            ];
            for option in aggregate_options(&packages) {
                let declaring = &option.packages_on | &option.packages_off;
                match option.status {
                    OptionStatus::Unchanged => {
                        assert_eq!(option.packages_on, option.packages_default)
                    }
                    OptionStatus::AlwaysEnabled => {
                        assert_ne!(option.packages_on, option.packages_default);
                        assert!(option.packages_off.is_empty());
                        assert_eq!(option.packages_on, declaring);
                    }
                    OptionStatus::AlwaysDisabled => {
                        assert!(option.packages_on.is_empty());
                        assert_eq!(option.packages_off, declaring);
                    }
                    OptionStatus::Mixed => {
                        assert!(!option.packages_on.is_empty());
                        assert!(!option.packages_off.is_empty());
                    }
                }
            }
        }
    }

    mod set_invariants {
        use super::*;
        use pretty_assertions::assert_eq;

        fn sample() -> Vec<InstalledPackage> {
            vec![
                package(
                    "a-1.0",
                    "cat/a",
                    &[("SSL", true), ("DOCS", true), ("DEBUG", false)],
                    &["SSL", "DOCS"],
                ),
                package(
                    "b-1.0",
                    "cat/b",
                    &[("SSL", false), ("DEBUG", true)],
                    &["SSL"],
                ),
                package("c-1.0", "cat/c", &[("SSL", true)], &[]),
            ]
        }

        #[test]
        fn on_and_off_partition_declaring_packages() {
            for option in aggregate_options(&sample()) {
                assert!(option.packages_on.is_disjoint(&option.packages_off));
            }
            let options = aggregate_options(&sample());
            let ssl = summary(&options, "SSL");
            assert_eq!(
                &ssl.packages_on | &ssl.packages_off,
                set(&["a-1.0", "b-1.0", "c-1.0"])
            );
        }

        #[test]
        fn overridden_on_and_left_on_partition_packages_on() {
            for option in aggregate_options(&sample()) {
                assert!(option.overridden_on.is_disjoint(&option.left_on));
                assert_eq!(&option.overridden_on | &option.left_on, option.packages_on);
            }
        }

        #[test]
        fn override_categories_cover_on_and_defaulted_packages() {
            for option in aggregate_options(&sample()) {
                let covered = &(&option.overridden_on | &option.overridden_off) | &option.left_on;
                assert_eq!(covered, &option.packages_on | &option.packages_default);
                assert!(option.overridden_off.is_disjoint(&option.packages_on));
            }
        }

        #[test]
        fn optionless_packages_never_appear() {
            // the collector never emits such records; an empty options map
            // contributes nothing even if one slips through
            let mut packages = sample();
            packages.push(package("ghost-1.0", "cat/ghost", &[], &[]));
            for option in aggregate_options(&packages) {
                assert!(!option.packages_on.contains("ghost-1.0"));
                assert!(!option.packages_off.contains("ghost-1.0"));
                assert!(!option.packages_default.contains("ghost-1.0"));
                assert!(!option.packages_default_bad.contains("ghost-1.0"));
            }
        }
    }

    mod drift {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn recipe_only_options_go_to_default_bad() {
            let packages = vec![package(
                "a-1.0",
                "cat/a",
                &[("SSL", true)],
                &["SSL", "BAR"],
            )];
            let options = aggregate_options(&packages);
            let bar = summary(&options, "BAR");
            assert_eq!(bar.packages_default_bad, set(&["a-1.0"]));
            assert!(bar.packages_on.is_empty());
            assert!(bar.packages_off.is_empty());
            assert!(bar.packages_default.is_empty());
        }

        #[test]
        fn drifted_package_still_counts_for_its_declared_options() {
            let packages = vec![
                package("a-1.0", "cat/a", &[("SSL", true)], &["SSL", "BAR"]),
                package("b-1.0", "cat/b", &[("BAR", false)], &[]),
            ];
            let options = aggregate_options(&packages);
            let bar = summary(&options, "BAR");
            assert_eq!(bar.packages_default_bad, set(&["a-1.0"]));
            assert_eq!(bar.packages_off, set(&["b-1.0"]));
            // b-1.0 is off without a default claim, so no override either
            assert_eq!(bar.left_off, set(&["b-1.0"]));
            assert_eq!(bar.status, OptionStatus::Unchanged);
        }
    }

    mod determinism {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn output_is_sorted_by_option_name() {
            let packages = vec![package(
                "a-1.0",
                "cat/a",
                &[("ZLIB", true), ("ALSA", false), ("MANPAGES", true)],
                &[],
            )];
            let names: Vec<String> = aggregate_options(&packages)
                .into_iter()
                .map(|option| option.name)
                .collect();
            assert_eq!(names, vec!["ALSA", "MANPAGES", "ZLIB"]);
        }

        #[test]
        fn rerun_over_same_records_is_identical() {
            let packages = vec![
                package("a-1.0", "cat/a", &[("SSL", true), ("DOCS", true)], &["SSL"]),
                package("b-1.0", "cat/b", &[("SSL", false)], &["SSL", "BAR"]),
            ];
            assert_eq!(aggregate_options(&packages), aggregate_options(&packages));
        }

        #[test]
        fn no_packages_no_options() {
            assert_eq!(aggregate_options(&[]), vec![]);
        }
    }
}
