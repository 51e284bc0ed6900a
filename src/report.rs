//! Report rendering: human-readable option report or make.conf overrides.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

use tracing::debug;

use crate::aggregate::{OptionStatus, OptionSummary};

/// Write the text report.
///
/// Verbosity: 0 prints only the summary lines, 1 adds package lists for
/// always-on/off options, 2 also lists unchanged options.
pub fn write_report<W: Write>(
    out: &mut W,
    options: &[OptionSummary],
    verbose: u8,
) -> io::Result<()> {
    debug!("generating report");

    for option in options {
        write_drift_warning(out, option, false)?;

        match option.status {
            OptionStatus::Unchanged => {
                if verbose >= 2 {
                    writeln!(out, "{}: unchanged", option.name)?;
                }
            }
            OptionStatus::AlwaysEnabled => {
                writeln!(out, "{}: enabled in all packages", option.name)?;
                if verbose >= 1 {
                    writeln!(out, "  {}", package_list(&option.packages_on))?;
                }
            }
            OptionStatus::AlwaysDisabled => {
                writeln!(out, "{}: disabled in all packages", option.name)?;
                if verbose >= 1 {
                    writeln!(out, "  {}", package_list(&option.packages_off))?;
                }
            }
            OptionStatus::Mixed => {
                writeln!(out, "{}: mixed status", option.name)?;
                for (label, packages) in [
                    ("overridden to ON", &option.overridden_on),
                    ("overridden to OFF", &option.overridden_off),
                    ("left ON as default", &option.left_on),
                    ("left OFF as default", &option.left_off),
                ] {
                    if !packages.is_empty() {
                        writeln!(out, "  {label}")?;
                        writeln!(out, "    {}", package_list(packages))?;
                    }
                }
            }
        }
    }

    Ok(())
}

/// Write make.conf override directives.
///
/// `origins` maps package name to origin; the aggregates themselves no
/// longer carry origin information.
pub fn write_make_conf<W: Write>(
    out: &mut W,
    options: &[OptionSummary],
    origins: &BTreeMap<String, String>,
) -> io::Result<()> {
    debug!("generating make.conf");

    writeln!(out, "# options list generated by portopts")?;

    for option in options {
        write_drift_warning(out, option, true)?;

        match option.status {
            OptionStatus::Unchanged => {
                writeln!(out, "# {}: unchanged, {}", option.name, override_summary(option))?;
            }
            OptionStatus::AlwaysEnabled => {
                writeln!(
                    out,
                    "OPTIONS_SET+=\t{}  # {}",
                    option.name,
                    override_summary(option)
                )?;
            }
            OptionStatus::AlwaysDisabled => {
                writeln!(
                    out,
                    "OPTIONS_UNSET+=\t{}  # {}",
                    option.name,
                    override_summary(option)
                )?;
            }
            OptionStatus::Mixed => {
                writeln!(
                    out,
                    "# {}: mixed status, {}",
                    option.name,
                    override_summary(option)
                )?;
                write_mixed_conditionals(out, option, origins)?;
            }
        }
    }

    writeln!(out, "# end generated options list")?;
    Ok(())
}

// When exactly one package disagrees with two or more on the other side,
// one conditional excluding the minority origin covers everybody else;
// otherwise each overriding package gets its own block.
fn write_mixed_conditionals<W: Write>(
    out: &mut W,
    option: &OptionSummary,
    origins: &BTreeMap<String, String>,
) -> io::Result<()> {
    if option.packages_on.len() == 1 && option.packages_off.len() > 1 {
        if let Some(origin) = minority_origin(&option.packages_on, origins) {
            write_guarded(out, "!=", origin, "OPTIONS_UNSET", &option.name)?;
        }
    } else if option.packages_off.len() == 1 && option.packages_on.len() > 1 {
        if let Some(origin) = minority_origin(&option.packages_off, origins) {
            write_guarded(out, "!=", origin, "OPTIONS_SET", &option.name)?;
        }
    } else {
        for package in &option.overridden_on {
            if let Some(origin) = origins.get(package) {
                write_guarded(out, "==", origin, "OPTIONS_SET", &option.name)?;
            }
        }
        for package in &option.overridden_off {
            if let Some(origin) = origins.get(package) {
                write_guarded(out, "==", origin, "OPTIONS_UNSET", &option.name)?;
            }
        }
    }
    Ok(())
}

fn minority_origin<'a>(
    packages: &BTreeSet<String>,
    origins: &'a BTreeMap<String, String>,
) -> Option<&'a String> {
    packages.iter().next().and_then(|package| origins.get(package))
}

fn write_guarded<W: Write>(
    out: &mut W,
    operator: &str,
    origin: &str,
    directive: &str,
    option: &str,
) -> io::Result<()> {
    writeln!(
        out,
        ".if \"${{.CURDIR:H:T}}/${{.CURDIR:T}}\" {operator} \"{origin}\""
    )?;
    writeln!(out, "{directive}+=\t{option}")?;
    writeln!(out, ".endif")
}

fn write_drift_warning<W: Write>(
    out: &mut W,
    option: &OptionSummary,
    as_comment: bool,
) -> io::Result<()> {
    if option.packages_default_bad.is_empty() {
        return Ok(());
    }
    if as_comment {
        writeln!(out, "# {}: exists in port, but not in package", option.name)
    } else {
        writeln!(
            out,
            "{}: exists in port, but not in package (bad port or package should be rebuilt)",
            option.name
        )?;
        writeln!(out, "  {}", package_list(&option.packages_default_bad))
    }
}

fn package_list(packages: &BTreeSet<String>) -> String {
    packages
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn override_summary(option: &OptionSummary) -> String {
    let mut parts = Vec::new();
    if !option.overridden_on.is_empty() {
        parts.push(format!("enabled manually: {}", package_list(&option.overridden_on)));
    }
    if !option.left_on.is_empty() {
        parts.push(format!("enabled by default: {}", package_list(&option.left_on)));
    }
    if !option.overridden_off.is_empty() {
        parts.push(format!("disabled manually: {}", package_list(&option.overridden_off)));
    }
    if !option.left_off.is_empty() {
        parts.push(format!("disabled by default: {}", package_list(&option.left_off)));
    }
    parts.join("; ")
}
