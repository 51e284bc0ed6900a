//! Per-package collection: joins the package database and the ports tree
//! into one record per installed package that declares options.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::pkg::PackageSource;
use crate::ports::RecipeSource;

/// Options treated as default-on whenever a package declares them,
/// regardless of what the port reports. The ports framework enables these
/// globally, so introspecting OPTIONS_DEFAULT does not surface them.
pub const IMPLICIT_DEFAULT_OPTIONS: &[&str] = &["DOCS", "NLS", "EXAMPLES", "IPV6"];

const OPTIONS_DEFAULT_VAR: &str = "OPTIONS_DEFAULT";

/// One installed package with its current options and port defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    pub name: String,
    pub origin: String,
    pub flavor: Option<String>,
    /// Current on/off state of every option the package declares.
    pub options: BTreeMap<String, bool>,
    /// Options the port declares default-on for this origin and flavor.
    pub default_options: BTreeSet<String>,
}

/// Start collecting installed packages.
///
/// Runs the global package listing query up front; failure there fails the
/// whole run. The returned iterator performs the per-package queries
/// lazily, one package per pull, and skips packages without options.
pub fn installed_packages<'a, P, R>(packages: &'a P, recipes: &'a R) -> Result<PackageIter<'a, P, R>>
where
    P: PackageSource,
    R: RecipeSource,
{
    debug!("getting list of packages");
    let listing = packages.list()?;
    Ok(PackageIter {
        packages,
        recipes,
        remaining: listing.into_iter(),
    })
}

/// Lazy iterator over [`InstalledPackage`] records.
pub struct PackageIter<'a, P, R> {
    packages: &'a P,
    recipes: &'a R,
    remaining: std::vec::IntoIter<(String, String)>,
}

impl<P, R> PackageIter<'_, P, R>
where
    P: PackageSource,
    R: RecipeSource,
{
    fn lookup(&self, name: String, origin: String) -> Result<Option<InstalledPackage>> {
        debug!("gathering package information for {} ({})", name, origin);

        let options = self.packages.options(&name)?;

        // optionless packages cannot contribute to the report; skip them
        // before the slow make invocation
        if options.is_empty() {
            return Ok(None);
        }

        let annotations = self.packages.annotations(&name)?;
        let flavor = annotations.get("flavor").cloned();

        let mut env = Vec::new();
        if let Some(flavor) = flavor.as_deref() {
            env.push(("FLAVOR", flavor));
        }

        let mut default_options: BTreeSet<String> =
            match self.recipes.variable(&origin, OPTIONS_DEFAULT_VAR, &env) {
                Ok(value) => value.split_whitespace().map(str::to_string).collect(),
                Err(failure @ Error::CommandFailed { .. }) => {
                    // the true default is unknowable here; assume whatever
                    // is currently on and keep going
                    error!(
                        "cannot get default options for {} ({}) via ports: {}",
                        name, origin, failure
                    );
                    options
                        .iter()
                        .filter(|&(_, &on)| on)
                        .map(|(option, _)| option.clone())
                        .collect()
                }
                Err(failure) => return Err(failure),
            };

        for &option in IMPLICIT_DEFAULT_OPTIONS {
            if options.contains_key(option) {
                default_options.insert(option.to_string());
            }
        }

        Ok(Some(InstalledPackage {
            name,
            origin,
            flavor,
            options,
            default_options,
        }))
    }
}

impl<P, R> Iterator for PackageIter<'_, P, R>
where
    P: PackageSource,
    R: RecipeSource,
{
    type Item = Result<InstalledPackage>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (name, origin) = self.remaining.next()?;
            match self.lookup(name, origin) {
                Ok(Some(package)) => return Some(Ok(package)),
                Ok(None) => continue,
                Err(failure) => return Some(Err(failure)),
            }
        }
    }
}
