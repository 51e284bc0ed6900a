//! Aggregate build option settings across installed FreeBSD packages.
//!
//! Every installed package's build options are correlated against the
//! defaults its port declares, then grouped by option name across the
//! whole package set. The result shows which options are consistently
//! enabled, consistently disabled, or mixed, and can be emitted as
//! make.conf override directives.
//!
//! # Architecture
//!
//! One linear pipeline, one pass:
//!
//! - [`pkg`]: queries the installed package database via pkg(8)
//! - [`ports`]: queries option defaults from the ports tree via make(1)
//! - [`collect`]: joins both sources into per-package records
//! - [`aggregate`]: groups and classifies options across all packages
//! - [`report`]: renders the text report or make.conf overrides
//!
//! Both external collaborators sit behind traits ([`PackageSource`],
//! [`RecipeSource`]) so the pipeline can be exercised without a live
//! package database or ports tree.

pub mod aggregate;
pub mod collect;
pub mod error;
mod exec;
pub mod pkg;
pub mod ports;
pub mod report;

pub use aggregate::{aggregate_options, OptionStatus, OptionSummary};
pub use collect::{installed_packages, InstalledPackage, PackageIter, IMPLICIT_DEFAULT_OPTIONS};
pub use error::{Error, Result};
pub use pkg::{PackageSource, Pkg};
pub use ports::{Ports, RecipeSource};
pub use report::{write_make_conf, write_report};
