//! Adapter for the installed package database, queried via pkg(8).

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Command;

use crate::error::{Error, Result};
use crate::exec;

/// Read-only view of the installed package database.
pub trait PackageSource {
    /// All installed packages as `(name, origin)` pairs.
    fn list(&self) -> Result<Vec<(String, String)>>;

    /// The named package's build options and their current on/off state.
    fn options(&self, package: &str) -> Result<BTreeMap<String, bool>>;

    /// The named package's annotations.
    fn annotations(&self, package: &str) -> Result<BTreeMap<String, String>>;
}

/// [`PackageSource`] backed by the pkg(8) utility.
pub struct Pkg {
    binary: PathBuf,
}

impl Pkg {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn query_pairs(&self, args: &[&str]) -> Result<Vec<(String, String)>> {
        let mut command = Command::new(&self.binary);
        command.arg("query").args(args);
        let rendered = exec::render(&command);
        let lines = exec::run_lines(&mut command)?;
        parse_pairs(&rendered, lines)
    }
}

impl PackageSource for Pkg {
    fn list(&self) -> Result<Vec<(String, String)>> {
        self.query_pairs(&["%n %o"])
    }

    fn options(&self, package: &str) -> Result<BTreeMap<String, bool>> {
        Ok(self
            .query_pairs(&["%Ok %Ov", package])?
            .into_iter()
            .map(|(option, state)| (option, state == "on"))
            .collect())
    }

    fn annotations(&self, package: &str) -> Result<BTreeMap<String, String>> {
        Ok(self.query_pairs(&["%At %Av", package])?.into_iter().collect())
    }
}

/// Split query output lines on the first whitespace into key/value pairs.
fn parse_pairs(command: &str, lines: Vec<String>) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::with_capacity(lines.len());
    for line in lines {
        let Some((key, value)) = line.split_once(char::is_whitespace) else {
            return Err(Error::UnexpectedOutput {
                command: command.to_string(),
                line,
            });
        };
        pairs.push((key.to_string(), value.trim_start().to_string()));
    }
    Ok(pairs)
}
