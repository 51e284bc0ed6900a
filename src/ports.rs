//! Adapter for the ports tree, queried through make(1).

use std::path::PathBuf;
use std::process::Command;

use crate::error::Result;
use crate::exec;

/// Read-only view of the build recipe tree.
pub trait RecipeSource {
    /// Evaluate a make variable for the given origin.
    ///
    /// `env` entries are applied on top of the inherited environment of
    /// the spawned process.
    fn variable(&self, origin: &str, name: &str, env: &[(&str, &str)]) -> Result<String>;
}

/// [`RecipeSource`] backed by running make(1) inside the ports tree.
pub struct Ports {
    binary: PathBuf,
    ports_path: PathBuf,
}

impl Ports {
    pub fn new(binary: impl Into<PathBuf>, ports_path: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            ports_path: ports_path.into(),
        }
    }
}

impl RecipeSource for Ports {
    fn variable(&self, origin: &str, name: &str, env: &[(&str, &str)]) -> Result<String> {
        let mut command = Command::new(&self.binary);
        command
            .arg("-C")
            .arg(self.ports_path.join(origin))
            .arg("-V")
            .arg(name);
        for (key, value) in env {
            command.env(key, value);
        }
        exec::run(&mut command)
    }
}
