//! Error types for external utility invocations.

use thiserror::Error;

/// Result type alias for portopts operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while querying the package database or the ports tree
#[derive(Error, Debug)]
pub enum Error {
    /// An external utility exited with a non-zero status.
    #[error("\"{command}\" returned {code}{}", diagnostic_suffix(.stderr))]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    /// An external utility could not be started at all.
    #[error("failed to execute \"{command}\": {source}")]
    Exec {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A query produced a line that does not split into key and value.
    #[error("unexpected output line {line:?} from \"{command}\"")]
    UnexpectedOutput { command: String, line: String },
}

fn diagnostic_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": \"{stderr}\"")
    }
}
