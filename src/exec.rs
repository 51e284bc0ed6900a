//! Helpers for running external utilities and capturing their output.

use std::process::Command;

use crate::error::{Error, Result};

/// Render a command line the way it appears in diagnostics.
pub(crate) fn render(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run a command and return its trimmed standard output.
///
/// A non-zero exit maps to [`Error::CommandFailed`] carrying the rendered
/// command line, the exit code and the first line of standard error. A
/// child killed by a signal reports code -1.
pub(crate) fn run(command: &mut Command) -> Result<String> {
    let rendered = render(command);

    let output = command.output().map_err(|source| Error::Exec {
        command: rendered.clone(),
        source,
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::CommandFailed {
            command: rendered,
            code: output.status.code().unwrap_or(-1),
            stderr: stderr.lines().next().unwrap_or_default().trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Run a command and split its output into lines; empty output yields no lines.
pub(crate) fn run_lines(command: &mut Command) -> Result<Vec<String>> {
    let stdout = run(command)?;
    if stdout.is_empty() {
        return Ok(Vec::new());
    }
    Ok(stdout.lines().map(str::to_string).collect())
}
