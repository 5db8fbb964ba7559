//! Error types for the CLI runtime.

use std::io;
use std::path::PathBuf;

use priv8_syntax::SyntaxError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("no target file specified; use --file <PATH>")]
    MissingTarget,
    #[error("file '{}' does not exist", path.display())]
    MissingFile { path: PathBuf },
    #[error("failed to read file '{}': {source}", path.display())]
    ReadSource { path: PathBuf, source: io::Error },
    #[error("failed to write sanitized file '{}': {source}", path.display())]
    WriteOutput { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to serialise report: {0}")]
    SerialiseReport(serde_json::Error),
    #[error("failed to write output: {0}")]
    Emit(io::Error),
}

impl AppError {
    /// Returns true for clap's `--help` pseudo-errors, which are not failures.
    pub(crate) fn is_help_request(&self) -> bool {
        matches!(
            self,
            Self::CliUsage(error) if error.kind() == clap::error::ErrorKind::DisplayHelp
        )
    }
}
