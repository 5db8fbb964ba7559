//! CLI argument definitions for the priv8 scanner.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use priv8_config::ConfigArgs;

/// Suffix appended to the target path when `--output` is omitted.
pub(crate) const SANITIZED_SUFFIX: &str = ".sanitized";

/// Rendering selected for the findings report.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub(crate) enum ReportFormat {
    /// Aligned text for terminals.
    #[default]
    Human,
    /// A single pretty-printed JSON document.
    Json,
}

/// Command-line interface for the priv8 scanner.
#[derive(Parser, Debug)]
#[command(
    name = "priv8",
    about = "Detects sensitive data in shell scripts using syntax-aware queries"
)]
pub(crate) struct Cli {
    /// Prints version information and exits.
    #[arg(long)]
    pub(crate) version: bool,
    /// Target file to analyse.
    #[arg(long, value_name = "PATH")]
    pub(crate) file: Option<PathBuf>,
    /// Destination for the sanitized copy (default: `<file>.sanitized`).
    #[arg(long, value_name = "PATH")]
    pub(crate) output: Option<PathBuf>,
    /// Only detects findings; writes no files.
    #[arg(long)]
    pub(crate) dry_run: bool,
    /// Dumps the parsed syntax tree to stderr.
    #[arg(long)]
    pub(crate) verbose: bool,
    /// Findings report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Human)]
    pub(crate) format: ReportFormat,
    /// Logging configuration.
    #[command(flatten)]
    pub(crate) config: ConfigArgs,
}

impl Cli {
    /// Resolves where the sanitized copy goes, or `None` for a dry run.
    pub(crate) fn output_path(&self, file: &Path) -> Option<PathBuf> {
        if self.dry_run {
            return None;
        }
        Some(
            self.output
                .clone()
                .unwrap_or_else(|| default_output_path(file)),
        )
    }
}

/// Appends [`SANITIZED_SUFFIX`] to the full file name, keeping any
/// existing extension.
pub(crate) fn default_output_path(file: &Path) -> PathBuf {
    let mut raw = file.as_os_str().to_owned();
    raw.push(SANITIZED_SUFFIX);
    PathBuf::from(raw)
}
