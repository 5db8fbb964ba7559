//! Command-line runtime for the priv8 scanner.
//!
//! The runtime parses arguments, configures telemetry, runs the credential
//! policy over one bash script, and reports what it found. IO streams are
//! injected so tests can drive [`run`] in-process.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use priv8_syntax::{GrammarRegistry, node_to_string};

mod cli;
mod errors;
mod policy;
mod report;
mod style;
mod telemetry;
mod version;

use cli::Cli;
use errors::AppError;
use style::Palette;
use version::VersionInfo;

/// Runs the CLI using the provided arguments and IO handles.
///
/// The findings report goes to `stdout`. Progress messages, the verbose
/// tree dump, and errors go to `stderr`; status and error lines are
/// coloured when the process stderr is a terminal.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    run_with_palette(args, stdout, stderr, Palette::for_stderr())
}

pub(crate) fn run_with_palette<I, W, E>(
    args: I,
    stdout: &mut W,
    stderr: &mut E,
    palette: Palette,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let Err(error) = execute(args, stdout, stderr, palette) else {
        return ExitCode::SUCCESS;
    };

    let (written, exit) = if error.is_help_request() {
        (write!(stdout, "{error}"), ExitCode::SUCCESS)
    } else if let AppError::CliUsage(usage) = &error {
        (write!(stderr, "{usage}"), ExitCode::FAILURE)
    } else {
        let line = format!("Error: {error}");
        (writeln!(stderr, "{}", palette.failure(line)), ExitCode::FAILURE)
    };

    if written.is_err() {
        return ExitCode::FAILURE;
    }
    exit
}

fn execute<I, W, E>(
    args: I,
    stdout: &mut W,
    stderr: &mut E,
    palette: Palette,
) -> Result<(), AppError>
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let cli = Cli::try_parse_from(args).map_err(AppError::CliUsage)?;
    if cli.version {
        return VersionInfo::current()
            .write_to(stdout)
            .map_err(AppError::Emit);
    }

    let file = cli.file.clone().ok_or(AppError::MissingTarget)?;
    let output = cli.output_path(&file);
    telemetry::install(&cli.config.resolve(), palette.colour())?;
    let source = read_source(&file)?;

    let mut registry = GrammarRegistry::new();
    policy::install(&mut registry)?;
    let parsed = registry.parse(policy::GRAMMAR.name(), source)?;
    if parsed.has_errors() {
        tracing::warn!(
            file = %file.display(),
            errors = parsed.errors().len(),
            "source contains syntax errors"
        );
    }

    if cli.verbose {
        writeln!(
            stderr,
            "{}",
            node_to_string(parsed.root_node(), Some(parsed.source()), "")
        )
        .map_err(AppError::Emit)?;
    }

    let findings = policy::scan(&registry, &parsed)?;
    report::write_report(stdout, cli.format, &file, &parsed, &findings)?;

    if let Some(path) = output {
        write_output(&path, parsed.source())?;
        status(
            stderr,
            palette,
            &format!("Sanitized file written to {}", path.display()),
        )?;
    }
    status(stderr, palette, "Processing complete!")
}

fn status<E: Write>(stderr: &mut E, palette: Palette, message: &str) -> Result<(), AppError> {
    writeln!(stderr, "{}", palette.success(message)).map_err(AppError::Emit)
}

fn read_source(path: &Path) -> Result<Vec<u8>, AppError> {
    if !path.exists() {
        return Err(AppError::MissingFile {
            path: path.to_path_buf(),
        });
    }
    fs::read(path).map_err(|source| AppError::ReadSource {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes the sanitized copy. Values are not substituted yet, so the copy
/// is byte-identical to the input.
fn write_output(path: &Path, contents: &[u8]) -> Result<(), AppError> {
    fs::write(path, contents).map_err(|source| AppError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })
}
