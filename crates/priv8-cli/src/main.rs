//! CLI entrypoint for the priv8 scanner.
//!
//! The binary delegates to [`priv8_cli::run`], which parses arguments,
//! scans the target script, and writes the report.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    priv8_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
