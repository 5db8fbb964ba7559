//! Log output for the CLI.
//!
//! Events go to stderr so they never interleave with the report on stdout.
//! The subscriber is process-global: the first successful install wins and
//! later calls in the same process are no-ops, whatever they are passed.

use std::io;

use once_cell::sync::OnceCell;
use priv8_config::{Config, LogFormat};
use thiserror::Error;
use tracing::Subscriber;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{self, time::UtcTime};

static INSTALLED: OnceCell<()> = OnceCell::new();

#[derive(Debug, Error)]
pub(crate) enum TelemetryError {
    #[error("invalid log filter '{filter}': {reason}")]
    Filter { filter: String, reason: String },
    #[error("failed to install log subscriber: {0}")]
    Install(#[from] SetGlobalDefaultError),
}

/// Installs the log subscriber described by `config`.
pub(crate) fn install(config: &Config, ansi: bool) -> Result<(), TelemetryError> {
    INSTALLED
        .get_or_try_init(|| {
            let filter = parse_filter(config.log_filter())?;
            let subscriber = build_subscriber(filter, config.log_format(), ansi);
            tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::from)
        })
        .map(|_| ())
}

fn parse_filter(expression: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(expression).map_err(|error| TelemetryError::Filter {
        filter: expression.to_owned(),
        reason: error.to_string(),
    })
}

fn build_subscriber(
    filter: EnvFilter,
    format: LogFormat,
    ansi: bool,
) -> Box<dyn Subscriber + Send + Sync> {
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(ansi)
        .with_target(true)
        .with_timer(UtcTime::rfc_3339());

    match format {
        LogFormat::Json => Box::new(builder.json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder.compact().finish()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("warn")]
    #[case("priv8_syntax=debug,warn")]
    fn accepts_filter_directives(#[case] expression: &str) {
        assert!(parse_filter(expression).is_ok());
    }

    #[test]
    fn rejects_unknown_level() {
        let err = parse_filter("priv8=loud").expect_err("bad level");

        assert!(err.to_string().starts_with("invalid log filter 'priv8=loud': "));
    }
}
