//! Shared configuration for the priv8 binary.
//!
//! Settings resolve from command-line flags first, then `PRIV8_*`
//! environment variables, then the defaults in this crate. The resolved
//! [`Config`] is plain data: telemetry setup reads it, and it can be
//! serialised for diagnostics.

mod defaults;
mod logging;

use clap::Args;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_LOG_FORMAT, default_log_filter, default_log_filter_string,
    default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Tracing filter expression, in `EnvFilter` syntax.
    #[serde(default = "default_log_filter_string")]
    pub log_filter: String,
    /// Output format for log events.
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Returns the tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

/// Configuration flags shared by priv8 commands.
///
/// Flatten this into a `clap` parser; each flag falls back to its
/// environment variable and then to the crate default.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigArgs {
    /// Tracing filter expression (for example `priv8_syntax=debug`).
    #[arg(long, value_name = "FILTER", env = "PRIV8_LOG_FILTER")]
    pub log_filter: Option<String>,
    /// Log output format: `json` or `compact`.
    #[arg(long, value_name = "FORMAT", env = "PRIV8_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,
}

impl ConfigArgs {
    /// Resolves the flags into a [`Config`], filling gaps with defaults.
    #[must_use]
    pub fn resolve(&self) -> Config {
        let defaults = Config::default();
        Config {
            log_filter: self
                .log_filter
                .clone()
                .filter(|filter| !filter.trim().is_empty())
                .unwrap_or(defaults.log_filter),
            log_format: self.log_format.unwrap_or(defaults.log_format),
        }
    }
}

impl From<ConfigArgs> for Config {
    fn from(args: ConfigArgs) -> Self {
        args.resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rstest::rstest;

    #[derive(Parser, Debug)]
    struct Harness {
        #[command(flatten)]
        config: ConfigArgs,
    }

    fn parse(args: &[&str]) -> Config {
        let harness = Harness::try_parse_from(std::iter::once("priv8").chain(args.iter().copied()))
            .expect("arguments should parse");
        harness.config.resolve()
    }

    #[test]
    fn defaults_apply_without_flags() {
        let config = ConfigArgs::default().resolve();

        assert_eq!(config.log_filter(), "warn");
        assert_eq!(config.log_format(), LogFormat::Compact);
        assert_eq!(config, Config::default());
    }

    #[rstest]
    #[case(&["--log-filter", "debug"], "debug", LogFormat::Compact)]
    #[case(&["--log-format", "json"], "warn", LogFormat::Json)]
    #[case(
        &["--log-filter", "priv8_syntax=trace", "--log-format", "compact"],
        "priv8_syntax=trace",
        LogFormat::Compact
    )]
    fn flags_override_defaults(
        #[case] args: &[&str],
        #[case] filter: &str,
        #[case] format: LogFormat,
    ) {
        let config = parse(args);

        assert_eq!(config.log_filter(), filter);
        assert_eq!(config.log_format(), format);
    }

    #[test]
    fn blank_filter_falls_back_to_default() {
        let config = ConfigArgs {
            log_filter: Some("  ".to_owned()),
            log_format: None,
        }
        .resolve();

        assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let result = Harness::try_parse_from(["priv8", "--log-format", "pretty"]);
        assert!(result.is_err());
    }

    #[test]
    fn config_serialises_snake_case() {
        let json = serde_json::to_string(&Config::default()).expect("serialise");
        assert_eq!(json, r#"{"log_filter":"warn","log_format":"compact"}"#);
    }
}
