use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Shape of the log events the binary writes to stderr.
///
/// Parsed case-insensitively from `--log-format` or `PRIV8_LOG_FORMAT`.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One flattened JSON object per event.
    Json,
    /// One terse text line per event.
    #[default]
    Compact,
}

/// Returned when text names no known [`LogFormat`].
pub type LogFormatParseError = strum::ParseError;
