//! Configuration schema definitions.
//!
//! This module defines the configuration file layout for the `logbus` binary.
//! All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};

use crate::format::{json_line_format, ProviderOptions};
use crate::sink::{ConsoleOptions, FileOptions, TintMode};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LogbusConfig {
    /// Channel used when none is given on the command line.
    pub channel: Option<String>,

    /// Line layout.
    pub format: FormatConfig,

    /// Console sink settings.
    pub console: ConsoleConfig,

    /// File sink settings.
    pub file: FileConfig,

    /// Diagnostics for logbus itself.
    pub diagnostics: DiagnosticsConfig,
}

/// Line layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatStyle {
    /// `|HH:MM:SS.ff|LEVEL|[channel] messages`
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FormatConfig {
    pub style: FormatStyle,
}

impl FormatConfig {
    pub fn provider_options(&self) -> ProviderOptions {
        match self.style {
            FormatStyle::Text => ProviderOptions::default(),
            FormatStyle::Json => ProviderOptions::default().line_format(json_line_format),
        }
    }
}

/// Console sink configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Attach the console sink.
    pub enabled: bool,

    /// Allowed level signals (case-insensitive). All levels when absent.
    pub log_levels: Option<Vec<String>>,

    /// When to color lines.
    pub tint: TintMode,

    /// Write ERROR and above to stderr.
    pub errors_to_stderr: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_levels: None,
            tint: TintMode::Auto,
            errors_to_stderr: false,
        }
    }
}

impl ConsoleConfig {
    pub fn to_options(&self) -> ConsoleOptions {
        ConsoleOptions {
            log_levels: self.log_levels.clone(),
            tint: self.tint,
            errors_to_stderr: self.errors_to_stderr,
            tint_resolver: None,
        }
    }
}

/// File sink configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FileConfig {
    /// Attach the file sink.
    pub enabled: bool,

    /// Directory for log files; created on first write.
    pub log_dir: String,

    /// Fixed file name. Defaults to the record's UTC date (`YYYY-MM-DD.log`).
    pub file_name: Option<String>,

    /// Allowed level signals (case-insensitive). All levels when absent.
    pub log_levels: Option<Vec<String>>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_dir: "logs".to_string(),
            file_name: None,
            log_levels: None,
        }
    }
}

impl FileConfig {
    pub fn to_options(&self) -> FileOptions {
        FileOptions {
            log_levels: self.log_levels.clone(),
            log_dir: self.log_dir.clone().into(),
            file_name: self.file_name.clone().map(Into::into),
        }
    }
}

/// Diagnostics configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// `tracing` filter directive; `RUST_LOG` overrides it.
    pub filter: String,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            filter: "logbus=warn".to_string(),
        }
    }
}
