//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that level filters name known levels
//! - Check that an enabled file sink has somewhere to write
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LogbusConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::LogbusConfig;
use crate::level::LevelRegistry;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("[{section}] log_levels names unknown level '{signal}'")]
    UnknownLevel { section: &'static str, signal: String },

    #[error("[file] log_dir must not be empty when the file sink is enabled")]
    EmptyLogDir,

    #[error("[file] file_name must not be empty")]
    EmptyFileName,

    #[error("channel must not be empty")]
    EmptyChannel,
}

/// Validate against the built-in levels.
pub fn validate_config(config: &LogbusConfig) -> Result<(), Vec<ValidationError>> {
    validate_with(config, &LevelRegistry::default())
}

/// Validate against a custom level registry.
pub fn validate_with(config: &LogbusConfig, registry: &LevelRegistry) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.channel.as_deref().is_some_and(|c| c.trim().is_empty()) {
        errors.push(ValidationError::EmptyChannel);
    }

    check_levels("console", config.console.log_levels.as_deref(), registry, &mut errors);
    check_levels("file", config.file.log_levels.as_deref(), registry, &mut errors);

    if config.file.enabled && config.file.log_dir.trim().is_empty() {
        errors.push(ValidationError::EmptyLogDir);
    }
    if config.file.file_name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        errors.push(ValidationError::EmptyFileName);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_levels(
    section: &'static str,
    levels: Option<&[String]>,
    registry: &LevelRegistry,
    errors: &mut Vec<ValidationError>,
) {
    for signal in levels.unwrap_or_default() {
        if !registry.contains(signal) {
            errors.push(ValidationError::UnknownLevel {
                section,
                signal: signal.clone(),
            });
        }
    }
}
