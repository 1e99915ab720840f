//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → LogbusConfig (validated, immutable)
//!     → schema.rs helpers build ProviderOptions / ConsoleOptions / FileOptions
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the binary reads it once at startup
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{ConsoleConfig, DiagnosticsConfig, FileConfig, FormatConfig, FormatStyle, LogbusConfig};
pub use validation::{validate_config, validate_with, ValidationError};
