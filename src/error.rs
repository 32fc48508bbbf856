//! # Error Types
//!
//! This module defines the error type for the mapping engine.
//!
//! Tokenizing, mapping and timing never fail: unsupported characters,
//! truncation and degenerate timing are reported as
//! [`Diagnostic`](crate::Diagnostic)s. The only hard stop is a malformed
//! configuration, which is rejected at the API boundary before any input
//! is looked at.
//!
//! ## Error Types
//! - `ConfigError` - A configuration field has an unusable value
//! - `MetadataError` - Invalid YAML in a config file or source frontmatter
//!
//! ## Usage
//! ```rust
//! use pianotrainer::{map_text, MappingConfig, MappingError};
//!
//! let config = MappingConfig {
//!     target_seconds: 0.0,
//!     ..MappingConfig::default()
//! };
//!
//! match map_text("hello", &config) {
//!     Ok(output) => println!("{} events", output.events.len()),
//!     Err(MappingError::ConfigError { field, message }) => {
//!         eprintln!("Bad config field {}: {}", field, message);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MappingError {
    /// A configuration value that cannot be used.
    ///
    /// # Example
    /// ```
    /// # use pianotrainer::MappingError;
    /// let err = MappingError::ConfigError {
    ///     field: "target-seconds".to_string(),
    ///     message: "must be a positive number of seconds, got -1".to_string(),
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Invalid configuration for 'target-seconds': must be a positive number of seconds, got -1"
    /// );
    /// ```
    #[error("Invalid configuration for '{field}': {message}")]
    ConfigError { field: String, message: String },

    /// Invalid YAML in a configuration file or frontmatter block.
    ///
    /// # Example
    /// ```
    /// # use pianotrainer::MappingError;
    /// let err = MappingError::MetadataError("expected a mapping".to_string());
    /// assert_eq!(err.to_string(), "Invalid metadata: expected a mapping");
    /// ```
    #[error("Invalid metadata: {0}")]
    MetadataError(String),
}

impl MappingError {
    pub(crate) fn config(field: &str, message: impl Into<String>) -> Self {
        MappingError::ConfigError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
