//! # Error Handling
//!
//! Centralized error handling for `instance-forge`, built on `thiserror`.
//!
//! ## Key Components
//!
//! - **`Error`**: the main enum covering every anticipated failure mode.
//!   Instance-scoped variants (`Copy`, `Settings`) carry the instance name so
//!   a failure can always be attributed to the instance being generated.
//! - **`Result<T>`**: a type alias for `std::result::Result<T, Error>`, used
//!   throughout the library.
//!
//! Configuration problems split into two kinds: `ConfigParse` for a config
//! file that cannot be deserialized, and `ConfigInvalid` for one that parses
//! but fails pre-flight validation (missing source directory, duplicate
//! folder names, and so on). Validation errors are fatal and are raised
//! before any filesystem mutation; instance-scoped errors are recoverable
//! and only fail the one instance they belong to.

use thiserror::Error;

/// Main error type for instance-forge operations
#[derive(Error, Debug)]
pub enum Error {
    /// The generator configuration file could not be parsed.
    ///
    /// Includes the specific parsing issue and optionally a hint about how
    /// to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The configuration parsed but failed pre-flight validation.
    #[error("Invalid configuration: {message}")]
    ConfigInvalid { message: String },

    /// Copying the build output for one instance failed.
    #[error("Copy error for instance '{instance}': {message}")]
    Copy { instance: String, message: String },

    /// Deriving the settings document for one instance failed.
    #[error("Settings error for instance '{instance}': {message}")]
    Settings { instance: String, message: String },

    /// A structural or free-form override could not be applied to the
    /// settings document.
    #[error("Patch error: {message}")]
    Patch { message: String },

    /// Generating a startup or process-manager script failed.
    #[error("Script generation error: {message}")]
    Scripts { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
