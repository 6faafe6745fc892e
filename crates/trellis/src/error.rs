//! Crate-level error type.
//!
//! Tree and layout errors come from `trellis-core`; this module adds the
//! configuration errors raised while loading themes and screen settings, and
//! a single [`Error`] that wraps all of them for application code.

use thiserror::Error;

pub use trellis_core::{LayoutError, LayoutResult, TreeError, TreeResult};

/// Errors raised while parsing a theme or screen configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The JSON document was malformed or had the wrong shape.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The TOML document was malformed or had the wrong shape.
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value parsed but is outside its allowed range.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Any error produced by this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// A widget tree edit failed.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// A layout pass failed.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// A configuration document could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for fallible crate operations.
pub type Result<T> = std::result::Result<T, Error>;
