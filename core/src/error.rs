//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Malformed JSON input (internal spec).
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// Malformed YAML input (external spec, server map) or YAML emission failure.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// A document node exists but does not have the shape the merge expects.
    #[from(ignore)]
    #[display("Schema Shape Error: `{path}` must be {expected}")]
    SchemaShape {
        /// Dotted location of the offending node (e.g. `paths./vms`).
        path: String,
        /// Human readable description of the expected shape.
        expected: &'static str,
    },

    /// `servers` is absent when server entries are about to be rewritten.
    #[from(ignore)]
    #[display("Servers key not present in external spec")]
    MissingServers,

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

impl AppError {
    /// Shorthand for building a [`AppError::SchemaShape`].
    pub fn shape(path: impl Into<String>, expected: &'static str) -> Self {
        AppError::SchemaShape {
            path: path.into(),
            expected,
        }
    }
}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
