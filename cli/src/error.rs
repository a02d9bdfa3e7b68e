#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use derive_more::{Display, From};
use oapi_sync_core::AppError;

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Failure inside the reconciliation core (parsing, shape, missing servers).
    #[display("{}", _0)]
    Core(AppError),

    /// Transport failure while fetching the internal spec.
    #[from(ignore)]
    #[display("HTTP Error: {}", _0)]
    Http(String),

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

/// Manual implementation of the standard Error trait.
///
/// We implement this manually (instead of `derive(Error)`) because the `General(String)`
/// variant contains a `String`, which does not implement `std::error::Error`, causing
/// auto-derived `source()` implementations to fail compilation.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_passes_through() {
        let err: CliError = AppError::MissingServers.into();
        assert_eq!(err.to_string(), "Servers key not present in external spec");
    }

    #[test]
    fn test_string_defaults_to_general() {
        let err: CliError = String::from("boom").into();
        assert!(matches!(err, CliError::General(_)));
    }
}
