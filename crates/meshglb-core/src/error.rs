//! Unified application error types for meshglb.
//!
//! Host operations (importers, exporter, add-on activation) and the
//! configuration layer map their internal errors into [`AppError`] for
//! consistent propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The command line could not be understood.
    Usage,
    /// A configuration error occurred.
    Configuration,
    /// An add-on (capability) could not be enabled.
    Capability,
    /// The host has no operator registered under the requested id.
    OperatorNotFound,
    /// An importer failed.
    Import,
    /// Source data was malformed.
    Parse,
    /// The input uses a feature this host cannot read.
    Unsupported,
    /// The exporter failed.
    Export,
    /// A filesystem I/O error occurred.
    Storage,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usage => write!(f, "USAGE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Capability => write!(f, "CAPABILITY"),
            Self::OperatorNotFound => write!(f, "OPERATOR_NOT_FOUND"),
            Self::Import => write!(f, "IMPORT"),
            Self::Parse => write!(f, "PARSE"),
            Self::Unsupported => write!(f, "UNSUPPORTED"),
            Self::Export => write!(f, "EXPORT"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout meshglb.
///
/// Crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a capability (add-on activation) error.
    pub fn capability(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Capability, message)
    }

    /// Create an operator-not-found error.
    pub fn operator_not_found(operator: &str) -> Self {
        Self::new(
            ErrorKind::OperatorNotFound,
            format!("operator '{operator}' is not registered"),
        )
    }

    /// Create an import error.
    pub fn import(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Import, message)
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    /// Create an unsupported-feature error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unsupported, message)
    }

    /// Create an export error.
    pub fn export(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Export, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::with_source(ErrorKind::Import, format!("ZIP error: {err}"), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = AppError::import("bad face index 7");
        assert_eq!(err.to_string(), "IMPORT: bad face index 7");
    }

    #[test]
    fn test_io_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AppError = io.into();
        assert_eq!(err.kind, ErrorKind::Storage);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_clone_drops_source() {
        let io = std::io::Error::other("boom");
        let err = AppError::with_source(ErrorKind::Export, "write failed", io);
        let cloned = err.clone();
        assert_eq!(cloned.kind, ErrorKind::Export);
        assert!(cloned.source.is_none());
    }

    #[test]
    fn test_operator_not_found_names_operator() {
        let err = AppError::operator_not_found("usd.import_");
        assert_eq!(err.kind, ErrorKind::OperatorNotFound);
        assert!(err.message.contains("usd.import_"));
    }
}
