//! # BezKit Common
//!
//! Error types and logging configuration shared by every BezKit crate.
//!
//! ## Features
//!
//! - One error enum covering geometry, tree structure, configuration and I/O
//! - Logging configuration and setup on top of `tracing-subscriber`
//! - Result and Option extension traits

use thiserror::Error;

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat};

/// Unified error type for BezKit.
///
/// A failed ID lookup is not represented here: lookups return `Option`.
#[derive(Error, Debug)]
pub enum BezKitError {
    /// Malformed coordinate input (wrong length or parity).
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Illegal parent/child combination in a document tree.
    #[error("Structural violation: {0}")]
    StructuralViolation(String),

    /// Configuration could not be loaded or applied.
    #[error("Config error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Writing to an output sink failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A sink was used after it was closed.
    #[error("Sink closed: {0}")]
    SinkClosed(String),
}

impl BezKitError {
    /// Create an invalid geometry error.
    pub fn invalid_geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry(message.into())
    }

    /// Create a structural violation error.
    pub fn structural(message: impl Into<String>) -> Self {
        Self::StructuralViolation(message.into())
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a config error with source.
    pub fn config_with_source<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get the error category for log fields.
    pub fn category(&self) -> &'static str {
        match self {
            BezKitError::InvalidGeometry(_) => "invalid_geometry",
            BezKitError::StructuralViolation(_) => "structural_violation",
            BezKitError::Config { .. } => "config",
            BezKitError::Io(_) => "io",
            BezKitError::SinkClosed(_) => "sink_closed",
        }
    }

    /// Errors caused by the caller's input rather than the environment.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            BezKitError::InvalidGeometry(_) | BezKitError::StructuralViolation(_)
        )
    }
}

/// Result type alias for BezKit operations.
pub type Result<T> = std::result::Result<T, BezKitError>;

/// Extension trait for Result.
pub trait ResultExt<T> {
    /// Wrap any error as a config error with a message prefix.
    fn config_context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn config_context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let message = message.into();
            BezKitError::config_with_source(format!("{}: {}", message, e), e)
        })
    }
}

/// Extension trait for Option.
pub trait OptionExt<T> {
    /// Convert None to a StructuralViolation error.
    fn ok_or_structural(self, message: impl Into<String>) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_structural(self, message: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| BezKitError::StructuralViolation(message.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            BezKitError::invalid_geometry("odd").category(),
            "invalid_geometry"
        );
        assert_eq!(
            BezKitError::structural("layer in group").category(),
            "structural_violation"
        );
        assert_eq!(BezKitError::config("bad").category(), "config");
    }

    #[test]
    fn test_caller_errors() {
        assert!(BezKitError::invalid_geometry("x").is_caller_error());
        assert!(BezKitError::structural("x").is_caller_error());
        assert!(!BezKitError::config("x").is_caller_error());
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert!(!BezKitError::from(io).is_caller_error());
    }

    #[test]
    fn test_error_display() {
        let err = BezKitError::invalid_geometry("odd coordinate count 3");
        assert_eq!(err.to_string(), "Invalid geometry: odd coordinate count 3");
    }

    #[test]
    fn test_option_ext() {
        let some: Option<i32> = Some(42);
        assert_eq!(some.ok_or_structural("test").unwrap(), 42);

        let none: Option<i32> = None;
        assert!(matches!(
            none.ok_or_structural("test"),
            Err(BezKitError::StructuralViolation(_))
        ));
    }

    #[test]
    fn test_result_ext() {
        let parsed: std::result::Result<u32, std::num::ParseIntError> = "x1".parse();
        let err = parsed.config_context("poly steps").unwrap_err();
        assert!(matches!(err, BezKitError::Config { .. }));
        assert!(err.to_string().starts_with("Config error: poly steps:"));
    }
}
