//! CLI error types.

use pricer_core::types::PricingError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by `treecmp` commands.
///
/// Every variant maps to a non-zero process exit in `main`.
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A lattice or analytic valuation failed.
    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// I/O error while writing a report.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialisation error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialisation error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid command-line argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration file was requested explicitly but does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Some engines failed during a comparison run.
    #[error("{failed} of {total} engines failed")]
    MethodsFailed {
        /// Number of failed engines
        failed: usize,
        /// Number of engines attempted
        total: usize,
    },
}

impl CliError {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_error_conversion() {
        let err: CliError = PricingError::configuration("lattice too shallow").into();
        assert!(matches!(err, CliError::Pricing(PricingError::Configuration(_))));
        assert_eq!(
            err.to_string(),
            "Pricing error: Configuration error: lattice too shallow"
        );
    }

    #[test]
    fn test_methods_failed_display() {
        let err = CliError::MethodsFailed { failed: 2, total: 14 };
        assert_eq!(err.to_string(), "2 of 14 engines failed");
    }

    #[test]
    fn test_config_error_conversion() {
        let err: CliError = ConfigError::Validation(vec!["steps must be at least 1".into()]).into();
        assert!(err.to_string().contains("steps must be at least 1"));
    }
}
