//! Error types for structured error handling.
//!
//! This module provides:
//! - `PricingError`: Errors from parametrization, lattice and sensitivity operations
//! - `DateError`: Errors from date construction, parsing and year fractions

use thiserror::Error;

/// Categorised pricing errors.
///
/// Every failure is reported synchronously to the caller of the failing
/// operation. Pricing is deterministic, so none of these are retryable
/// without changing the inputs.
///
/// # Variants
/// - `InvalidParameter`: Non-positive time, volatility or step count, or a
///   risk-neutral probability outside (0, 1)
/// - `Configuration`: The lattice cannot support the requested quantity
///   (too shallow for a sensitivity, or tree factors not straddling 1)
/// - `NumericDegenerate`: Up/down factors collapse or a finite-difference
///   spacing is zero
///
/// # Examples
/// ```
/// use pricer_core::types::PricingError;
///
/// let err = PricingError::InvalidParameter("volatility must be positive".to_string());
/// assert_eq!(format!("{}", err), "Invalid parameter: volatility must be positive");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Invalid model input or step count.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Lattice configuration cannot produce the requested result.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Numerically degenerate tree or finite-difference stencil.
    #[error("Numerically degenerate: {0}")]
    NumericDegenerate(String),
}

impl PricingError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a numerically degenerate error
    pub fn numeric_degenerate(msg: impl Into<String>) -> Self {
        Self::NumericDegenerate(msg.into())
    }

    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            PricingError::InvalidParameter(_) => "invalid_parameter",
            PricingError::Configuration(_) => "configuration",
            PricingError::NumericDegenerate(_) => "numeric_degenerate",
        }
    }
}

/// Date-related errors.
///
/// # Variants
/// - `InvalidDate`: Invalid date components (e.g., February 30th)
/// - `ParseError`: Failed to parse date string
/// - `ReversedPeriod`: Period end precedes its start
///
/// # Examples
/// ```
/// use pricer_core::types::DateError;
///
/// let err = DateError::InvalidDate { year: 2024, month: 2, day: 30 };
/// assert_eq!(format!("{}", err), "Invalid date: 2024-2-30");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Invalid date components (e.g., February 30th).
    #[error("Invalid date: {year}-{month}-{day}")]
    InvalidDate {
        /// Year component
        year: i32,
        /// Month component (1-12)
        month: u32,
        /// Day component (1-31)
        day: u32,
    },

    /// Failed to parse date string.
    #[error("Date parse error: {0}")]
    ParseError(String),

    /// Year fraction requested over a period whose end precedes its start.
    #[error("Period end {end} precedes start {start}")]
    ReversedPeriod {
        /// ISO 8601 start date
        start: String,
        /// ISO 8601 end date
        end: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_error_display() {
        let err = PricingError::invalid_parameter("steps must be at least 1");
        assert_eq!(err.to_string(), "Invalid parameter: steps must be at least 1");

        let err = PricingError::configuration("lattice has 2 columns, gamma needs 3");
        assert_eq!(
            err.to_string(),
            "Configuration error: lattice has 2 columns, gamma needs 3"
        );

        let err = PricingError::numeric_degenerate("up <= down");
        assert_eq!(err.to_string(), "Numerically degenerate: up <= down");
    }

    #[test]
    fn test_pricing_error_kind() {
        assert_eq!(
            PricingError::invalid_parameter("x").kind(),
            "invalid_parameter"
        );
        assert_eq!(PricingError::configuration("x").kind(), "configuration");
        assert_eq!(
            PricingError::numeric_degenerate("x").kind(),
            "numeric_degenerate"
        );
    }

    #[test]
    fn test_error_trait_implementation() {
        let err = PricingError::configuration("x");
        let _: &dyn std::error::Error = &err;
        let err = DateError::ParseError("bad".to_string());
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_date_error_display() {
        let err = DateError::ReversedPeriod {
            start: "2020-02-26".to_string(),
            end: "2019-02-28".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Period end 2019-02-28 precedes start 2020-02-26"
        );
    }
}
