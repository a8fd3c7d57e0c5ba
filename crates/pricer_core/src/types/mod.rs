//! Core error, time, and market types.
//!
//! This module provides:
//! - `error`: Structured error types for pricing and date operations
//! - `time`: Time types (Date, DayCountConvention) for year fraction calculations
//! - `market`: The immutable market snapshot consumed by every pricing engine
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level:
//! - [`Date`], [`DayCountConvention`] from `time`
//! - [`MarketSnapshot`] from `market`
//! - [`PricingError`], [`DateError`] from `error`

pub mod error;
pub mod market;
pub mod time;

// Re-export commonly used types at module level
pub use error::{DateError, PricingError};
pub use market::MarketSnapshot;
pub use time::{Date, DayCountConvention};
