//! # pricer_core: Foundation Types for Lattice Pricing
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core serves as the bottom layer of the workspace, providing:
//! - Error types: `PricingError`, `DateError` (`types::error`)
//! - Time types: `Date`, `DayCountConvention` (`types::time`)
//! - Market inputs: `MarketSnapshot` (`types::market`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - chrono: Date arithmetic
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::types::{Date, DayCountConvention, MarketSnapshot};
//!
//! let settlement = Date::from_ymd(2019, 2, 28).unwrap();
//! let maturity = Date::from_ymd(2020, 2, 26).unwrap();
//! let expiry = DayCountConvention::Actual365Fixed
//!     .year_fraction(settlement, maturity)
//!     .unwrap();
//! assert!((expiry - 363.0 / 365.0).abs() < 1e-12);
//!
//! let market = MarketSnapshot::new(100.0, 0.04, 0.0, 0.25)
//!     .unwrap()
//!     .with_valuation_date(Date::from_ymd(2019, 2, 26).unwrap());
//! assert_eq!(market.spot(), 100.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for Date, DayCountConvention, MarketSnapshot

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod types;
