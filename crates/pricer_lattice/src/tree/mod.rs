//! Binomial lattice pricing.
//!
//! This module provides:
//! - [`TreeMethod`] / [`TreeParameters`]: the seven tree parametrizations
//! - [`Lattice`]: flat triangular arena of underlying levels
//! - [`roll_back`]: backward induction shared by both engine generations
//! - [`Generation`]: baseline and enhanced sensitivity extraction
//! - [`BinomialEngine`]: the facade combining all of the above
//!
//! ## Pipeline
//!
//! `MarketSnapshot` + `ContractSpec` -> `TreeParameters` -> `Lattice`
//! -> `roll_back` -> `PricingResult`

pub mod engine;
pub mod induction;
pub mod lattice;
pub mod parametrization;
pub mod result;
pub mod sensitivity;

pub use engine::BinomialEngine;
pub use induction::{roll_back, ValueColumn};
pub use lattice::Lattice;
pub use parametrization::{TreeMethod, TreeParameters};
pub use result::{NodeColumn, PricingResult, SensitivityNodes};
pub use sensitivity::Generation;
