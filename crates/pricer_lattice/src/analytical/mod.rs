//! Analytical pricing formulas for European options.
//!
//! This module provides the closed-form benchmark the lattice engines are
//! validated against:
//! - Black-Scholes-Merton prices with a continuous dividend yield
//! - Analytical Greeks (Delta, Gamma, Vega, Theta, Rho)
//! - Standard normal CDF/PDF backed by `statrs`
//!
//! Nothing under `tree` depends on this module.

pub mod black_scholes;
pub mod distributions;

// Re-export main types at module level
pub use black_scholes::{AnalyticGreeks, BlackScholes};
pub use distributions::{norm_cdf, norm_pdf};
