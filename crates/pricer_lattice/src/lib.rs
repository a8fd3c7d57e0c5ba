//! # Pricer Lattice (L2: Business Logic)
//!
//! Binomial lattice engines for European vanilla options under
//! Black-Scholes-Merton dynamics, with a closed-form benchmark.
//!
//! This crate provides:
//! - Contract definitions (`OptionType`, `ContractSpec`)
//! - Seven tree parametrizations (Jarrow-Rudd, Cox-Ross-Rubinstein,
//!   additive equal-probability, Trigeorgis, Tian, Leisen-Reimer, Joshi4)
//! - A triangular lattice arena and a shared backward induction routine
//! - Baseline and enhanced sensitivity extraction behind `BinomialEngine`
//! - Analytical Black-Scholes formulas used as ground truth
//!
//! ## Design Principles
//!
//! - **Enum-based methods** for static dispatch over the parametrization family
//! - **One allocation per lattice**: levels live in a flat arena
//! - **Pure functions**: every pricing call owns its lattice, nothing is shared
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::types::MarketSnapshot;
//! use pricer_lattice::instruments::{ContractSpec, OptionType};
//! use pricer_lattice::tree::{BinomialEngine, TreeMethod};
//!
//! let market = MarketSnapshot::new(100.0, 0.04, 0.0, 0.25).unwrap();
//! let contract = ContractSpec::new(OptionType::Call, 120.0, 363.0 / 365.0).unwrap();
//!
//! let baseline = BinomialEngine::new(TreeMethod::LeisenReimer, 301);
//! let enhanced = BinomialEngine::enhanced(TreeMethod::LeisenReimer, 301);
//!
//! let a = baseline.npv(&market, &contract).unwrap();
//! let b = enhanced.npv(&market, &contract).unwrap();
//! assert!((a - b).abs() < 1e-10);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for methods, contracts and pricing results

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod instruments;
pub mod tree;
