//! # service_cli
//!
//! Library side of the `treecmp` binary: scenario configuration, the
//! lattice-versus-benchmark comparison driver and report rendering.
//!
//! ## Commands
//!
//! - `treecmp compare` - Run every configured engine against Black-Scholes
//! - `treecmp price --method <name>` - Value the scenario with one engine
//! - `treecmp check` - Validate and print the resolved configuration
//!
//! ## Configuration precedence
//!
//! Built-in defaults < `treecmp.toml` < `TREECMP_*` environment variables
//! < command-line flags.

pub mod commands;
pub mod comparison;
pub mod config;
pub mod error;
pub mod report;

pub use error::{CliError, Result};
