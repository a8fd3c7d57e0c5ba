//! Contract definitions for European vanilla options.
//!
//! This module provides:
//! - [`OptionType`]: Call or put, with the terminal payoff
//! - [`ContractSpec`]: Strike, expiry and option type of one contract
//!
//! Exercise is always European; early exercise is out of scope for
//! every engine in this crate.

pub mod payoff;
pub mod vanilla;

pub use payoff::OptionType;
pub use vanilla::ContractSpec;
