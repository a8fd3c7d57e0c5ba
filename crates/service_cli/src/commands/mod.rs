//! CLI command implementations
//!
//! Each submodule implements a specific `treecmp` command.

pub mod check;
pub mod compare;
pub mod price;
