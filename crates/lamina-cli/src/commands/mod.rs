//! Command implementations.
//!
//! - [`build`] - build every configured target
//! - [`check`] - validate the configuration
//!
//! Each command exposes an `execute` function taking its parsed arguments.

pub mod build;
pub mod check;

pub use build::execute as build_execute;
pub use check::execute as check_execute;
