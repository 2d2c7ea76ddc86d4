//! Command handlers.
//!
//! Handlers are thin: they pull components from the [`CliContext`](crate::CliContext),
//! call into the library crates and format output for the terminal. Typed
//! failures are raised as [`CliError`](crate::CliError) so `main` can pick an
//! exit code.

pub mod cache;
pub mod fetch;
pub mod speak;
