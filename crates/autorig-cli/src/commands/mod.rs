//! CLI command implementations.
//!
//! Each command returns `Ok(true)` on success, `Ok(false)` when the command
//! completed but the input failed its check, and `Err` for hard failures.

pub mod build;
pub mod modules;
pub mod validate;
