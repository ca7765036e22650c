//! CLI command handlers for `unirecords`.
//!
//! Each command family is implemented in its own submodule.

pub mod config;
pub mod records;
