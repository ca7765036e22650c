//! Core module: domain models and the record consistency engine

pub mod capacity;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod gpa;
pub mod models;
pub mod registration;
pub mod shared;
pub mod store;

/// Returns the current version of the `uni-records` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
