//! Shared library for `uni-records`
//! Contains the academic record consistency engine used by the CLI

pub mod core;
pub mod logger;

pub use crate::core::{config, get_version};
