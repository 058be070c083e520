//! Core types for fedi-backfill
//!
//! Domain types shared across all other crates, plus the consistency filter
//! that keeps reply chains free of dangling parents.

mod account;
pub mod constants;
mod env_config;
mod error;
mod filter;
mod filter_tests;
mod post;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
mod working_set;

pub use account::*;
pub use env_config::*;
pub use error::*;
pub use filter::*;
pub use post::*;
pub use working_set::*;
