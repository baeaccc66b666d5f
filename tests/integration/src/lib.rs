//! Integration test utilities for the forum API
//!
//! Starts the real router over a seeded in-memory store and drives it over HTTP.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
