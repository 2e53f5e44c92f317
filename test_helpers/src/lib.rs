//! Test helpers shared across crates.
//!
//! This crate provides semantic snapshot fixtures, `figment::Jail` wrappers
//! and text normalisation for behavioural steps.

pub mod figment;
pub mod snapshot;
pub mod text;
