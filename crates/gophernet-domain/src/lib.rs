//! GopherNet Domain Layer
//!
//! Defines the burrow entity and the rules that govern how it evolves.
//! Storage, scheduling and transport live in other crates and depend on
//! this one.
//!
//! ## Key Concepts
//!
//! - **Burrow**: a named cylindrical dwelling (width is the diameter)
//! - **Tick**: one minute of simulated time; ages every burrow and
//!   deepens the occupied ones
//! - **Collapse**: a burrow at least 25 days old can no longer be rented

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod burrow;

// Re-exports for convenience
pub use burrow::{Burrow, COLLAPSE_AGE_MINUTES, GROWTH_RATE, SEED_DEPTH};
