//! Benchmark support crate for clue.
//!
//! Provides seeded synthetic point sets and parameter types used by the
//! Criterion benchmarks of the full pipeline and of its individual phases.

pub mod error;
pub mod params;
pub mod source;
