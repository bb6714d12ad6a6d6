//! Domain types for finance-architect.
//!
//! This module contains the core data structures:
//! - Series / Episode: the content being generated and exported
//! - GenerationResult: the payload of a generation call
//! - Seed: the built-in reference series

pub mod seed;
pub mod series;

// Re-export commonly used types
pub use seed::{builtin_seed, load_seed_file, resolve_seed};
pub use series::{Episode, GenerationResult, Series};
