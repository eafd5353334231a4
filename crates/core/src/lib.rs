#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod color;
pub mod rng;
pub mod seed;

// Re-export commonly used types
pub use color::{ColorParseError, Rgb};
pub use rng::SeededRng;
pub use seed::{indexed_seed, sub_seed, visual_seed, SEED_MASK};
