//! # Algorithms
//!
//! - `nearest_time`: halving binary search plus neighbour correction

pub mod nearest_time;

pub use nearest_time::find_block_nearest_time;
