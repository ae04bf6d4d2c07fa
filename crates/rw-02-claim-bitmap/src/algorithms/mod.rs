//! # Algorithms
//!
//! - `status`: per-account bitmap scan

pub mod status;

pub use status::{get_claim_status, is_claimed, split_periods};
