//! # Ports Layer
//!
//! The accounting function is consumed as a black box.

pub mod outbound;

pub use outbound::{MockRewardsCalculator, RewardsCalculator};
