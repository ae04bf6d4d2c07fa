//! # Application Layer

pub mod generator;

pub use generator::RewardsTreeGenerator;
