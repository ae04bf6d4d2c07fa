//! # Ports Layer
//!
//! Outbound dependencies (`RewardsPoolReader`) come from `shared-types`.

pub mod inbound;

pub use inbound::IntervalInfoApi;
