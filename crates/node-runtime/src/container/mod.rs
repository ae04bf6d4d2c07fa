//! # Subsystem Container
//!
//! Node configuration and the wiring of concrete adapters into the rewards
//! subsystems.

pub mod config;
pub mod subsystems;

pub use config::{ConfigError, NodeConfig};
pub use subsystems::SubsystemContainer;
