//! # Ports Layer
//!
//! The locator only depends on a header source.

pub mod outbound;

pub use outbound::{HeaderSource, MockHeaderSource};
