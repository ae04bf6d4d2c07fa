//! # Domain Layer
//!
//! Error types for the block locator.

pub mod errors;

pub use errors::LocatorError;
