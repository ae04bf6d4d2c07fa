//! # Adapters Layer
//!
//! Local filesystem persistence for artifacts.

pub mod artifact_store;

pub use artifact_store::{write_atomically, ArtifactStore};
