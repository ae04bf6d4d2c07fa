//! # Domain Layer

pub mod errors;
pub mod report;
pub mod source;

pub use errors::DistributorError;
pub use report::{FetchAttempt, FetchReport};
pub use source::{SourceKind, SourceTemplate};
