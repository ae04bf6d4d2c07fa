//! # Domain Layer

pub mod entities;
pub mod errors;
pub mod prehistory;

pub use entities::IntervalInfo;
pub use errors::ResolverError;
pub use prehistory::{prehistory_cutoff, HistoricalEventTable};
