//! # Integration Flows

pub mod prehistory;
pub mod publish_and_claim;
