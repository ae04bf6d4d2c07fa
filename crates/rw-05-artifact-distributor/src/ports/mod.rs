//! # Ports Layer

pub mod outbound;

pub use outbound::{HttpFetcher, HttpResponse, MockHttpFetcher, MockReply};
