//! # Download Reports

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use super::source::SourceKind;

/// One failed attempt against one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchAttempt {
    /// Rendered URL.
    pub url: String,
    /// Source kind that was attempted.
    pub kind: SourceKind,
    /// What went wrong.
    pub reason: String,
}

impl fmt::Display for FetchAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Downloading {} failed ({})", self.url, self.reason)
    }
}

/// Outcome of a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchReport {
    /// Period index.
    pub index: u64,
    /// Where the artifact was written.
    pub path: PathBuf,
    /// URL that served the artifact.
    pub url: String,
    /// Kind of the winning source.
    pub kind: SourceKind,
    /// Attempts that failed before the winner, in order.
    pub failures: Vec<FetchAttempt>,
}
