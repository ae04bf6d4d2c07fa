//! # Download Sources
//!
//! URL templates with `{cid}`, `{filename}` and `{network}` placeholders.
//! Content-addressed sources serve the compressed artifact, so their
//! `{filename}` expands to the compressed name; fallback sources serve the
//! plain JSON.

use serde::{Deserialize, Serialize};
use shared_types::Network;
use std::fmt;

/// Primary content-addressed mirror.
pub const PRIMARY_CID_URL: &str = "https://{cid}.ipfs.dweb.link/{filename}";
/// Secondary content-addressed mirror.
pub const SECONDARY_CID_URL: &str = "https://ipfs.io/ipfs/{cid}/{filename}";
/// Per-network fallback repository.
pub const FALLBACK_URL: &str =
    "https://github.com/rocket-pool/rewards-trees/raw/main/{network}/{filename}";

/// How a source addresses artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Keyed by content identifier; serves compressed bytes.
    Cid,
    /// Keyed by network and filename; serves plain JSON.
    Fallback,
}

impl SourceKind {
    /// Metric/log label.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Cid => "cid",
            SourceKind::Fallback => "fallback",
        }
    }

    /// Whether bodies from this source must be decompressed.
    pub fn is_compressed(&self) -> bool {
        matches!(self, SourceKind::Cid)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the ordered source list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTemplate {
    /// Addressing scheme.
    pub kind: SourceKind,
    /// URL template.
    pub url: String,
}

impl SourceTemplate {
    /// Content-addressed source.
    pub fn cid(url: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Cid,
            url: url.into(),
        }
    }

    /// Filename-addressed fallback source.
    pub fn fallback(url: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Fallback,
            url: url.into(),
        }
    }

    /// The default source list: two gateways, then the fallback repository.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::cid(PRIMARY_CID_URL),
            Self::cid(SECONDARY_CID_URL),
            Self::fallback(FALLBACK_URL),
        ]
    }

    /// Expand the template.
    ///
    /// `filename` is the plain artifact name; content-addressed sources get
    /// `compressed_filename` instead.
    pub fn render(
        &self,
        cid: &str,
        filename: &str,
        compressed_filename: &str,
        network: Network,
    ) -> String {
        let name = if self.kind.is_compressed() {
            compressed_filename
        } else {
            filename
        };
        self.url
            .replace("{cid}", cid)
            .replace("{filename}", name)
            .replace("{network}", network.as_str())
    }
}
