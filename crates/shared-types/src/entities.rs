//! # Core Domain Entities
//!
//! Defines the chain-facing entities consumed by the rewards subsystems.
//!
//! ## Clusters
//!
//! - **Chain**: `ExecutionHeader`, `Address`, `Hash`
//! - **Rewards**: `RewardsEvent`, `Network`

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::encoding::hex_hash;
use crate::errors::ParseError;

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// A 32-byte hash (Keccak-256 unless stated otherwise).
pub type Hash = [u8; 32];

/// The all-zero hash.
pub const ZERO_HASH: Hash = [0u8; 32];

/// A 20-byte Ethereum-style account address.
///
/// Serialized as lowercase `0x`-prefixed hex so it can be used directly as a
/// JSON map key. Ordering is byte-wise, which is the leaf order of every
/// rewards tree.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// Length of an address in bytes.
    pub const LEN: usize = 20;

    /// Build an address from a byte slice of exactly 20 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ParseError> {
        let raw: [u8; 20] = bytes.try_into().map_err(|_| ParseError::InvalidLength {
            expected: Self::LEN,
            got: bytes.len(),
        })?;
        Ok(Self(raw))
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| ParseError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The subset of an execution-layer block header the rewards core needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionHeader {
    /// Block number.
    pub number: u64,
    /// Block hash.
    #[serde(with = "hex_hash")]
    pub hash: Hash,
    /// Parent block hash.
    #[serde(with = "hex_hash")]
    pub parent_hash: Hash,
    /// Unix timestamp in seconds.
    pub timestamp: u64,
}

impl ExecutionHeader {
    /// Create a header with zeroed hashes (used by synthetic sources).
    pub fn new(number: u64, timestamp: u64) -> Self {
        Self {
            number,
            hash: ZERO_HASH,
            parent_hash: ZERO_HASH,
            timestamp,
        }
    }
}

// =============================================================================
// CLUSTER B: REWARDS
// =============================================================================

/// Networks the rewards core knows how to address on disk and remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Ethereum mainnet.
    #[default]
    Mainnet,
    /// Prater (Goerli) testnet.
    Prater,
    /// Local development network.
    Devnet,
}

impl Network {
    /// Lowercase identifier used in filenames and URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Prater => "prater",
            Network::Devnet => "devnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "prater" => Ok(Network::Prater),
            "devnet" => Ok(Network::Devnet),
            other => Err(ParseError::UnknownNetwork(other.to_string())),
        }
    }
}

/// The canonical commitment the protocol emits when a rewards period closes.
///
/// Immutable once published; `merkle_root` is the trust anchor every locally
/// built or downloaded artifact is checked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardsEvent {
    /// Period index.
    pub index: u64,
    /// Execution block the snapshot was taken at.
    pub execution_block: u64,
    /// Consensus slot the snapshot was taken at.
    pub consensus_block: u64,
    /// Unix start of the period.
    pub interval_start_time: u64,
    /// Unix end of the period (the snapshot cutoff).
    pub interval_end_time: u64,
    /// Unix time the commitment was submitted.
    pub submission_time: u64,
    /// Number of claim intervals covered by this snapshot.
    pub intervals_passed: u64,
    /// Canonical Merkle root.
    #[serde(with = "hex_hash")]
    pub merkle_root: Hash,
    /// Content identifier of the compressed artifact.
    pub merkle_tree_cid: String,
}
