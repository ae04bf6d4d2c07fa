//! # Historical Event Table
//!
//! Some early periods predate the contract that emits snapshot events, so
//! their canonical records come from a static table loaded at startup. The
//! table is a JSON array of `RewardsEvent` objects, either read from disk or
//! embedded in the binary for networks that need one.

use shared_types::{Network, RewardsEvent};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::errors::ResolverError;

/// Resource embedded for Prater, relative to the crate root.
const PRATER_PREHISTORY_RESOURCE: &str = "resources/prater-prehistory.json";

/// First period per network whose event can be read from the protocol.
pub fn prehistory_cutoff(network: Network) -> u64 {
    match network {
        Network::Prater => 6,
        Network::Mainnet | Network::Devnet => 0,
    }
}

/// Canonical events for periods below the prehistory cutoff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoricalEventTable {
    events: BTreeMap<u64, RewardsEvent>,
}

impl HistoricalEventTable {
    /// Table holding `events`, keyed by their index.
    pub fn from_events(events: impl IntoIterator<Item = RewardsEvent>) -> Self {
        Self {
            events: events.into_iter().map(|e| (e.index, e)).collect(),
        }
    }

    /// Load a table from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ResolverError> {
        let bytes = std::fs::read(path).map_err(|e| ResolverError::HistoricalTable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json(&bytes, path)
    }

    /// Table embedded in the binary for `network`.
    ///
    /// Networks without a prehistory get an empty table.
    pub fn bundled(network: Network) -> Result<Self, ResolverError> {
        match network {
            Network::Prater => Self::from_json(
                include_str!("../../resources/prater-prehistory.json").as_bytes(),
                Path::new(PRATER_PREHISTORY_RESOURCE),
            ),
            Network::Mainnet | Network::Devnet => Ok(Self::default()),
        }
    }

    fn from_json(bytes: &[u8], source: &Path) -> Result<Self, ResolverError> {
        let events: Vec<RewardsEvent> =
            serde_json::from_slice(bytes).map_err(|e| ResolverError::HistoricalTable {
                path: PathBuf::from(source),
                reason: e.to_string(),
            })?;
        Ok(Self::from_events(events))
    }

    /// Whether every recorded period lies below the cutoff for `network`.
    pub fn is_prehistoric(&self, network: Network) -> bool {
        let cutoff = prehistory_cutoff(network);
        self.events.keys().all(|index| *index < cutoff)
    }

    /// Event for `index`, if recorded.
    pub fn get(&self, index: u64) -> Option<&RewardsEvent> {
        self.events.get(&index)
    }

    /// Number of recorded periods.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
