//! # Algorithms
//!
//! - `merkle_tree`: sorted-pair Keccak tree and proofs
//! - `compression`: zstd framing of the distributed artifact
//! - `content_id`: CIDv1 over the compressed artifact

pub mod compression;
pub mod content_id;
pub mod merkle_tree;

pub use compression::{ArtifactCompressor, ZstdCompressor};
pub use content_id::{compute_content_identifier, Cid, ContentAddresser, UnixFsAddresser};
pub use merkle_tree::{build_tree, hash_pair, leaf_hash, verify_proof, RewardsTree};
