//! # Protocol Storage Keys
//!
//! The protocol keeps its state in a single key/value contract addressed by
//! Keccak-256 digests of packed namespaces.

use sha3::{Digest, Keccak256};

use crate::entities::{Address, Hash};

/// Namespace of the per-account claimed-interval bitmap.
pub const CLAIMED_BITMAP_NAMESPACE: &[u8] = b"rewards.interval.claimed";

/// Key holding the protocol deployment block.
pub const DEPLOY_BLOCK_NAMESPACE: &[u8] = b"deploy.block";

/// Keccak-256 over the concatenation of `parts`.
pub fn keccak256(parts: &[&[u8]]) -> Hash {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Storage key of the protocol deployment block.
pub fn deploy_block_key() -> Hash {
    keccak256(&[DEPLOY_BLOCK_NAMESPACE])
}

/// Storage key of bitmap word `bucket` for `account`.
///
/// The bucket is packed as a 32-byte big-endian integer.
pub fn claimed_bitmap_key(account: &Address, bucket: u64) -> Hash {
    let mut bucket_bytes = [0u8; 32];
    bucket_bytes[24..].copy_from_slice(&bucket.to_be_bytes());
    keccak256(&[CLAIMED_BITMAP_NAMESPACE, account.as_bytes(), &bucket_bytes])
}
