//! # Content Identifiers
//!
//! Deterministic CIDv1 for the compressed artifact.
//!
//! # Layout
//!
//! - The payload is split into fixed-size chunks. Each chunk is a `raw`
//!   block addressed by its SHA2-256 digest.
//! - A payload that fits in one chunk is identified by that raw block.
//! - Otherwise chunks are grouped into balanced `dag-pb` UnixFS file nodes
//!   of at most `max_links` children, level by level, until one root
//!   remains.
//! - Identifiers are rendered as lowercase base32 multibase (`b...`).
//!
//! Node encoding follows canonical dag-pb: links (hash, empty name, total
//! size) precede the UnixFS data (type `File`, file size, block sizes).

use sha2::{Digest, Sha256};
use shared_types::Hash;
use std::fmt;

use crate::algorithms::compression::ArtifactCompressor;
use crate::config::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_LINKS};
use crate::domain::CompressionError;

/// Multicodec of a raw block.
pub const RAW_CODEC: u64 = 0x55;
/// Multicodec of a dag-pb node.
pub const DAG_PB_CODEC: u64 = 0x70;

const CID_VERSION: u64 = 1;
const SHA2_256_CODE: u64 = 0x12;
const SHA2_256_LEN: u64 = 32;
const UNIXFS_FILE: u64 = 2;
const BASE32_ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";

/// A CIDv1 with a SHA2-256 multihash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cid {
    codec: u64,
    digest: Hash,
}

impl Cid {
    /// Identify `block` under `codec`.
    pub fn of(codec: u64, block: &[u8]) -> Self {
        Self {
            codec,
            digest: Sha256::digest(block).into(),
        }
    }

    /// Content multicodec.
    pub fn codec(&self) -> u64 {
        self.codec
    }

    /// SHA2-256 digest of the block.
    pub fn digest(&self) -> &Hash {
        &self.digest
    }

    /// Binary form: version, codec, multihash.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.digest.len());
        put_varint(&mut out, CID_VERSION);
        put_varint(&mut out, self.codec);
        put_varint(&mut out, SHA2_256_CODE);
        put_varint(&mut out, SHA2_256_LEN);
        out.extend_from_slice(&self.digest);
        out
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", base32_lower(&self.to_bytes()))
    }
}

/// Derives a content identifier for a payload.
pub trait ContentAddresser: Send + Sync {
    /// Identifier of `payload`.
    fn content_id(&self, payload: &[u8]) -> Cid;
}

/// Balanced UnixFS file layout with raw leaves.
#[derive(Debug, Clone)]
pub struct UnixFsAddresser {
    chunk_size: usize,
    max_links: usize,
}

impl Default for UnixFsAddresser {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_MAX_LINKS)
    }
}

impl UnixFsAddresser {
    /// Create an addresser. Degenerate parameters are raised to the smallest
    /// usable values (1-byte chunks, binary fan-out).
    pub fn new(chunk_size: usize, max_links: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            max_links: max_links.max(2),
        }
    }
}

impl ContentAddresser for UnixFsAddresser {
    fn content_id(&self, payload: &[u8]) -> Cid {
        if payload.len() <= self.chunk_size {
            return Cid::of(RAW_CODEC, payload);
        }

        let mut level: Vec<DagLink> = payload
            .chunks(self.chunk_size)
            .map(|chunk| DagLink {
                cid: Cid::of(RAW_CODEC, chunk),
                total_size: chunk.len() as u64,
                file_size: chunk.len() as u64,
            })
            .collect();

        loop {
            level = level.chunks(self.max_links).map(file_node).collect();
            if let [root] = level.as_slice() {
                return root.cid;
            }
        }
    }
}

/// Compress `json` and identify the compressed bytes.
///
/// Returns the identifier and the compressed payload it covers.
pub fn compute_content_identifier(
    json: &[u8],
    compressor: &dyn ArtifactCompressor,
    addresser: &dyn ContentAddresser,
) -> Result<(Cid, Vec<u8>), CompressionError> {
    let compressed = compressor.compress(json)?;
    Ok((addresser.content_id(&compressed), compressed))
}

struct DagLink {
    cid: Cid,
    /// Encoded size of the linked block plus everything below it.
    total_size: u64,
    /// File bytes under the link.
    file_size: u64,
}

fn file_node(children: &[DagLink]) -> DagLink {
    let block = encode_file_node(children);
    DagLink {
        cid: Cid::of(DAG_PB_CODEC, &block),
        total_size: block.len() as u64 + children.iter().map(|c| c.total_size).sum::<u64>(),
        file_size: children.iter().map(|c| c.file_size).sum(),
    }
}

fn encode_file_node(children: &[DagLink]) -> Vec<u8> {
    let mut node = Vec::new();

    for child in children {
        let mut link = Vec::new();
        put_bytes_field(&mut link, 1, &child.cid.to_bytes());
        put_bytes_field(&mut link, 2, &[]);
        put_varint_field(&mut link, 3, child.total_size);
        put_bytes_field(&mut node, 2, &link);
    }

    let mut data = Vec::new();
    put_varint_field(&mut data, 1, UNIXFS_FILE);
    put_varint_field(&mut data, 3, children.iter().map(|c| c.file_size).sum());
    for child in children {
        put_varint_field(&mut data, 4, child.file_size);
    }
    put_bytes_field(&mut node, 1, &data);

    node
}

// =============================================================================
// Wire helpers
// =============================================================================

fn put_varint(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

fn put_varint_field(out: &mut Vec<u8>, field: u64, value: u64) {
    put_varint(out, field << 3);
    put_varint(out, value);
}

fn put_bytes_field(out: &mut Vec<u8>, field: u64, bytes: &[u8]) {
    put_varint(out, (field << 3) | 2);
    put_varint(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}

fn base32_lower(bytes: &[u8]) -> String {
    let mut out = String::with_capacity((bytes.len() * 8).div_ceil(5));
    let mut buffer: u32 = 0;
    let mut bits = 0u32;

    for &byte in bytes {
        buffer = (buffer << 8) | byte as u32;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(BASE32_ALPHABET[((buffer >> bits) & 0x1f) as usize] as char);
        }
        buffer &= (1 << bits) - 1;
    }
    if bits > 0 {
        out.push(BASE32_ALPHABET[((buffer << (5 - bits)) & 0x1f) as usize] as char);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::compression::ZstdCompressor;

    fn payload(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn test_base32_vectors() {
        assert_eq!(base32_lower(b""), "");
        assert_eq!(base32_lower(b"f"), "my");
        assert_eq!(base32_lower(b"foobar"), "mzxw6ytboi");
    }

    #[test]
    fn test_varint_multibyte() {
        let mut out = Vec::new();
        put_varint(&mut out, 300);
        assert_eq!(out, vec![0xac, 0x02]);
    }

    #[test]
    fn test_single_chunk_is_raw_leaf() {
        let cid = UnixFsAddresser::default().content_id(b"hello world");
        assert_eq!(cid.codec(), RAW_CODEC);
        assert_eq!(
            cid.to_string(),
            "bafkreifzjut3te2nhyekklss27nh3k72ysco7y32koao5eei66wof36n5e"
        );
    }

    #[test]
    fn test_empty_payload() {
        let cid = UnixFsAddresser::default().content_id(b"");
        assert_eq!(
            cid.to_string(),
            "bafkreihdwdcefgh4dqkjv67uzcmw7ojee6xedzdetojuzjevtenxquvyku"
        );
    }

    #[test]
    fn test_multi_chunk_is_dag_pb_root() {
        let data = payload(DEFAULT_CHUNK_SIZE + 1);
        let cid = UnixFsAddresser::default().content_id(&data);
        assert_eq!(cid.codec(), DAG_PB_CODEC);
        assert!(cid.to_string().starts_with("bafybei"));
    }

    #[test]
    fn test_file_node_encoding() {
        let leaf = Cid::of(RAW_CODEC, b"hello world");
        let node = encode_file_node(&[DagLink {
            cid: leaf,
            total_size: 11,
            file_size: 11,
        }]);

        let mut link = vec![0x0a, 36];
        link.extend_from_slice(&leaf.to_bytes());
        link.extend_from_slice(&[0x12, 0x00, 0x18, 11]);

        let mut expected = vec![0x12, link.len() as u8];
        expected.extend_from_slice(&link);
        expected.extend_from_slice(&[0x0a, 6, 0x08, 0x02, 0x18, 11, 0x20, 11]);
        assert_eq!(node, expected);
    }

    #[test]
    fn test_deep_tree_is_deterministic_and_sensitive() {
        let addresser = UnixFsAddresser::new(4, 3);
        let data = payload(40);
        let first = addresser.content_id(&data);
        assert_eq!(first, addresser.content_id(&data));

        let mut changed = data.clone();
        changed[39] ^= 1;
        assert_ne!(first, addresser.content_id(&changed));

        // Same bytes, different chunking, different identifier.
        assert_ne!(first, UnixFsAddresser::new(8, 3).content_id(&data));
    }

    #[test]
    fn test_identifier_covers_compressed_bytes() {
        let json = br#"{"merkleRoot":"0x01"}"#;
        let compressor = ZstdCompressor::new(3);
        let addresser = UnixFsAddresser::default();
        let (cid, compressed) = compute_content_identifier(json, &compressor, &addresser).unwrap();
        assert_eq!(cid, addresser.content_id(&compressed));
        assert_ne!(cid, addresser.content_id(json));
    }
}
