//! # Contract ABI Helpers
//!
//! Just enough of the Solidity ABI for static calls and event data: 4-byte
//! selectors, 32-byte words and length-prefixed dynamic bytes.

use shared_types::keys::keccak256;
use shared_types::{Address, Hash, U256};
use thiserror::Error;

/// Size of one ABI word.
pub const WORD: usize = 32;

/// ABI decoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// A read ran past the end of the data.
    #[error("ABI data too short: need {needed} bytes, have {len}")]
    OutOfBounds { needed: usize, len: usize },

    /// A word did not fit the requested integer type.
    #[error("ABI word at offset {offset} overflows u64")]
    Overflow { offset: usize },
}

/// Function selector of `signature`, e.g. `getUint(bytes32)`.
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = keccak256(&[signature.as_bytes()]);
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Calldata for `signature` with static word arguments.
pub fn encode_call(signature: &str, args: &[Hash]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + args.len() * WORD);
    data.extend_from_slice(&selector(signature));
    for arg in args {
        data.extend_from_slice(arg);
    }
    data
}

/// `value` as a big-endian word.
pub fn u64_word(value: u64) -> Hash {
    let mut word = [0u8; WORD];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

/// `base + delta` as a byte position in `data`, failing on overflow.
pub fn offset(data: &[u8], base: usize, delta: usize) -> Result<usize, AbiError> {
    base.checked_add(delta).ok_or(AbiError::OutOfBounds {
        needed: usize::MAX,
        len: data.len(),
    })
}

fn slice(data: &[u8], start: usize, len: usize) -> Result<&[u8], AbiError> {
    let end = offset(data, start, len)?;
    data.get(start..end).ok_or(AbiError::OutOfBounds {
        needed: end,
        len: data.len(),
    })
}

/// Word at byte `offset`.
pub fn read_word(data: &[u8], offset: usize) -> Result<Hash, AbiError> {
    let mut word = [0u8; WORD];
    word.copy_from_slice(slice(data, offset, WORD)?);
    Ok(word)
}

/// Unsigned 256-bit integer at byte `offset`.
pub fn read_u256(data: &[u8], offset: usize) -> Result<U256, AbiError> {
    Ok(U256::from_big_endian(&read_word(data, offset)?))
}

/// Unsigned integer at byte `offset` that must fit in 64 bits.
pub fn read_u64(data: &[u8], offset: usize) -> Result<u64, AbiError> {
    let value = read_u256(data, offset)?;
    if value > U256::from(u64::MAX) {
        return Err(AbiError::Overflow { offset });
    }
    Ok(value.low_u64())
}

/// Address (right-aligned in its word) at byte `offset`.
pub fn read_address(data: &[u8], offset: usize) -> Result<Address, AbiError> {
    let word = read_word(data, offset)?;
    let mut raw = [0u8; 20];
    raw.copy_from_slice(&word[12..]);
    Ok(Address(raw))
}

/// Dynamic `bytes`/`string` whose length word sits at byte `offset`.
pub fn read_dynamic_bytes(data: &[u8], offset: usize) -> Result<&[u8], AbiError> {
    let len = read_u64(data, offset)? as usize;
    slice(data, self::offset(data, offset, WORD)?, len)
}
