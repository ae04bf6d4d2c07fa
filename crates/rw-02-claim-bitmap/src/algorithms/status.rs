//! # Claim Status Scan
//!
//! Period `i` is claimed iff bit `i % 256` of word `i / 256` is set. Each
//! word is read once; words are read concurrently.

use futures::future::try_join_all;
use shared_types::{keys, Address, StorageReader, U256};
use tracing::debug;

use crate::domain::{ClaimBitmapError, ClaimStatus, PERIODS_PER_WORD};

/// Classify periods `0..current_index` for `account`.
pub async fn get_claim_status<R: StorageReader + ?Sized>(
    account: &Address,
    current_index: u64,
    reader: &R,
) -> Result<ClaimStatus, ClaimBitmapError> {
    if current_index == 0 {
        return Ok(ClaimStatus::default());
    }

    let buckets = current_index.div_ceil(PERIODS_PER_WORD);
    let words = try_join_all(
        (0..buckets).map(|bucket| reader.get_uint(keys::claimed_bitmap_key(account, bucket))),
    )
    .await?;

    let status = split_periods(&words, current_index);
    debug!(
        %account,
        current_index,
        words = words.len(),
        claimed = status.claimed.len(),
        "[rw-02] Claim status computed"
    );
    Ok(status)
}

/// Whether `account` has claimed period `index`.
pub async fn is_claimed<R: StorageReader + ?Sized>(
    account: &Address,
    index: u64,
    reader: &R,
) -> Result<bool, ClaimBitmapError> {
    let word = reader
        .get_uint(keys::claimed_bitmap_key(account, index / PERIODS_PER_WORD))
        .await?;
    Ok(bit_is_set(word, index))
}

/// Split `0..current_index` using already-fetched words (`words[b]` covers bucket `b`).
///
/// Missing trailing words are treated as zero.
pub fn split_periods(words: &[U256], current_index: u64) -> ClaimStatus {
    let mut status = ClaimStatus::default();
    for index in 0..current_index {
        let word = words
            .get((index / PERIODS_PER_WORD) as usize)
            .copied()
            .unwrap_or_default();
        if bit_is_set(word, index) {
            status.claimed.push(index);
        } else {
            status.unclaimed.push(index);
        }
    }
    status
}

fn bit_is_set(word: U256, index: u64) -> bool {
    word.bit((index % PERIODS_PER_WORD) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::MockStorage;

    fn account() -> Address {
        Address([0x42; 20])
    }

    #[tokio::test]
    async fn test_zero_index_is_empty_without_reads() {
        let storage = MockStorage::default();
        let status = get_claim_status(&account(), 0, &storage).await.unwrap();
        assert!(status.is_empty());
        assert_eq!(storage.read_count(), 0);
    }

    #[tokio::test]
    async fn test_nothing_claimed() {
        let storage = MockStorage::default();
        let status = get_claim_status(&account(), 5, &storage).await.unwrap();
        assert_eq!(status.unclaimed, vec![0, 1, 2, 3, 4]);
        assert!(status.claimed.is_empty());
    }

    #[tokio::test]
    async fn test_bits_across_word_boundary() {
        let storage = MockStorage::default();
        for index in [0, 255, 256] {
            storage.set_claimed(&account(), index);
        }

        let status = get_claim_status(&account(), 300, &storage).await.unwrap();
        assert_eq!(status.claimed, vec![0, 255, 256]);
        assert_eq!(status.unclaimed.len(), 297);
        assert_eq!(status.unclaimed.first(), Some(&1));
        assert_eq!(status.unclaimed.last(), Some(&299));
        assert!(status.unclaimed.windows(2).all(|w| w[0] < w[1]));
        // One read per word, not per period.
        assert_eq!(storage.read_count(), 2);
    }

    #[tokio::test]
    async fn test_bits_beyond_current_index_are_ignored() {
        let storage = MockStorage::default();
        storage.set_claimed(&account(), 1);
        storage.set_claimed(&account(), 7);

        let status = get_claim_status(&account(), 3, &storage).await.unwrap();
        assert_eq!(status.claimed, vec![1]);
        assert_eq!(status.unclaimed, vec![0, 2]);
    }

    #[tokio::test]
    async fn test_other_accounts_do_not_leak() {
        let storage = MockStorage::default();
        storage.set_claimed(&Address([0x01; 20]), 2);

        let status = get_claim_status(&account(), 4, &storage).await.unwrap();
        assert!(status.claimed.is_empty());
    }

    #[tokio::test]
    async fn test_read_failure_is_surfaced() {
        let storage = MockStorage::failing();
        let result = get_claim_status(&account(), 10, &storage).await;
        assert!(matches!(result, Err(ClaimBitmapError::Transport(_))));
    }

    #[tokio::test]
    async fn test_is_claimed_single_period() {
        let storage = MockStorage::default();
        storage.set_claimed(&account(), 513);
        assert!(is_claimed(&account(), 513, &storage).await.unwrap());
        assert!(!is_claimed(&account(), 512, &storage).await.unwrap());
    }

    #[test]
    fn test_split_periods_pure() {
        let words = [U256::from(0b101u64)];
        let status = split_periods(&words, 4);
        assert_eq!(status.claimed, vec![0, 2]);
        assert_eq!(status.unclaimed, vec![1, 3]);
    }
}
