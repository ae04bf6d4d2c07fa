//! # Nearest-Timestamp Search
//!
//! Binary search by block number with a halving radius, then a bounded
//! neighbour correction around the best header seen.
//!
//! ## Contract
//!
//! Among blocks `deploy..=head`, return the header whose timestamp is
//! closest to the target. Ties go to the later block. When timestamps are
//! strictly increasing the result is exact; otherwise the correction phase
//! repairs small local inversions.

use rewards_telemetry::metrics::LOCATOR_HEADER_FETCHES;
use shared_types::{ExecutionHeader, TransportError};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::LocatorConfig;
use crate::domain::LocatorError;
use crate::ports::HeaderSource;

/// Hard cap on binary-search iterations.
const MAX_SEARCH_STEPS: usize = 256;

/// Find the header nearest `target_time` between `deploy_block` and the head.
///
/// If the head is at or below `deploy_block` the head is returned without
/// searching. Any fetch error, including a deadline expiry, aborts the
/// search and is returned as is.
pub async fn find_block_nearest_time<S: HeaderSource + ?Sized>(
    target_time: u64,
    deploy_block: u64,
    source: &S,
    config: &LocatorConfig,
) -> Result<ExecutionHeader, LocatorError> {
    let deadline = config.request_timeout();
    let head = with_deadline(source.endpoint(), deadline, source.latest_header()).await?;

    if head.number <= deploy_block {
        debug!(
            head = head.number,
            deploy_block, "[rw-01] Head at or below deployment block, using head"
        );
        return Ok(head);
    }

    let mut cache = HeaderCache::new(source, deadline);
    cache.insert(head.clone());

    let low = deploy_block;
    let high = head.number - 1;
    let delta = head.number - deploy_block;

    let mut candidate = deploy_block + delta / 2;
    let mut radius = (delta / 2).max(1);
    let mut best = head.clone();

    for step in 0..MAX_SEARCH_STEPS {
        let header = cache.get(candidate).await?;
        let improved = is_closer(&header, &best, target_time);
        if improved {
            best = header.clone();
        }

        debug!(
            step,
            candidate,
            timestamp = header.timestamp,
            radius,
            best = best.number,
            "[rw-01] Search step"
        );

        if radius == 1 && !improved {
            break;
        }

        radius = radius.div_ceil(2);
        candidate = if header.timestamp > target_time {
            candidate.saturating_sub(radius).max(low)
        } else {
            candidate.saturating_add(radius).min(high)
        };
    }

    let nearest =
        correct_neighbours(best, target_time, low, head.number, &mut cache, config).await?;

    debug!(
        target_time,
        block = nearest.number,
        timestamp = nearest.timestamp,
        fetched = cache.fetched,
        "[rw-01] Nearest block found"
    );

    Ok(nearest)
}

/// Walk backward while the previous block is strictly closer, then forward
/// while the next block is at least as close.
async fn correct_neighbours<S: HeaderSource + ?Sized>(
    start: ExecutionHeader,
    target_time: u64,
    low: u64,
    head: u64,
    cache: &mut HeaderCache<'_, S>,
    config: &LocatorConfig,
) -> Result<ExecutionHeader, LocatorError> {
    let mut current = start;
    let mut steps = 0u64;

    while current.number > low && steps < config.max_correction_steps {
        let previous = cache.get(current.number - 1).await?;
        steps += 1;
        if distance(&previous, target_time) < distance(&current, target_time) {
            current = previous;
        } else {
            break;
        }
    }

    while current.number < head && steps < config.max_correction_steps {
        let next = cache.get(current.number + 1).await?;
        steps += 1;
        if distance(&next, target_time) <= distance(&current, target_time) {
            current = next;
        } else {
            break;
        }
    }

    if steps >= config.max_correction_steps {
        warn!(
            block = current.number,
            steps, "[rw-01] Neighbour correction hit its step limit"
        );
    }

    Ok(current)
}

fn distance(header: &ExecutionHeader, target_time: u64) -> u64 {
    header.timestamp.abs_diff(target_time)
}

fn is_closer(candidate: &ExecutionHeader, best: &ExecutionHeader, target_time: u64) -> bool {
    let d_candidate = distance(candidate, target_time);
    let d_best = distance(best, target_time);
    d_candidate < d_best || (d_candidate == d_best && candidate.number > best.number)
}

async fn with_deadline<T>(
    endpoint: &str,
    deadline: Duration,
    call: impl Future<Output = Result<T, TransportError>>,
) -> Result<T, TransportError> {
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout {
            endpoint: endpoint.to_string(),
            after_ms: deadline.as_millis() as u64,
        }),
    }
}

/// Per-search header cache; no block is fetched twice.
struct HeaderCache<'a, S: ?Sized> {
    source: &'a S,
    deadline: Duration,
    headers: HashMap<u64, ExecutionHeader>,
    fetched: usize,
}

impl<'a, S: HeaderSource + ?Sized> HeaderCache<'a, S> {
    fn new(source: &'a S, deadline: Duration) -> Self {
        Self {
            source,
            deadline,
            headers: HashMap::new(),
            fetched: 0,
        }
    }

    fn insert(&mut self, header: ExecutionHeader) {
        self.headers.insert(header.number, header);
    }

    async fn get(&mut self, number: u64) -> Result<ExecutionHeader, LocatorError> {
        if let Some(header) = self.headers.get(&number) {
            return Ok(header.clone());
        }

        let header = with_deadline(
            self.source.endpoint(),
            self.deadline,
            self.source.header_by_number(number),
        )
        .await?
        .ok_or(LocatorError::HeaderMissing { number })?;

        self.fetched += 1;
        LOCATOR_HEADER_FETCHES.inc();
        self.insert(header.clone());
        Ok(header)
    }
}
