//! Dispatch configuration constants

use std::time::Duration;

/// Token interval for long property lists.
/// One request per 350ms (~170 requests per minute) leaves headroom under
/// the per-user quota when several hundred queries are queued.
pub const SPARSE_BUCKET_INTERVAL_MS: u64 = 350;

/// Token interval for short property lists.
/// One request per 200ms (5 per second) clears small accounts quickly while
/// staying below the burst quota.
pub const DENSE_BUCKET_INTERVAL_MS: u64 = 200;

/// List length above which the sparser bucket is selected.
pub const SPARSE_QUEUE_THRESHOLD: usize = 200;

/// Pick the inter-request interval for a property list of the given length
pub fn bucket_interval_for(queue_len: usize) -> Duration {
    if queue_len > SPARSE_QUEUE_THRESHOLD {
        Duration::from_millis(SPARSE_BUCKET_INTERVAL_MS)
    } else {
        Duration::from_millis(DENSE_BUCKET_INTERVAL_MS)
    }
}
