//! Token-bucket rate limiting
//!
//! A bucket refills one token per fixed interval and each dispatched request
//! drains one token. Callers block in [`TokenBucket::acquire`] until their
//! token's slot arrives, which guarantees that no rolling window shorter
//! than the interval ever sees two permitted requests.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

use super::config::bucket_interval_for;

/// Token bucket issuing one token per fixed interval
///
/// The first token is available immediately; each subsequent token becomes
/// available one interval after the previous one was claimed. Tokens are
/// handed out in acquisition order (the internal [`Mutex`] queues waiters
/// fairly), so callers that acquire sequentially are dispatched in order.
pub struct TokenBucket {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl TokenBucket {
    /// Create a bucket with the given inter-token interval
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Create a bucket sized for a dispatch queue of the given length
    ///
    /// Long queues get the sparser interval so the whole run stays under
    /// the per-user quota; short queues get the denser one.
    pub fn for_queue_len(queue_len: usize) -> Self {
        Self::new(bucket_interval_for(queue_len))
    }

    /// Inter-token interval of this bucket
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Acquire one token, waiting until its slot arrives
    ///
    /// Claims the next free slot under the lock, then sleeps outside it so
    /// later callers can already reserve their own (strictly later) slots.
    pub async fn acquire(&self) {
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next {
                Some(reserved) if reserved > now => reserved,
                _ => now,
            };
            *next = Some(slot + self.interval);
            slot
        };

        sleep_until(slot).await;
    }
}
