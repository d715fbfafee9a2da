//! Per-connection input rate limiting.
//!
//! A token bucket sized for the nominal 60 inputs/s plus a small burst.
//! Over-limit frames are answered with an `invalid_input` error but never
//! close the connection.

use std::time::Instant;

use crate::config::rate_limit::{INPUTS_PER_SECOND, INPUT_BURST};

pub struct TokenBucket {
    tokens: f64,
    capacity: f64,
    refill_per_sec: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Bucket with the configured input rate and burst headroom.
    pub fn for_inputs() -> Self {
        Self::new(INPUTS_PER_SECOND, INPUTS_PER_SECOND + INPUT_BURST)
    }

    pub fn new(refill_per_sec: f64, capacity: f64) -> Self {
        Self {
            tokens: capacity,
            capacity,
            refill_per_sec,
            last_refill: Instant::now(),
        }
    }

    /// Take one token if available.
    pub fn allow(&mut self) -> bool {
        self.allow_at(Instant::now())
    }

    /// Time-injected variant so tests do not sleep.
    pub fn allow_at(&mut self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.last_refill = now;
        self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_burst_up_to_capacity_then_throttled() {
        let mut bucket = TokenBucket::new(60.0, 70.0);
        let now = Instant::now();
        for _ in 0..70 {
            assert!(bucket.allow_at(now));
        }
        assert!(!bucket.allow_at(now));
    }

    #[test]
    fn test_refills_over_time() {
        let mut bucket = TokenBucket::new(60.0, 70.0);
        let now = Instant::now();
        for _ in 0..70 {
            bucket.allow_at(now);
        }
        assert!(!bucket.allow_at(now));
        // 100 ms at 60/s restores ~6 tokens.
        let later = now + Duration::from_millis(100);
        for _ in 0..6 {
            assert!(bucket.allow_at(later));
        }
        assert!(!bucket.allow_at(later));
    }

    #[test]
    fn test_sustained_rate_within_limit_is_never_throttled() {
        let mut bucket = TokenBucket::new(60.0, 70.0);
        let mut now = Instant::now();
        // One input every 17 ms ≈ 59/s for two seconds.
        for _ in 0..120 {
            now += Duration::from_millis(17);
            assert!(bucket.allow_at(now));
        }
    }
}
