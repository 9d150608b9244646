//! Time sources for token issuance and expiry checks.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// Current time as Unix epoch seconds.
pub trait TokenClock: Send + Sync {
    fn now_epoch_secs(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TokenClock for SystemClock {
    fn now_epoch_secs(&self) -> i64 {
        time::OffsetDateTime::now_utc().unix_timestamp()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl TokenClock for FixedClock {
    fn now_epoch_secs(&self) -> i64 {
        self.0
    }
}

/// A clock that only moves when told to.
///
/// Shared through an `Arc` between the token service and the code driving
/// time forward.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_epoch_secs: i64) -> Self {
        Self {
            now: AtomicI64::new(start_epoch_secs),
        }
    }

    /// Starts at the current wall-clock time.
    pub fn starting_now() -> Self {
        Self::new(SystemClock.now_epoch_secs())
    }

    pub fn advance(&self, by: Duration) {
        let secs = i64::try_from(by.as_secs()).unwrap_or(i64::MAX);
        self.now.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn set(&self, epoch_secs: i64) {
        self.now.store(epoch_secs, Ordering::SeqCst);
    }
}

impl TokenClock for ManualClock {
    fn now_epoch_secs(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        assert_eq!(FixedClock(1_704_067_200).now_epoch_secs(), 1_704_067_200);
    }

    #[test]
    fn test_manual_clock_moves_on_demand() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.now_epoch_secs(), 100);
        clock.advance(Duration::from_secs(5));
        assert_eq!(clock.now_epoch_secs(), 105);
        clock.set(10);
        assert_eq!(clock.now_epoch_secs(), 10);
    }

    #[test]
    fn test_system_clock_is_recent() {
        // 2024-01-01T00:00:00Z
        assert!(SystemClock.now_epoch_secs() > 1_704_067_200);
    }
}
