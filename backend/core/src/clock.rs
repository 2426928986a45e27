use std::sync::Arc;

use chrono::Utc;

/// Source of the current wall-clock time in whole seconds since the Unix epoch.
///
/// The only non-deterministic input of request verification; tests pin it with
/// [`FixedClock`].
pub trait Clock: Send + Sync {
    fn now_unix(&self) -> i64;
}

/// Reads the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_unix(&self) -> i64 {
        self.0
    }
}

/// Clock shared between request handlers.
pub type SharedClock = Arc<dyn Clock>;

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_unix(&self) -> i64 {
        (**self).now_unix()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_unix(&self) -> i64 {
        (**self).now_unix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        assert_eq!(FixedClock(1_533_878_462).now_unix(), 1_533_878_462);
    }

    #[test]
    fn test_system_clock_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now_unix() > 1_577_836_800);
    }

    #[test]
    fn test_shared_clock_delegates() {
        let clock: SharedClock = Arc::new(FixedClock(42));
        assert_eq!(clock.now_unix(), 42);
        assert_eq!((&clock).now_unix(), 42);
    }
}
