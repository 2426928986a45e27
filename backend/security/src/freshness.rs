use eventgate_core::Clock;
use tracing::debug;

/// Replay window around the current time, in seconds.
pub const REPLAY_WINDOW_SECS: u64 = 60 * 5;

/// Decides whether a request timestamp falls inside the replay window.
#[derive(Debug, Clone)]
pub struct FreshnessGate<C> {
    clock: C,
    window_secs: u64,
}

impl<C: Clock> FreshnessGate<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            window_secs: REPLAY_WINDOW_SECS,
        }
    }

    /// `true` when `|now - timestamp| <= 300`.
    ///
    /// A timestamp that is not a decimal integer counts as fresh: the
    /// signature check that follows fails for it anyway, and no separate
    /// error path is exposed for malformed headers.
    pub fn is_fresh(&self, timestamp: &str) -> bool {
        let Ok(ts) = timestamp.parse::<i64>() else {
            debug!("[Slack] Non-numeric request timestamp; deferring to signature check");
            return true;
        };
        let now = self.clock.now_unix();
        let skew = now.abs_diff(ts);
        if skew > self.window_secs {
            debug!(now, ts, skew, "[Slack] Request timestamp outside replay window");
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventgate_core::FixedClock;
    use proptest::prelude::*;

    const NOW: i64 = 1_533_878_462;

    fn gate() -> FreshnessGate<FixedClock> {
        FreshnessGate::new(FixedClock(NOW))
    }

    #[test]
    fn test_current_timestamp_is_fresh() {
        assert!(gate().is_fresh("1533878462"));
    }

    #[test]
    fn test_window_boundary() {
        assert!(gate().is_fresh(&(NOW - 300).to_string()));
        assert!(gate().is_fresh(&(NOW + 300).to_string()));
        assert!(!gate().is_fresh(&(NOW - 301).to_string()));
        assert!(!gate().is_fresh(&(NOW + 301).to_string()));
    }

    #[test]
    fn test_two_hours_old_is_stale() {
        assert!(!gate().is_fresh("1533870000"));
    }

    #[test]
    fn test_malformed_timestamp_defers() {
        assert!(gate().is_fresh(""));
        assert!(gate().is_fresh("yesterday"));
        assert!(gate().is_fresh("1533878462.5"));
    }

    #[test]
    fn test_leading_zeros_and_sign() {
        assert!(gate().is_fresh("001533878462"));
        assert!(gate().is_fresh("+1533878462"));
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        assert!(!gate().is_fresh(&i64::MIN.to_string()));
        assert!(!gate().is_fresh(&i64::MAX.to_string()));
        assert!(!FreshnessGate::new(FixedClock(i64::MIN)).is_fresh(&i64::MAX.to_string()));
    }

    proptest! {
        #[test]
        fn prop_freshness_is_symmetric(k in 0i64..100_000) {
            let past = gate().is_fresh(&(NOW - k).to_string());
            let future = gate().is_fresh(&(NOW + k).to_string());
            prop_assert_eq!(past, future);
            prop_assert_eq!(past, k <= 300);
        }
    }
}
