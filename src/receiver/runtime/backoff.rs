//! Back-off configuration for socket receive failures.

use std::time::Duration;

/// Exponential back-off applied when `recv_from` fails.
///
/// UDP receive errors are usually transient (for example an ICMP
/// port-unreachable surfacing as `ConnectionReset`). The receive loop sleeps
/// for `initial_delay` after the first failure and doubles the delay on each
/// consecutive one, capped at `max_delay`. A successful receive resets it.
///
/// # Default Values
/// - `initial_delay`: 10 milliseconds
/// - `max_delay`: 1 second
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackoffConfig {
    /// Delay used for the first retry after a receive failure.
    pub initial_delay: Duration,
    /// Ceiling for the doubled delay.
    pub max_delay: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_secs(1),
        }
    }
}

impl BackoffConfig {
    /// Clamp delays to at least one millisecond and ensure
    /// `initial_delay <= max_delay`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use depthframe::receiver::BackoffConfig;
    ///
    /// let cfg = BackoffConfig {
    ///     initial_delay: Duration::from_millis(5),
    ///     max_delay: Duration::ZERO,
    /// };
    ///
    /// let normalized = cfg.normalized();
    /// assert_eq!(normalized.initial_delay, Duration::from_millis(1));
    /// assert_eq!(normalized.max_delay, Duration::from_millis(5));
    /// ```
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.initial_delay = self.initial_delay.max(Duration::from_millis(1));
        self.max_delay = self.max_delay.max(Duration::from_millis(1));
        if self.initial_delay > self.max_delay {
            std::mem::swap(&mut self.initial_delay, &mut self.max_delay);
        }
        self
    }

    /// Delay to use after `current`, doubling up to `max_delay`.
    #[must_use]
    pub fn next_delay(&self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rstest::rstest;

    use super::BackoffConfig;

    #[rstest]
    #[case::already_valid(10, 1000, 10, 1000)]
    #[case::inverted(50, 5, 5, 50)]
    #[case::zero_delays(0, 0, 1, 1)]
    fn normalized_orders_and_clamps(
        #[case] initial_ms: u64,
        #[case] max_ms: u64,
        #[case] expected_initial_ms: u64,
        #[case] expected_max_ms: u64,
    ) {
        let cfg = BackoffConfig {
            initial_delay: Duration::from_millis(initial_ms),
            max_delay: Duration::from_millis(max_ms),
        }
        .normalized();
        assert_eq!(cfg.initial_delay, Duration::from_millis(expected_initial_ms));
        assert_eq!(cfg.max_delay, Duration::from_millis(expected_max_ms));
    }

    #[test]
    fn next_delay_doubles_until_capped() {
        let cfg = BackoffConfig {
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(35),
        };
        let mut delay = cfg.initial_delay;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(delay);
            delay = cfg.next_delay(delay);
        }
        assert_eq!(
            seen,
            [10, 20, 35, 35].map(Duration::from_millis).to_vec()
        );
    }
}
