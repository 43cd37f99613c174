use std::time::Duration;

use crate::config::BackoffConfig;

/// Poll delay after consecutive failures: `base * multiplier^failures`, capped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    multiplier: u32,
    max: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::from(&BackoffConfig::default())
    }
}

impl From<&BackoffConfig> for Backoff {
    fn from(config: &BackoffConfig) -> Self {
        Self::new(config.multiplier, Duration::from_secs(config.max_seconds))
    }
}

impl Backoff {
    pub fn new(multiplier: u32, max: Duration) -> Self {
        Self { multiplier, max }
    }

    /// Fixed interval regardless of failures
    pub fn disabled() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn delay(&self, base: Duration, failures: u32) -> Duration {
        if failures == 0 || self.multiplier <= 1 {
            return base;
        }
        let factor = self.multiplier.saturating_pow(failures);
        // The cap never shortens the configured interval
        base.saturating_mul(factor).min(self.max.max(base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE: Duration = Duration::from_secs(5);

    #[test]
    fn test_doubles_then_caps() {
        let backoff = Backoff::new(2, Duration::from_secs(30));
        assert_eq!(backoff.delay(FIVE, 0), FIVE);
        assert_eq!(backoff.delay(FIVE, 1), Duration::from_secs(10));
        assert_eq!(backoff.delay(FIVE, 2), Duration::from_secs(20));
        assert_eq!(backoff.delay(FIVE, 3), Duration::from_secs(30));
        assert_eq!(backoff.delay(FIVE, 40), Duration::from_secs(30));
    }

    #[test]
    fn test_disabled() {
        let backoff = Backoff::disabled();
        assert_eq!(backoff.delay(FIVE, 10), FIVE);
    }

    #[test]
    fn test_cap_below_interval() {
        let backoff = Backoff::new(2, Duration::from_secs(60));
        let weather = Duration::from_secs(1800);
        assert_eq!(backoff.delay(weather, 3), weather);
    }

    #[test]
    fn test_from_config() {
        let backoff = Backoff::from(&BackoffConfig::default());
        assert_eq!(backoff, Backoff::new(2, Duration::from_secs(300)));
    }
}
