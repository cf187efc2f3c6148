//! Adaptive delay selection.

use std::time::Duration;
use tokio::time::Instant;

use crate::config::TooltipConfig;

/// Chooses between the cold and warm delay regimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayPolicy {
    /// Cold-regime delay.
    pub initial: Duration,
    /// Warm-regime delay.
    pub subsequent: Duration,
    /// Window after a display during which the warm regime applies.
    pub cooldown: Duration,
}

impl DelayPolicy {
    /// Create a policy from explicit durations.
    pub fn new(initial: Duration, subsequent: Duration, cooldown: Duration) -> Self {
        Self { initial, subsequent, cooldown }
    }

    /// Delay to use for a request made at `now`.
    ///
    /// `last_shown_at` is `None` when no tooltip has ever been shown, which
    /// always selects the initial delay. A `last_shown_at` later than `now`
    /// counts as "just shown".
    pub fn delay(&self, now: Instant, last_shown_at: Option<Instant>) -> Duration {
        match last_shown_at {
            Some(shown) if now.saturating_duration_since(shown) <= self.cooldown => {
                self.subsequent
            }
            _ => self.initial,
        }
    }
}

impl From<&TooltipConfig> for DelayPolicy {
    fn from(config: &TooltipConfig) -> Self {
        Self::new(config.initial_delay, config.subsequent_delay, config.cooldown)
    }
}
