//! Timing knobs shared by every conversation handle.

use std::time::Duration;

use botcheck_core::{HarnessError, Result};

/// Wait, poll and throttle settings consumed by [`crate::Conversation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Deadline for a reply when the caller passes no explicit timeout.
    pub reply_timeout: Duration,
    /// Fixed delay between two fetches while waiting for a reply.
    pub poll_interval: Duration,
    /// Minimum spacing between two outbound actions of one conversation.
    pub action_interval: Duration,
    /// Added on top of the wait the transport asks for after a flood rejection.
    pub flood_margin: Duration,
    /// How many recent messages one fetch returns.
    pub fetch_limit: usize,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            reply_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(500),
            action_interval: Duration::from_millis(1000),
            flood_margin: Duration::from_millis(1000),
            fetch_limit: 10,
        }
    }
}

impl Pacing {
    /// Rejects values that would disable a wait or make polling pointless.
    pub fn validate(&self) -> Result<()> {
        let zero = [
            ("REPLY_TIMEOUT_SECS", self.reply_timeout),
            ("POLL_INTERVAL_MS", self.poll_interval),
            ("ACTION_INTERVAL_MS", self.action_interval),
            ("FLOOD_MARGIN_MS", self.flood_margin),
        ]
        .into_iter()
        .find(|(_, value)| value.is_zero());
        if let Some((name, _)) = zero {
            return Err(HarnessError::Config(format!("{} must be positive", name)));
        }
        if self.poll_interval >= self.reply_timeout {
            return Err(HarnessError::Config(format!(
                "POLL_INTERVAL_MS ({:?}) must be shorter than REPLY_TIMEOUT_SECS ({:?})",
                self.poll_interval, self.reply_timeout
            )));
        }
        if self.fetch_limit == 0 {
            return Err(HarnessError::Config("FETCH_LIMIT must be positive".to_string()));
        }
        Ok(())
    }
}
