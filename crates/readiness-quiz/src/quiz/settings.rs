use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::score::ScoreDenominator;

pub const DEFAULT_ADVANCE_DELAY_MS: u64 = 700;
pub const DEFAULT_TRANSITION_MS: u64 = 300;
pub const DEFAULT_LEAD_SUBMIT_DELAY_MS: u64 = 2500;
pub const DEFAULT_SESSION_TTL_SECS: u64 = 1800;

/// Timing and scoring dials for a quiz deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    /// Pause after an answer before the view starts moving on.
    pub advance_delay_ms: u64,
    /// Length of the fade between question views.
    pub transition_ms: u64,
    /// Simulated latency for lead submission.
    pub lead_submit_delay_ms: u64,
    pub score_denominator: ScoreDenominator,
    /// Idle time after which a stored attempt may be evicted.
    pub session_ttl_secs: u64,
}

impl QuizSettings {
    /// Zero delays, handy for scripted runs.
    pub fn immediate() -> Self {
        Self {
            advance_delay_ms: 0,
            transition_ms: 0,
            lead_submit_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    pub fn lead_submit_delay(&self) -> Duration {
        Duration::from_millis(self.lead_submit_delay_ms)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            advance_delay_ms: DEFAULT_ADVANCE_DELAY_MS,
            transition_ms: DEFAULT_TRANSITION_MS,
            lead_submit_delay_ms: DEFAULT_LEAD_SUBMIT_DELAY_MS,
            score_denominator: ScoreDenominator::FixedTotal,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}
