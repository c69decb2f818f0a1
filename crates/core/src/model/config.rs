use chrono::Duration;
use thiserror::Error;

use crate::model::difficulty::DifficultyFilter;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("requested question count must be > 0")]
    ZeroCount,

    #[error("countdown must be > 0 seconds")]
    ZeroCountdown,
}

//
// ─── TIMER POLICY ──────────────────────────────────────────────────────────────
//

/// Per-session countdown policy, fixed at setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerPolicy {
    #[default]
    Off,
    Countdown {
        total: Duration,
    },
}

impl TimerPolicy {
    /// Countdown of a whole number of seconds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ZeroCountdown` for zero.
    pub fn countdown_secs(secs: u32) -> Result<Self, ConfigError> {
        if secs == 0 {
            return Err(ConfigError::ZeroCountdown);
        }
        Ok(TimerPolicy::Countdown {
            total: Duration::seconds(i64::from(secs)),
        })
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        matches!(self, TimerPolicy::Countdown { .. })
    }
}

//
// ─── SESSION CONFIGURATION ─────────────────────────────────────────────────────
//

/// Setup-stage choices for one assessment run.
///
/// Set once before the session starts; the runner snapshots it and treats it
/// as read-only from then on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    requested: u32,
    filter: DifficultyFilter,
    shuffle: bool,
    timer: TimerPolicy,
}

impl SessionConfig {
    /// Creates a validated session configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ZeroCount` when no questions are requested.
    pub fn new(
        requested: u32,
        filter: DifficultyFilter,
        shuffle: bool,
        timer: TimerPolicy,
    ) -> Result<Self, ConfigError> {
        if requested == 0 {
            return Err(ConfigError::ZeroCount);
        }
        Ok(Self {
            requested,
            filter,
            shuffle,
            timer,
        })
    }

    /// Ten mixed questions, shuffled, untimed.
    #[must_use]
    pub fn default_practice() -> Self {
        Self {
            requested: 10,
            filter: DifficultyFilter::Mixed,
            shuffle: true,
            timer: TimerPolicy::Off,
        }
    }

    #[must_use]
    pub fn requested(&self) -> u32 {
        self.requested
    }

    #[must_use]
    pub fn filter(&self) -> DifficultyFilter {
        self.filter
    }

    #[must_use]
    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    #[must_use]
    pub fn timer(&self) -> TimerPolicy {
        self.timer
    }
}
