use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{TimerMode, TimerSettings};

/// Every countdown state change produces an Event.
/// Front-ends render from snapshots and react to the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ModeSwitched {
        mode: TimerMode,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerStarted {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero and stopped itself.
    TimerCompleted {
        mode: TimerMode,
        at: DateTime<Utc>,
    },
    SettingsApplied {
        settings: TimerSettings,
        /// Whether the displayed remaining time was recomputed.
        display_updated: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: TimerMode,
        running: bool,
        remaining_secs: u64,
        total_secs: u64,
        display: String,
        progress_pct: f64,
        ring_offset: f64,
        at: DateTime<Utc>,
    },
}
