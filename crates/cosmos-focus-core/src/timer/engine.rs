//! Countdown engine implementation.
//!
//! The engine is a tick-driven state machine. It owns no timer of its own --
//! the caller invokes `tick()` once per second while the countdown runs (see
//! [`TickDriver`](super::TickDriver)).
//!
//! ## State Transitions
//!
//! ```text
//! Stopped --toggle--> Running --tick (reaches 0)--> Stopped
//!    ^                  |
//!    +--toggle/reset----+
//! ```
//!
//! Switching modes or resetting always lands in `Stopped` with the mode's full
//! configured duration.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::mode::TimerMode;
use super::settings::TimerSettings;
use crate::events::Event;

/// Radius of the progress ring, in the 256x256 view box.
pub const RING_RADIUS: f64 = 120.0;

/// Core countdown state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownEngine {
    settings: TimerSettings,
    mode: TimerMode,
    remaining_secs: u64,
    running: bool,
}

impl CountdownEngine {
    /// Start stopped in `Focus` with its full configured duration.
    pub fn new(settings: TimerSettings) -> Self {
        Self {
            settings,
            mode: TimerMode::Focus,
            remaining_secs: settings.duration_secs(TimerMode::Focus),
            running: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    /// Configured duration of the active mode.
    pub fn total_secs(&self) -> u64 {
        self.settings.duration_secs(self.mode)
    }

    /// 0.0 ..= 1.0 progress through the active mode.
    ///
    /// A countdown left running across a settings edit can hold more time
    /// than the new duration; progress is clamped at zero in that case.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        let elapsed = total as f64 - self.remaining_secs as f64;
        (elapsed / total as f64).clamp(0.0, 1.0)
    }

    pub fn progress_pct(&self) -> f64 {
        self.progress() * 100.0
    }

    /// Stroke offset of the progress ring: full circumference when nothing
    /// has elapsed, zero when done.
    pub fn ring_offset(&self) -> f64 {
        ring_circumference() * (1.0 - self.progress())
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format_time(self.remaining_secs)
    }

    /// Label of the start/pause control.
    pub fn action_label(&self) -> &'static str {
        if self.running {
            "PAUSE"
        } else {
            "START"
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.mode,
            running: self.running,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            display: self.display(),
            progress_pct: self.progress_pct(),
            ring_offset: self.ring_offset(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn switch_mode(&mut self, mode: TimerMode) -> Event {
        self.mode = mode;
        self.remaining_secs = self.settings.duration_secs(mode);
        self.running = false;
        Event::ModeSwitched {
            mode,
            duration_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Flip between running and paused.
    ///
    /// Starting at zero is allowed; the next `tick()` stops it again.
    pub fn toggle(&mut self) -> Event {
        self.running = !self.running;
        if self.running {
            Event::TimerStarted {
                mode: self.mode,
                remaining_secs: self.remaining_secs,
                at: Utc::now(),
            }
        } else {
            Event::TimerPaused {
                mode: self.mode,
                remaining_secs: self.remaining_secs,
                at: Utc::now(),
            }
        }
    }

    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        Some(self.toggle())
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        Some(self.toggle())
    }

    pub fn reset(&mut self) -> Event {
        self.running = false;
        self.remaining_secs = self.total_secs();
        Event::TimerReset {
            mode: self.mode,
            duration_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// One one-second step. Returns `Some(Event::TimerCompleted)` on the tick
    /// that reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        if self.remaining_secs == 0 {
            self.running = false;
            return None;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs == 0 {
            self.running = false;
            return Some(Event::TimerCompleted {
                mode: self.mode,
                at: Utc::now(),
            });
        }
        None
    }

    /// Replace the settings record.
    ///
    /// A stopped countdown picks up the active mode's new duration at once;
    /// a running one keeps its remaining time until the next mode switch or
    /// reset.
    pub fn apply_settings(&mut self, settings: TimerSettings) -> Event {
        self.settings = settings;
        let display_updated = !self.running;
        if display_updated {
            self.remaining_secs = settings.duration_secs(self.mode);
        }
        Event::SettingsApplied {
            settings,
            display_updated,
            at: Utc::now(),
        }
    }
}

impl Default for CountdownEngine {
    fn default() -> Self {
        Self::new(TimerSettings::default())
    }
}

pub fn ring_circumference() -> f64 {
    2.0 * std::f64::consts::PI * RING_RADIUS
}

/// Zero-padded `MM:SS`; minutes are not truncated past 99.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
