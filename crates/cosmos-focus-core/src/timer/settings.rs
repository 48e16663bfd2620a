//! Per-mode durations and the staged copy edited by the settings dialog.

use serde::{Deserialize, Serialize};

use super::mode::TimerMode;
use crate::error::StorageError;
use crate::storage::{KeyValueStore, SETTINGS_KEY};

/// Shortest duration a mode can be configured to.
pub const MIN_DURATION_SECS: u64 = 60;
/// Upper bound of the minutes input.
pub const MAX_DURATION_MIN: u64 = 120;

/// Configured duration of each mode, in whole seconds.
///
/// One field per mode, so every mode always has a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    #[serde(rename = "Focus")]
    pub focus: u64,
    #[serde(rename = "Short Break")]
    pub short_break: u64,
    #[serde(rename = "Long Break")]
    pub long_break: u64,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            focus: 25 * 60,
            short_break: 5 * 60,
            long_break: 15 * 60,
        }
    }
}

impl TimerSettings {
    pub fn duration_secs(&self, mode: TimerMode) -> u64 {
        match mode {
            TimerMode::Focus => self.focus,
            TimerMode::ShortBreak => self.short_break,
            TimerMode::LongBreak => self.long_break,
        }
    }

    pub fn set_duration_secs(&mut self, mode: TimerMode, secs: u64) {
        match mode {
            TimerMode::Focus => self.focus = secs,
            TimerMode::ShortBreak => self.short_break = secs,
            TimerMode::LongBreak => self.long_break = secs,
        }
    }

    fn is_valid(&self) -> bool {
        TimerMode::ALL
            .iter()
            .all(|&m| self.duration_secs(m) >= MIN_DURATION_SECS)
    }

    /// Read the persisted settings; absent or malformed records yield defaults.
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        let raw = match store.get(SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read timer settings, using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str::<TimerSettings>(&raw) {
            Ok(settings) if settings.is_valid() => settings,
            Ok(_) => {
                tracing::debug!("persisted timer settings below minimum, using defaults");
                Self::default()
            }
            Err(e) => {
                tracing::debug!(error = %e, "discarding malformed timer settings");
                Self::default()
            }
        }
    }

    /// Overwrite the persisted record.
    pub fn save<S: KeyValueStore>(&self, store: &S) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        store.set(SETTINGS_KEY, &json)
    }
}

/// Parse a minutes field the way a numeric text input does: leading digits
/// win, anything unparsable counts as zero, and the result is clamped to
/// `1..=MAX_DURATION_MIN`.
pub fn parse_minutes_input(input: &str) -> u64 {
    let digits: String = input
        .trim()
        .trim_start_matches('+')
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let minutes = digits.parse::<u64>().unwrap_or(0);
    minutes.clamp(1, MAX_DURATION_MIN)
}

/// An edited-but-uncommitted copy of the settings.
///
/// `save` hands back the whole record for an atomic commit; `cancel` drops it
/// and the live settings never see the edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsDraft {
    staged: TimerSettings,
}

impl SettingsDraft {
    pub fn open(current: &TimerSettings) -> Self {
        Self { staged: *current }
    }

    pub fn staged(&self) -> &TimerSettings {
        &self.staged
    }

    /// Whole minutes shown for `mode`.
    pub fn minutes(&self, mode: TimerMode) -> u64 {
        self.staged.duration_secs(mode) / 60
    }

    /// Apply raw text from the minutes field.
    pub fn set_minutes_input(&mut self, mode: TimerMode, input: &str) {
        let minutes = parse_minutes_input(input);
        self.staged.set_duration_secs(mode, minutes * 60);
    }

    pub fn set_minutes(&mut self, mode: TimerMode, minutes: u64) {
        let minutes = minutes.clamp(1, MAX_DURATION_MIN);
        self.staged.set_duration_secs(mode, minutes * 60);
    }

    pub fn save(self) -> TimerSettings {
        self.staged
    }

    pub fn cancel(self) {}
}
