mod driver;
mod engine;
mod focus_timer;
mod mode;
mod settings;

pub use driver::{TickDriver, TICK_PERIOD};
pub use engine::{format_time, ring_circumference, CountdownEngine, RING_RADIUS};
pub use focus_timer::FocusTimer;
pub use mode::TimerMode;
pub use settings::{
    parse_minutes_input, SettingsDraft, TimerSettings, MAX_DURATION_MIN, MIN_DURATION_SECS,
};
