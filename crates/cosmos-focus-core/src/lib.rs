//! # Cosmos Focus Core Library
//!
//! Core logic for the Cosmos Focus productivity companion. Every operation is
//! available through the standalone CLI binary; any graphical front-end is a
//! thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Timer**: a one-second countdown state machine over three modes. The
//!   caller drives it with `tick()`, directly or through a [`TickDriver`].
//! - **Tasks**: the mission log, an ordered task list persisted on every change
//! - **Quote**: a quote panel backed by a text-generation service, with fixed
//!   fallbacks for empty answers and failures
//! - **Ambience**: starfield, shooting stars and synthesized ambient audio
//! - **Storage**: a string key-value store (SQLite on disk) and TOML
//!   configuration
//!
//! ## Key Components
//!
//! - [`CountdownEngine`]: countdown state machine
//! - [`FocusTimer`]: the engine wired to persisted settings
//! - [`TaskStore`]: the mission log
//! - [`QuotePanel`]: quote state with single-flight refresh
//! - [`AmbientSound`]: audio player owning the signal graph

pub mod ambience;
pub mod error;
pub mod events;
pub mod quote;
pub mod storage;
pub mod task;
pub mod timer;

pub use ambience::{AmbientSound, ShootingStarSpawner, Soundscape, Starfield, Viewport};
pub use error::{ConfigError, CoreError, QuoteError, StorageError, ValidationError};
pub use events::Event;
pub use quote::{fetch_quote, GeminiQuoteSource, QuotePanel, QuoteSource};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
pub use task::{Task, TaskStore};
pub use timer::{
    format_time, CountdownEngine, FocusTimer, SettingsDraft, TickDriver, TimerMode, TimerSettings,
};
