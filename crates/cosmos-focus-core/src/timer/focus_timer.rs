//! Countdown engine bound to the local store.
//!
//! Settings are read from the store on construction and written back
//! synchronously on every `apply_settings`. The running countdown itself is
//! driven through [`FocusTimer::run`], which keeps a [`TickDriver`] in step
//! with the engine's running flag.

use super::driver::TickDriver;
use super::engine::CountdownEngine;
use super::mode::TimerMode;
use super::settings::{SettingsDraft, TimerSettings};
use crate::error::Result;
use crate::events::Event;
use crate::storage::{KeyValueStore, TIMER_STATE_KEY};

pub struct FocusTimer<S: KeyValueStore> {
    store: S,
    engine: CountdownEngine,
}

impl<S: KeyValueStore> FocusTimer<S> {
    /// Fresh countdown in `Focus` using the persisted settings.
    pub fn load(store: S) -> Self {
        let settings = TimerSettings::load(&store);
        Self {
            store,
            engine: CountdownEngine::new(settings),
        }
    }

    /// Resume a countdown saved with [`FocusTimer::save_state`].
    ///
    /// The persisted settings record is authoritative; a saved engine whose
    /// settings disagree has them replaced under the usual apply rules. A
    /// stopped engine holding more time than its mode allows is discarded.
    pub fn restore(store: S) -> Self {
        let settings = TimerSettings::load(&store);
        let saved = store
            .get(TIMER_STATE_KEY)
            .ok()
            .flatten()
            .and_then(|raw| serde_json::from_str::<CountdownEngine>(&raw).ok());
        let engine = match saved {
            Some(mut engine) => {
                if *engine.settings() != settings {
                    engine.apply_settings(settings);
                }
                if !engine.is_running() && engine.remaining_secs() > engine.total_secs() {
                    tracing::warn!(
                        remaining = engine.remaining_secs(),
                        total = engine.total_secs(),
                        "discarding saved countdown state"
                    );
                    CountdownEngine::new(settings)
                } else {
                    engine
                }
            }
            None => CountdownEngine::new(settings),
        };
        Self { store, engine }
    }

    /// Persist the countdown state so a later process can `restore` it.
    pub fn save_state(&self) -> Result<()> {
        let json = serde_json::to_string(&self.engine)?;
        self.store.set(TIMER_STATE_KEY, &json)?;
        Ok(())
    }

    pub fn engine(&self) -> &CountdownEngine {
        &self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn switch_mode(&mut self, mode: TimerMode) -> Event {
        self.engine.switch_mode(mode)
    }

    pub fn toggle(&mut self) -> Event {
        self.engine.toggle()
    }

    pub fn reset(&mut self) -> Event {
        self.engine.reset()
    }

    pub fn tick(&mut self) -> Option<Event> {
        self.engine.tick()
    }

    /// Open the settings dialog on a staged copy of the live settings.
    pub fn edit_settings(&self) -> SettingsDraft {
        SettingsDraft::open(self.engine.settings())
    }

    /// Commit new settings and persist them.
    ///
    /// # Errors
    /// Returns an error if the store write fails; the engine has already
    /// taken the new settings in that case.
    pub fn apply_settings(&mut self, settings: TimerSettings) -> Result<Event> {
        let event = self.engine.apply_settings(settings);
        settings.save(&self.store)?;
        tracing::debug!(?settings, "timer settings saved");
        Ok(event)
    }

    /// Drive the countdown in real time until it stops.
    ///
    /// One interval exists while the engine runs and none once it stops,
    /// whether by reaching zero or by `on_tick` pausing it. `on_tick` sees
    /// the engine after every tick together with the tick's event.
    pub async fn run<F>(&mut self, driver: &mut TickDriver, mut on_tick: F) -> Option<Event>
    where
        F: FnMut(&mut CountdownEngine, Option<&Event>),
    {
        let mut completed = None;
        loop {
            driver.sync(self.engine.is_running());
            if !driver.is_active() {
                break;
            }
            driver.tick().await;
            let event = self.engine.tick();
            on_tick(&mut self.engine, event.as_ref());
            if event.is_some() {
                completed = event;
            }
        }
        completed
    }
}
