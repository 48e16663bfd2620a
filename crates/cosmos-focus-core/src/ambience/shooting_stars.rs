//! Occasional shooting stars.
//!
//! The spawner runs on a caller-supplied clock (time since mount). Each star
//! carries its own animation parameters and is dropped one second after its
//! animation would have finished.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use serde::Serialize;

use crate::storage::ShootingStarConfig;

const LINGER_SECS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShootingStar {
    pub id: u64,
    /// Vertical start, percent of viewport height. May be negative.
    pub top_pct: i32,
    /// Horizontal start, percent of viewport width.
    pub left_pct: i32,
    /// Animation length in seconds.
    pub duration: f64,
    /// Animation delay in seconds.
    pub delay: f64,
    #[serde(skip)]
    pub spawned_at: Duration,
}

impl ShootingStar {
    pub fn expires_at(&self) -> Duration {
        self.spawned_at + Duration::from_secs_f64(self.duration + self.delay + LINGER_SECS)
    }
}

pub struct ShootingStarSpawner {
    rng: Mcg128Xsl64,
    min_interval_ms: u64,
    max_interval_ms: u64,
    next_spawn: Option<Duration>,
    next_id: u64,
    stars: Vec<ShootingStar>,
}

impl ShootingStarSpawner {
    pub fn new(config: &ShootingStarConfig) -> Self {
        Self::with_rng(config, Mcg128Xsl64::from_entropy())
    }

    pub fn with_seed(config: &ShootingStarConfig, seed: u64) -> Self {
        Self::with_rng(config, Mcg128Xsl64::seed_from_u64(seed))
    }

    fn with_rng(config: &ShootingStarConfig, rng: Mcg128Xsl64) -> Self {
        let min = config.min_interval_ms;
        Self {
            rng,
            min_interval_ms: min,
            max_interval_ms: config.max_interval_ms.max(min),
            next_spawn: None,
            next_id: 0,
            stars: Vec::new(),
        }
    }

    pub fn stars(&self) -> &[ShootingStar] {
        &self.stars
    }

    pub fn is_running(&self) -> bool {
        self.next_spawn.is_some()
    }

    /// When the next star is due, if the spawner is running.
    pub fn next_spawn(&self) -> Option<Duration> {
        self.next_spawn
    }

    /// Begin spawning. Half the time a star appears immediately.
    pub fn start(&mut self, now: Duration) {
        if self.is_running() {
            return;
        }
        if self.rng.gen_bool(0.5) {
            self.spawn(now);
        }
        self.schedule(now);
    }

    /// Cancel the pending spawn and clear the sky.
    pub fn stop(&mut self) {
        self.next_spawn = None;
        self.stars.clear();
    }

    /// Run every spawn due by `now` and drop expired stars. Returns how many
    /// stars were spawned.
    pub fn advance(&mut self, now: Duration) -> usize {
        let mut spawned = 0;
        while let Some(due) = self.next_spawn {
            if due > now {
                break;
            }
            self.spawn(due);
            self.schedule(due);
            spawned += 1;
        }
        self.stars.retain(|s| s.expires_at() > now);
        spawned
    }

    fn schedule(&mut self, from: Duration) {
        let span = (self.max_interval_ms - self.min_interval_ms) as f64;
        let wait = self.min_interval_ms as f64 + self.rng.gen::<f64>() * span;
        self.next_spawn = Some(from + Duration::from_millis(wait.max(1.0) as u64));
    }

    fn spawn(&mut self, at: Duration) {
        let star = ShootingStar {
            id: self.next_id,
            top_pct: (self.rng.gen::<f64>() * 70.0).floor() as i32 - 50,
            left_pct: (self.rng.gen::<f64>() * 100.0).floor() as i32 + 20,
            duration: self.rng.gen::<f64>() * 1.5 + 2.0,
            delay: self.rng.gen::<f64>() * 0.5,
            spawned_at: at,
        };
        tracing::trace!(id = star.id, "shooting star");
        self.next_id += 1;
        self.stars.push(star);
    }
}

impl Drop for ShootingStarSpawner {
    fn drop(&mut self) {
        self.stop();
    }
}
