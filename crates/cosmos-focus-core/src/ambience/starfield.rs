//! Twinkling starfield.
//!
//! Stars live in device pixels: the canvas is the logical viewport scaled by
//! the device pixel ratio, and so are star radii. Density follows logical
//! area so high-DPI screens do not get more stars. Every frame advances each
//! star's phase; opacity oscillates around its base alpha.

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::storage::StarfieldConfig;

const MIN_ALPHA: f64 = 0.1;
const MAX_ALPHA: f64 = 1.0;

/// Logical viewport size and pixel density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    /// Negative or non-finite sizes collapse to an empty sky.
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width: extent(width),
            height: extent(height),
            device_pixel_ratio,
        }
    }

    /// Pixel ratio, treating unset or nonsensical values as 1.
    pub fn dpr(&self) -> f64 {
        if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        }
    }

    /// Backing canvas size in device pixels.
    pub fn canvas_size(&self) -> (u32, u32) {
        let dpr = self.dpr();
        ((self.width * dpr) as u32, (self.height * dpr) as u32)
    }
}

fn extent(v: f64) -> f64 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub base_alpha: f64,
    pub phase: f64,
    pub speed: f64,
}

impl Star {
    pub fn opacity(&self, amplitude: f64) -> f64 {
        (self.base_alpha + self.phase.sin() * amplitude).clamp(MIN_ALPHA, MAX_ALPHA)
    }
}

/// One star as drawn in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StarSprite {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub alpha: f64,
}

pub struct Starfield {
    viewport: Viewport,
    stars: Vec<Star>,
    px_per_star: f64,
    twinkle_amplitude: f64,
    rng: Mcg128Xsl64,
}

impl Starfield {
    pub fn new(viewport: Viewport, config: &StarfieldConfig) -> Self {
        Self::with_rng(viewport, config, Mcg128Xsl64::from_entropy())
    }

    pub fn with_seed(viewport: Viewport, config: &StarfieldConfig, seed: u64) -> Self {
        Self::with_rng(viewport, config, Mcg128Xsl64::seed_from_u64(seed))
    }

    fn with_rng(viewport: Viewport, config: &StarfieldConfig, rng: Mcg128Xsl64) -> Self {
        let mut field = Self {
            viewport,
            stars: Vec::new(),
            px_per_star: config.px_per_star.max(1.0),
            twinkle_amplitude: config.twinkle_amplitude,
            rng,
        };
        field.seed();
        field
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Stars for a logical area.
    pub fn star_count(&self) -> usize {
        let count = (self.viewport.width * self.viewport.height / self.px_per_star).floor();
        if count.is_finite() && count > 0.0 {
            count as usize
        } else {
            0
        }
    }

    fn seed(&mut self) {
        let dpr = self.viewport.dpr();
        let (width, height) = (self.viewport.width * dpr, self.viewport.height * dpr);
        let count = self.star_count();
        let rng = &mut self.rng;
        self.stars = (0..count)
            .map(|_| Star {
                x: rng.gen::<f64>() * width,
                y: rng.gen::<f64>() * height,
                radius: (rng.gen::<f64>() * 1.2 + 0.5) * dpr,
                base_alpha: rng.gen::<f64>() * 0.5 + 0.3,
                phase: rng.gen::<f64>() * TAU,
                speed: rng.gen::<f64>() * 0.05 + 0.005,
            })
            .collect();
        tracing::trace!(count, dpr, "starfield seeded");
    }

    /// Replace the viewport and re-seed every star.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.seed();
    }

    /// Advance one animation frame.
    pub fn advance(&mut self) {
        for star in &mut self.stars {
            star.phase += star.speed;
        }
    }

    /// What to draw this frame.
    pub fn sprites(&self) -> impl Iterator<Item = StarSprite> + '_ {
        let amplitude = self.twinkle_amplitude;
        self.stars.iter().map(move |s| StarSprite {
            x: s.x,
            y: s.y,
            radius: s.radius,
            alpha: s.opacity(amplitude),
        })
    }

    /// Character-cell preview: each cell shows its brightest star.
    pub fn render_ascii(&self, cols: usize, rows: usize) -> String {
        if cols == 0 || rows == 0 {
            return String::new();
        }
        let (cw, ch) = self.viewport.canvas_size();
        let (cw, ch) = (f64::from(cw.max(1)), f64::from(ch.max(1)));
        let mut cells = vec![0.0f64; cols * rows];
        for sprite in self.sprites() {
            let col = ((sprite.x / cw) * cols as f64) as usize;
            let row = ((sprite.y / ch) * rows as f64) as usize;
            if col < cols && row < rows {
                let cell = &mut cells[row * cols + col];
                *cell = cell.max(sprite.alpha);
            }
        }
        let mut out = String::with_capacity((cols + 1) * rows);
        for row in cells.chunks(cols) {
            for &alpha in row {
                out.push(match alpha {
                    a if a <= 0.0 => ' ',
                    a if a < 0.35 => '.',
                    a if a < 0.6 => '+',
                    a if a < 0.85 => '*',
                    _ => '@',
                });
            }
            out.push('\n');
        }
        out
    }
}
