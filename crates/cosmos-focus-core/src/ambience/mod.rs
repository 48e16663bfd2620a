//! Decorative layer: a twinkling starfield, occasional shooting stars and
//! synthesized ambient audio. Nothing here affects timer or task state.

mod audio;
mod shooting_stars;
mod starfield;
mod synth;

pub use audio::{
    AmbientSound, AudioContext, ContextState, SoundGraph, Soundscape, FADE_IN_SECS, FADE_OUT_SECS,
};
pub use shooting_stars::{ShootingStar, ShootingStarSpawner};
pub use starfield::{Star, StarSprite, Starfield, Viewport};
pub use synth::{AudioParam, LowpassFilter, NoiseLoop, Oscillator, Waveform};
