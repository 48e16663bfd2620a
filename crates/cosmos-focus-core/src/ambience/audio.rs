//! Synthesized ambient soundscapes.
//!
//! [`AmbientSound`] owns the whole audio lifetime: the context is created on
//! the first `play`, every soundscape routes through one master gain, and at
//! most one soundscape graph exists at a time. Dropping the player tears the
//! graph down and closes the context.

use std::fmt;
use std::str::FromStr;

use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use super::synth::{AudioParam, LowpassFilter, NoiseLoop, Oscillator, Waveform};
use crate::error::ValidationError;

/// Seconds for the master gain to reach full volume on play.
pub const FADE_IN_SECS: f64 = 1.0;
/// Seconds for the master gain to reach silence on stop.
pub const FADE_OUT_SECS: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Soundscape {
    #[default]
    DeepSpace,
    AlphaWaves,
    CosmicRain,
}

impl Soundscape {
    pub const ALL: [Soundscape; 3] = [
        Soundscape::DeepSpace,
        Soundscape::AlphaWaves,
        Soundscape::CosmicRain,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Soundscape::DeepSpace => "deep-space",
            Soundscape::AlphaWaves => "alpha-waves",
            Soundscape::CosmicRain => "cosmic-rain",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Soundscape::DeepSpace => "Deep Space",
            Soundscape::AlphaWaves => "Alpha Focus",
            Soundscape::CosmicRain => "Cosmic Rain",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Soundscape::DeepSpace => "Low frequency drone",
            Soundscape::AlphaWaves => "Binaural beats (10Hz)",
            Soundscape::CosmicRain => "Filtered static noise",
        }
    }
}

impl fmt::Display for Soundscape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Soundscape {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        Soundscape::ALL
            .into_iter()
            .find(|sound| {
                sound.id() == wanted || sound.label().to_ascii_lowercase().replace(' ', "-") == wanted
            })
            .ok_or_else(|| ValidationError::UnknownSound(s.to_string()))
    }
}

enum Voice {
    Tone { oscillator: Oscillator, gain: f64 },
    Noise { source: NoiseLoop, filter: LowpassFilter, gain: f64 },
}

impl Voice {
    fn next_sample(&mut self, t: f64, dt: f64) -> f64 {
        match self {
            Voice::Tone { oscillator, gain } => oscillator.next_sample(t, dt) * *gain,
            Voice::Noise { source, filter, gain } => filter.process(source.next_sample()) * *gain,
        }
    }
}

/// The node graph of one playing soundscape.
pub struct SoundGraph {
    soundscape: Soundscape,
    voices: Vec<Voice>,
    /// Sources, filters and gains this graph holds.
    node_count: usize,
    /// Gain applied to the sum of voices before the master gain.
    bus_gain: f64,
}

impl SoundGraph {
    /// Build the graph for `soundscape`, with automation starting at `t0`.
    pub fn build(soundscape: Soundscape, t0: f64, sample_rate: f64, rng: &mut Mcg128Xsl64) -> Self {
        match soundscape {
            Soundscape::DeepSpace => {
                let layers = [
                    (55.0, Waveform::Sine),
                    (110.0, Waveform::Sine),
                    (112.0, Waveform::Triangle),
                    (165.0, Waveform::Sine),
                ];
                let voices = layers
                    .iter()
                    .enumerate()
                    .map(|(i, &(freq, waveform))| {
                        let mut oscillator = Oscillator::new(waveform, freq);
                        if i == 2 {
                            oscillator.detune.set_value_at(0.0, t0);
                            oscillator.detune.linear_ramp_to(15.0, t0 + 10.0);
                        }
                        Voice::Tone { oscillator, gain: 0.5 }
                    })
                    .collect();
                // Each oscillator has its own gain node.
                Self {
                    soundscape,
                    voices,
                    node_count: layers.len() * 2,
                    bus_gain: 1.0,
                }
            }
            Soundscape::AlphaWaves => {
                let base = 200.0;
                let beat = 10.0;
                let voices = [base, base + beat]
                    .into_iter()
                    .map(|freq| Voice::Tone {
                        oscillator: Oscillator::new(Waveform::Sine, freq),
                        gain: 1.0,
                    })
                    .collect();
                // Both oscillators feed one shared gain node.
                Self {
                    soundscape,
                    voices,
                    node_count: 3,
                    bus_gain: 0.3,
                }
            }
            Soundscape::CosmicRain => {
                let source = NoiseLoop::generate(rng, (sample_rate * 2.0) as usize);
                let filter = LowpassFilter::new(400.0, sample_rate);
                Self {
                    soundscape,
                    voices: vec![Voice::Noise {
                        source,
                        filter,
                        gain: 0.8,
                    }],
                    node_count: 3,
                    bus_gain: 1.0,
                }
            }
        }
    }

    pub fn soundscape(&self) -> Soundscape {
        self.soundscape
    }

    /// Nodes this graph holds, as torn down on stop.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    fn next_sample(&mut self, t: f64, dt: f64) -> f64 {
        let sum: f64 = self.voices.iter_mut().map(|v| v.next_sample(t, dt)).sum();
        sum * self.bus_gain
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Running,
    Closed,
}

/// Sample clock shared by everything the player renders.
#[derive(Debug)]
pub struct AudioContext {
    sample_rate: u32,
    frames: u64,
    state: ContextState,
}

impl AudioContext {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
            frames: 0,
            state: ContextState::Running,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn current_time(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    fn close(&mut self) {
        self.state = ContextState::Closed;
    }
}

/// The ambient audio player.
pub struct AmbientSound {
    sample_rate: u32,
    volume: f64,
    selected: Soundscape,
    playing: bool,
    context: Option<AudioContext>,
    master: AudioParam,
    graph: Option<SoundGraph>,
    /// Context time at which a fading-out graph is torn down.
    teardown_at: Option<f64>,
    rng: Mcg128Xsl64,
}

impl AmbientSound {
    pub fn new(sample_rate: u32, volume: f64) -> Self {
        Self::with_rng(sample_rate, volume, Mcg128Xsl64::from_entropy())
    }

    pub fn with_seed(sample_rate: u32, volume: f64, seed: u64) -> Self {
        Self::with_rng(sample_rate, volume, Mcg128Xsl64::seed_from_u64(seed))
    }

    fn with_rng(sample_rate: u32, volume: f64, rng: Mcg128Xsl64) -> Self {
        Self {
            sample_rate,
            volume,
            selected: Soundscape::default(),
            playing: false,
            context: None,
            master: AudioParam::new(1.0),
            graph: None,
            teardown_at: None,
            rng,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn selected(&self) -> Soundscape {
        self.selected
    }

    pub fn context(&self) -> Option<&AudioContext> {
        self.context.as_ref()
    }

    /// Soundscape of the live graph, if any.
    pub fn active(&self) -> Option<Soundscape> {
        self.graph.as_ref().map(SoundGraph::soundscape)
    }

    pub fn active_node_count(&self) -> usize {
        self.graph.as_ref().map_or(0, SoundGraph::node_count)
    }

    /// Current master gain.
    pub fn master_gain(&self) -> f64 {
        let now = self.context.as_ref().map_or(0.0, AudioContext::current_time);
        self.master.value_at(now)
    }

    /// Start `sound` with a fresh fade-in, tearing down whatever was playing.
    pub fn play(&mut self, sound: Soundscape) {
        let sample_rate = self.sample_rate;
        let ctx = self.context.get_or_insert_with(|| {
            tracing::debug!(sample_rate, "creating audio context");
            AudioContext::new(sample_rate)
        });
        let now = ctx.current_time();
        let rate = ctx.sample_rate() as f64;

        self.teardown_graph();
        self.teardown_at = None;

        self.master.cancel_scheduled(now);
        self.master.set_value_at(0.0, now);
        self.master.linear_ramp_to(self.volume, now + FADE_IN_SECS);

        self.graph = Some(SoundGraph::build(sound, now, rate, &mut self.rng));
        self.selected = sound;
        self.playing = true;
        tracing::info!(sound = %sound, "ambient sound playing");
    }

    /// Fade out, then tear the graph down once the fade completes.
    pub fn stop(&mut self) {
        let Some(ctx) = self.context.as_ref() else {
            self.playing = false;
            return;
        };
        if self.graph.is_none() {
            self.playing = false;
            return;
        }
        let now = ctx.current_time();
        let current = self.master.value_at(now);
        self.master.cancel_scheduled(now);
        self.master.set_value_at(current, now);
        self.master.linear_ramp_to(0.0, now + FADE_OUT_SECS);
        self.teardown_at = Some(now + FADE_OUT_SECS);
    }

    pub fn toggle(&mut self) {
        if self.playing && self.teardown_at.is_none() {
            self.stop();
        } else {
            self.play(self.selected);
        }
    }

    /// Choose a soundscape; switches immediately if something is playing.
    pub fn select(&mut self, sound: Soundscape) {
        self.selected = sound;
        if self.playing {
            self.play(sound);
        }
    }

    /// Render mono samples, advancing the context clock. Silent without a
    /// context or graph.
    pub fn render(&mut self, out: &mut [f32]) {
        let Some(ctx) = self.context.as_mut() else {
            out.fill(0.0);
            return;
        };
        let dt = 1.0 / ctx.sample_rate as f64;
        for sample in out.iter_mut() {
            let t = ctx.current_time();
            if self.teardown_at.is_some_and(|at| t >= at) {
                self.teardown_at = None;
                if let Some(graph) = self.graph.take() {
                    tracing::debug!(nodes = graph.node_count(), "ambient graph torn down");
                }
                self.playing = false;
            }
            let value = match self.graph.as_mut() {
                Some(graph) => graph.next_sample(t, dt) * self.master.value_at(t),
                None => 0.0,
            };
            *sample = value as f32;
            ctx.frames += 1;
        }
    }

    /// Render `secs` seconds into a new buffer.
    pub fn render_secs(&mut self, secs: f64) -> Vec<f32> {
        let len = (secs.max(0.0) * self.sample_rate as f64).round() as usize;
        let mut buf = vec![0.0; len];
        self.render(&mut buf);
        buf
    }

    fn teardown_graph(&mut self) {
        if let Some(graph) = self.graph.take() {
            tracing::debug!(
                sound = %graph.soundscape(),
                nodes = graph.node_count(),
                "ambient graph torn down"
            );
        }
    }

    /// Disconnect everything and close the context.
    pub fn close(&mut self) {
        self.teardown_graph();
        self.teardown_at = None;
        self.playing = false;
        if let Some(mut ctx) = self.context.take() {
            ctx.close();
        }
    }
}

impl Drop for AmbientSound {
    fn drop(&mut self) {
        self.close();
    }
}
