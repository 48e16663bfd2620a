//! Minimal signal-graph primitives: automatable parameters, oscillators, a
//! looping noise buffer and a low-pass biquad.
//!
//! Times are in seconds on the owning context's clock.

use std::f64::consts::PI;

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ParamEvent {
    SetValue { value: f64, time: f64 },
    LinearRamp { value: f64, time: f64 },
}

impl ParamEvent {
    fn time(&self) -> f64 {
        match *self {
            ParamEvent::SetValue { time, .. } | ParamEvent::LinearRamp { time, .. } => time,
        }
    }
}

/// A value with a timeline of jumps and linear ramps.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioParam {
    default: f64,
    events: Vec<ParamEvent>,
}

impl AudioParam {
    pub fn new(default: f64) -> Self {
        Self {
            default,
            events: Vec::new(),
        }
    }

    fn insert(&mut self, event: ParamEvent) {
        let at = self
            .events
            .iter()
            .position(|e| e.time() > event.time())
            .unwrap_or(self.events.len());
        self.events.insert(at, event);
    }

    pub fn set_value_at(&mut self, value: f64, time: f64) {
        self.insert(ParamEvent::SetValue { value, time });
    }

    /// Ramp linearly from the previous event's value to `value`, arriving
    /// at `time`.
    pub fn linear_ramp_to(&mut self, value: f64, time: f64) {
        self.insert(ParamEvent::LinearRamp { value, time });
    }

    /// Drop every event at or after `time`. Finished automation before
    /// `time` is folded into a single jump to the value held at `time`, so
    /// the timeline never outgrows the segment being scheduled.
    pub fn cancel_scheduled(&mut self, time: f64) {
        if self.events.is_empty() {
            return;
        }
        let held = self.value_at(time);
        self.events.clear();
        self.events.push(ParamEvent::SetValue { value: held, time });
    }

    #[cfg(test)]
    pub(crate) fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn value_at(&self, t: f64) -> f64 {
        let mut value = self.default;
        let mut prev_time = 0.0;
        for event in &self.events {
            match *event {
                ParamEvent::SetValue { value: v, time } => {
                    if time > t {
                        return value;
                    }
                    value = v;
                    prev_time = time;
                }
                ParamEvent::LinearRamp { value: v, time } => {
                    if time > t {
                        let span = time - prev_time;
                        if span <= 0.0 {
                            return value;
                        }
                        let frac = ((t - prev_time) / span).clamp(0.0, 1.0);
                        return value + (v - value) * frac;
                    }
                    value = v;
                    prev_time = time;
                }
            }
        }
        value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

impl Waveform {
    fn sample(self, phase: f64) -> f64 {
        match self {
            Waveform::Sine => (2.0 * PI * phase).sin(),
            Waveform::Triangle => 4.0 * (phase - 0.5).abs() - 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Oscillator {
    pub waveform: Waveform,
    pub frequency: f64,
    /// Detune in cents.
    pub detune: AudioParam,
    phase: f64,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency: f64) -> Self {
        Self {
            waveform,
            frequency,
            detune: AudioParam::new(0.0),
            phase: 0.0,
        }
    }

    pub fn effective_frequency(&self, t: f64) -> f64 {
        self.frequency * 2f64.powf(self.detune.value_at(t) / 1200.0)
    }

    pub fn next_sample(&mut self, t: f64, dt: f64) -> f64 {
        let out = self.waveform.sample(self.phase);
        self.phase = (self.phase + self.effective_frequency(t) * dt).fract();
        out
    }
}

/// White noise in `[-1, 1)`, played in a loop.
#[derive(Debug, Clone)]
pub struct NoiseLoop {
    samples: Vec<f64>,
    pos: usize,
}

impl NoiseLoop {
    pub fn generate<R: Rng>(rng: &mut R, len: usize) -> Self {
        let samples = (0..len.max(1)).map(|_| rng.gen::<f64>() * 2.0 - 1.0).collect();
        Self { samples, pos: 0 }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn next_sample(&mut self) -> f64 {
        let out = self.samples[self.pos];
        self.pos = (self.pos + 1) % self.samples.len();
        out
    }
}

/// Second-order low-pass (RBJ cookbook), Q = 1.
#[derive(Debug, Clone)]
pub struct LowpassFilter {
    pub cutoff_hz: f64,
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl LowpassFilter {
    pub fn new(cutoff_hz: f64, sample_rate: f64) -> Self {
        let q = 1.0;
        let w0 = 2.0 * PI * cutoff_hz / sample_rate;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * q);
        let a0 = 1.0 + alpha;
        Self {
            cutoff_hz,
            b0: (1.0 - cos_w0) / 2.0 / a0,
            b1: (1.0 - cos_w0) / a0,
            b2: (1.0 - cos_w0) / 2.0 / a0,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    pub fn process(&mut self, x: f64) -> f64 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}
