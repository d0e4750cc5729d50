//! Anti-aliased oscillator using PolyBLEP.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// Supported waveform shapes. The names match the `waveform` field of
/// the patch schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// A band-limited oscillator with anti-aliasing (PolyBLEP).
///
/// `frequency` is public so the synthesizer can sweep it per sample.
#[derive(Debug, Clone)]
pub struct Oscillator {
    pub waveform: Waveform,
    pub frequency: f32,
    phase: f32,
    sample_rate: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency: f32, sample_rate: u32) -> Self {
        Oscillator {
            waveform,
            frequency,
            phase: 0.0,
            sample_rate: sample_rate as f32,
        }
    }

    /// Phase increment per sample.
    fn phase_inc(&self) -> f32 {
        self.frequency / self.sample_rate
    }

    /// Generate the next sample.
    pub fn next_sample(&mut self) -> f32 {
        let inc = self.phase_inc();
        let sample = match self.waveform {
            Waveform::Sine => (2.0 * PI * self.phase).sin(),
            Waveform::Sawtooth => self.sawtooth(inc),
            Waveform::Square => self.square(inc),
            Waveform::Triangle => self.triangle(),
        };

        self.phase += inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        sample
    }

    /// Naive sawtooth rises from -1 to +1, then drops. PolyBLEP corrects
    /// the discontinuity at the wrap.
    fn sawtooth(&self, inc: f32) -> f32 {
        let naive = 2.0 * self.phase - 1.0;
        naive - poly_blep(self.phase, inc)
    }

    /// Square wave with PolyBLEP corrections at both edges.
    fn square(&self, inc: f32) -> f32 {
        let mut value = if self.phase < 0.5 { 1.0 } else { -1.0 };
        value += poly_blep(self.phase, inc);
        value -= poly_blep((self.phase + 0.5) % 1.0, inc);
        value
    }

    /// Piecewise-linear triangle: -1 to +1 over [0, 0.5], back down over
    /// [0.5, 1]. Harmonics fall off fast enough that no correction is
    /// applied.
    fn triangle(&self) -> f32 {
        if self.phase < 0.5 {
            4.0 * self.phase - 1.0
        } else {
            3.0 - 4.0 * self.phase
        }
    }

    /// Reset oscillator phase.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// PolyBLEP (Polynomial Band-Limited Step) anti-aliasing correction.
///
/// `t` is the phase [0, 1), `dt` is the phase increment per sample.
/// Returns a correction value to subtract from the naive waveform at
/// discontinuities.
fn poly_blep(t: f32, dt: f32) -> f32 {
    if t < dt {
        let t = t / dt;
        2.0 * t - t * t - 1.0
    } else if t > 1.0 - dt {
        let t = (t - 1.0) / dt;
        t * t + 2.0 * t + 1.0
    } else {
        0.0
    }
}
