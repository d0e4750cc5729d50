//! One-shot gain envelope for synthesized effects.
//!
//! Unlike a gated ADSR, an effect envelope knows its total duration up
//! front: the release always ends exactly at the end of the buffer.

use serde::{Deserialize, Serialize};

/// Envelope parameters as they appear in the patch schema.
/// Times are in seconds, `sustain` is a level [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeConfig {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

/// A one-shot envelope fitted to a fixed duration.
///
/// Stages that do not fit are truncated, release first: the release is
/// honored up to the full duration, then attack, then decay; whatever
/// time remains is the sustain hold.
#[derive(Debug, Clone, Copy)]
pub struct OneShotEnvelope {
    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,
    duration: f32,
}

impl OneShotEnvelope {
    pub fn new(config: &EnvelopeConfig, duration: f32) -> Self {
        let release = config.release.max(0.0).min(duration);
        let mut remaining = duration - release;
        let attack = config.attack.max(0.0).min(remaining);
        remaining -= attack;
        let decay = config.decay.max(0.0).min(remaining);

        OneShotEnvelope {
            attack,
            decay,
            sustain: config.sustain.clamp(0.0, 1.0),
            release,
            duration,
        }
    }

    /// Envelope level at time `t` seconds, in [0, 1].
    pub fn level_at(&self, t: f32) -> f32 {
        if t < 0.0 || t >= self.duration {
            return 0.0;
        }
        if t < self.attack {
            return t / self.attack;
        }
        let t_decay = t - self.attack;
        if t_decay < self.decay {
            return 1.0 - (1.0 - self.sustain) * (t_decay / self.decay);
        }
        let release_start = self.duration - self.release;
        if t < release_start {
            return self.sustain;
        }
        if self.release <= 0.0 {
            return self.sustain;
        }
        self.sustain * (1.0 - (t - release_start) / self.release)
    }

    /// Multiply the envelope contour into a sample buffer.
    pub fn apply(&self, samples: &mut [f32], sample_rate: u32) {
        let sr = sample_rate as f32;
        for (i, sample) in samples.iter_mut().enumerate() {
            *sample *= self.level_at(i as f32 / sr);
        }
    }
}
