//! The sound factory — turns declarative patch specs into sample buffers.
//!
//! Every failure path degrades to silence with a logged warning; the
//! factory never panics on bad configuration.

use log::warn;

use super::envelope::{EnvelopeConfig, OneShotEnvelope};
use super::filter::BiquadFilter;
use super::mixer::{Mixer, soft_clip};
use super::noise::NoiseSource;
use super::oscillator::Oscillator;
use super::patch::{FilterConfig, NoiseConfig, SynthesisSpec, ToneConfig};

/// Gain applied when a spec does not set one.
const DEFAULT_GAIN: f32 = 0.8;

/// Renders synthesis specs to mono f32 buffers at a fixed sample rate.
#[derive(Debug, Clone, Copy)]
pub struct Synthesizer {
    sample_rate: u32,
}

impl Synthesizer {
    pub fn new(sample_rate: u32) -> Self {
        Synthesizer { sample_rate }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Render a spec to a sample buffer. Infallible: unsupported or
    /// invalid specs come back as silence.
    pub fn render(&self, spec: &SynthesisSpec) -> Vec<f32> {
        match spec {
            SynthesisSpec::Tone { config } => self.render_tone(config),
            SynthesisSpec::Noise { config } => self.render_noise(config),
            SynthesisSpec::Layer { children, config } => {
                let mix_levels = config.as_ref().and_then(|c| c.mix_levels.as_deref());
                self.render_layer(children, mix_levels)
            }
            SynthesisSpec::Sample { url } => {
                warn!("sample playback is not supported, rendering silence: {url}");
                self.silence(spec.duration())
            }
        }
    }

    fn render_tone(&self, config: &ToneConfig) -> Vec<f32> {
        let Some(num_samples) = self.buffer_len(config.duration) else {
            return Vec::new();
        };
        if !config.frequency.is_finite() || config.frequency <= 0.0 {
            warn!("invalid tone frequency {}, rendering silence", config.frequency);
            return self.silence(config.duration);
        }

        let mut osc = Oscillator::new(config.waveform, config.frequency, self.sample_rate);
        let mut samples = Vec::with_capacity(num_samples);
        for i in 0..num_samples {
            if let Some(end) = config.end_frequency {
                let t = i as f32 / num_samples as f32;
                osc.frequency = config.frequency + (end - config.frequency) * t;
            }
            samples.push(osc.next_sample());
        }

        self.shape(&mut samples, config.envelope.as_ref(), config.filter.as_ref(), config.gain, config.duration);
        samples
    }

    fn render_noise(&self, config: &NoiseConfig) -> Vec<f32> {
        let Some(num_samples) = self.buffer_len(config.duration) else {
            return Vec::new();
        };

        let mut source = NoiseSource::new(config.color);
        let mut samples: Vec<f32> = (0..num_samples).map(|_| source.next_sample()).collect();

        self.shape(&mut samples, config.envelope.as_ref(), config.filter.as_ref(), config.gain, config.duration);
        samples
    }

    fn render_layer(&self, children: &[SynthesisSpec], mix_levels: Option<&[f32]>) -> Vec<f32> {
        if children.is_empty() {
            warn!("layer spec has no children, rendering silence");
            return Vec::new();
        }

        let rendered: Vec<Vec<f32>> = children.iter().map(|c| self.render(c)).collect();
        let longest = rendered.iter().map(|b| b.len()).max().unwrap_or(0);

        let mut mixer = Mixer::new();
        mixer.clear(longest);
        for (i, buffer) in rendered.iter().enumerate() {
            let level = mix_levels.and_then(|l| l.get(i).copied()).unwrap_or(1.0);
            mixer.mix(buffer, level);
        }
        mixer.output()
    }

    fn silence(&self, duration: f32) -> Vec<f32> {
        match self.buffer_len(duration) {
            Some(n) => vec![0.0; n],
            None => Vec::new(),
        }
    }

    /// Envelope, then filter, then gain with a soft clip.
    fn shape(
        &self,
        samples: &mut [f32],
        envelope: Option<&EnvelopeConfig>,
        filter: Option<&FilterConfig>,
        gain: Option<f32>,
        duration: f32,
    ) {
        if let Some(env) = envelope {
            OneShotEnvelope::new(env, duration).apply(samples, self.sample_rate);
        }
        if let Some(f) = filter {
            BiquadFilter::new(f.filter_type, f.frequency, f.q, self.sample_rate).apply(samples);
        }
        let gain = gain.unwrap_or(DEFAULT_GAIN);
        for sample in samples.iter_mut() {
            *sample = soft_clip(*sample * gain);
        }
    }

    /// Number of samples for `duration` seconds; `None` (with a warning)
    /// for durations that cannot produce a buffer.
    fn buffer_len(&self, duration: f32) -> Option<usize> {
        if !duration.is_finite() || duration <= 0.0 {
            warn!("invalid duration {duration}, rendering an empty buffer");
            return None;
        }
        Some((duration * self.sample_rate as f32) as usize)
    }
}

// ── Tests ───────────────────────────────────────────────────
