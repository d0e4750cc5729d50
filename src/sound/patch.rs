//! Sound patch schema — declarative synthesis parameter bundles.
//!
//! These types map directly to the `sound-patches.json` schema shipped
//! with the demo page. A patch describes *how* a sound is synthesized;
//! the mapping from UI actions to patches lives in [`super::config`].

use serde::{Deserialize, Serialize};

use super::envelope::EnvelopeConfig;
use super::filter::FilterKind;
use super::noise::NoiseColor;
use super::oscillator::Waveform;

/// Buffer length used for specs with no usable duration of their own
/// (currently only `Sample`, which renders as silence).
pub const DEFAULT_SAMPLE_DURATION: f32 = 0.25;

// ── Patch bank (top-level) ──────────────────────────────────

/// Top-level patch file. Each `sound-patches.json` contains one of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchBank {
    #[serde(default = "default_version")]
    pub version: u32,
    pub patches: Vec<SoundPatch>,
}

fn default_version() -> u32 {
    1
}

/// A named, reusable sound definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundPatch {
    /// Unique identifier referenced by the action map (e.g. "click-soft").
    pub id: String,
    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The synthesis recipe.
    pub synthesis: SynthesisSpec,
}

// ── Synthesis specs ─────────────────────────────────────────

/// A node in a synthesis recipe. Specs are modular: a sound can be a
/// single tone or noise burst, or a layered mix of child specs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SynthesisSpec {
    Tone {
        config: ToneConfig,
    },
    Noise {
        config: NoiseConfig,
    },
    Layer {
        children: Vec<SynthesisSpec>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        config: Option<LayerConfig>,
    },
    /// Recognized by the schema but not synthesizable — the core ships
    /// no decoder. Renders as silence.
    Sample {
        url: String,
    },
}

impl SynthesisSpec {
    /// Output duration in seconds. Layers last as long as their longest
    /// child.
    pub fn duration(&self) -> f32 {
        match self {
            SynthesisSpec::Tone { config } => config.duration,
            SynthesisSpec::Noise { config } => config.duration,
            SynthesisSpec::Layer { children, .. } => children
                .iter()
                .map(|c| c.duration())
                .fold(0.0, f32::max),
            SynthesisSpec::Sample { .. } => DEFAULT_SAMPLE_DURATION,
        }
    }
}

/// Configuration for a tone (oscillator) spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToneConfig {
    pub waveform: Waveform,
    /// Frequency in Hz at the start of the sound.
    pub frequency: f32,
    /// Linear sweep target; `None` holds the start frequency.
    #[serde(default, rename = "endFrequency", skip_serializing_if = "Option::is_none")]
    pub end_frequency: Option<f32>,
    /// Length in seconds.
    pub duration: f32,
    /// Output gain [0.0, 1.0].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gain: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envelope: Option<EnvelopeConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterConfig>,
}

/// Configuration for a colored-noise spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseConfig {
    pub color: NoiseColor,
    /// Length in seconds.
    pub duration: f32,
    /// Output gain [0.0, 1.0].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gain: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envelope: Option<EnvelopeConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterConfig>,
}

/// Configuration for a layer spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Per-child mix levels; missing entries default to 1.0.
    #[serde(default, rename = "mixLevels", skip_serializing_if = "Option::is_none")]
    pub mix_levels: Option<Vec<f32>>,
}

/// Filter parameters as they appear in the patch schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(rename = "filterType")]
    pub filter_type: FilterKind,
    /// Cutoff / center frequency in Hz.
    pub frequency: f32,
    #[serde(default = "default_q")]
    pub q: f32,
}

fn default_q() -> f32 {
    0.707
}

// ── Tests ───────────────────────────────────────────────────
