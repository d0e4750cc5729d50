pub mod error;
pub mod factory;
pub mod production;
pub mod sound;

use wasm_bindgen::prelude::*;

use crate::sound::config::SoundBank;
use crate::sound::synth::Synthesizer;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the catfactory-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: the built-in action map, for the page to introspect
/// which actions carry sounds.
#[wasm_bindgen]
pub fn default_sound_map() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(SoundBank::load_default().map())
        .map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: synthesize the sound mapped to `action` into raw mono
/// f32 samples for AudioWorklet playback.
///
/// `map_json` and `patches_json` are the two fetched configuration
/// files; malformed configuration falls back to the built-in defaults.
#[wasm_bindgen]
pub fn render_effect_samples(
    map_json: &str,
    patches_json: &str,
    action: &str,
    sample_rate: u32,
) -> Result<Vec<f32>, JsValue> {
    let bank = SoundBank::from_json_or_default(map_json, patches_json);
    let spec = bank
        .resolve(action)
        .ok_or_else(|| JsValue::from_str(&format!("no sound mapped for action '{action}'")))?;
    Ok(Synthesizer::new(sample_rate).render(spec))
}

/// WASM-exposed: synthesize the sound mapped to `action` into a WAV
/// byte array (16-bit mono PCM).
#[wasm_bindgen]
pub fn render_effect_wav(
    map_json: &str,
    patches_json: &str,
    action: &str,
    sample_rate: u32,
) -> Result<Vec<u8>, JsValue> {
    let bank = SoundBank::from_json_or_default(map_json, patches_json);
    sound::renderer::render_effect_wav(&bank, action, sample_rate)
        .ok_or_else(|| JsValue::from_str(&format!("no sound mapped for action '{action}'")))
}
