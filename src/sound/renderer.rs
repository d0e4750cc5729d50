//! WAV renderer — renders a mapped sound effect to a WAV byte buffer.

use super::config::SoundBank;
use super::synth::Synthesizer;

/// Render the sound mapped to `action` as a 16-bit mono PCM WAV file.
///
/// Returns `None` when the action has no sound.
pub fn render_effect_wav(bank: &SoundBank, action: &str, sample_rate: u32) -> Option<Vec<u8>> {
    let spec = bank.resolve(action)?;
    let samples = Synthesizer::new(sample_rate).render(spec);
    Some(encode_wav(&to_pcm_i16(&samples), sample_rate, 1))
}

/// Convert f32 samples in [-1, 1] to i16 PCM.
fn to_pcm_i16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s * 32767.0).round().clamp(-32768.0, 32767.0) as i16)
        .collect()
}

/// Encode interleaved i16 PCM samples to a WAV byte buffer.
fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> Vec<u8> {
    let bits_per_sample: u16 = 16;
    let byte_rate = sample_rate * channels as u32 * (bits_per_sample as u32 / 8);
    let block_align = channels * (bits_per_sample / 8);
    let data_size = (samples.len() * 2) as u32;
    let file_size = 36 + data_size;

    let mut buf = Vec::with_capacity(44 + data_size as usize);

    // RIFF header
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    // fmt chunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    buf.extend_from_slice(&channels.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for &sample in samples {
        buf.extend_from_slice(&sample.to_le_bytes());
    }

    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_header_valid() {
        let bank = SoundBank::load_default();
        let wav = render_effect_wav(&bank, "ui.click", 44100).expect("mapped action");

        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(&wav[36..40], b"data");

        let sr = u32::from_le_bytes([wav[24], wav[25], wav[26], wav[27]]);
        assert_eq!(sr, 44100);

        let ch = u16::from_le_bytes([wav[22], wav[23]]);
        assert_eq!(ch, 1);
    }

    #[test]
    fn wav_size_matches_rendered_length() {
        let bank = SoundBank::load_default();
        let wav = render_effect_wav(&bank, "ui.click", 22050).expect("mapped action");

        let spec = bank.resolve("ui.click").expect("spec");
        let num_samples = Synthesizer::new(22050).render(spec).len();
        assert!(num_samples > 0);

        let data_size = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]) as usize;
        assert_eq!(data_size, num_samples * 2);
        assert_eq!(wav.len(), 44 + num_samples * 2);
    }

    #[test]
    fn wav_contains_audio() {
        let bank = SoundBank::load_default();
        let wav = render_effect_wav(&bank, "production.complete", 22050).expect("mapped action");

        let mut has_nonzero = false;
        for i in (44..wav.len()).step_by(2) {
            if i + 1 < wav.len() {
                let sample = i16::from_le_bytes([wav[i], wav[i + 1]]);
                if sample != 0 {
                    has_nonzero = true;
                    break;
                }
            }
        }
        assert!(has_nonzero, "rendered WAV should contain non-silent audio");
    }

    #[test]
    fn unmapped_action_renders_nothing() {
        let bank = SoundBank::load_default();
        assert!(render_effect_wav(&bank, "no.such.action", 44100).is_none());
    }
}
