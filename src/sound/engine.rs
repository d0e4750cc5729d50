//! Playback coordinator — admits, mixes, and evicts synthesized sounds.
//!
//! The engine enforces the cap on simultaneously playing sounds, carries
//! the master volume and enabled flag, and drains the event bus. All
//! mutation happens on the caller's thread through `&mut self`; there is
//! no locking.

use std::collections::HashMap;
use std::sync::Arc;

use crossbeam_channel::Receiver;
use log::{debug, warn};

use super::config::SoundBank;
use super::events::{AudioEvent, EventBus};
use super::mixer::Mixer;
use super::synth::Synthesizer;

/// Cap on simultaneously active sounds; triggers past the cap are refused.
pub const MAX_CONCURRENT_SOUNDS: usize = 8;

/// Safety net: active entries older than this are forcibly evicted even
/// if their buffers have not been exhausted.
pub const PLAYBACK_TIMEOUT_SECS: u32 = 10;

/// One admitted playback.
struct ActivePlayback {
    id: u64,
    action: String,
    buffer: Arc<Vec<f32>>,
    position: usize,
    /// Engine clock (in samples) when the playback was admitted.
    admitted_at: u64,
}

impl ActivePlayback {
    fn is_exhausted(&self) -> bool {
        self.position >= self.buffer.len()
    }
}

/// The sound-effect engine.
pub struct SfxEngine {
    sample_rate: u32,
    bank: SoundBank,
    synth: Synthesizer,
    mixer: Mixer,
    active: Vec<ActivePlayback>,
    /// Synthesized buffers, cached per action so repeated triggers do
    /// not re-render.
    buffer_cache: HashMap<String, Arc<Vec<f32>>>,
    next_playback_id: u64,
    /// Monotonic sample clock advanced by `render`.
    clock_samples: u64,
    volume: f32,
    enabled: bool,
    bus: EventBus,
    inbox: Receiver<AudioEvent>,
}

impl SfxEngine {
    pub fn new(sample_rate: u32, bank: SoundBank) -> Self {
        let mut bus = EventBus::new();
        let inbox = bus.subscribe();
        let mut engine = SfxEngine {
            sample_rate,
            bank,
            synth: Synthesizer::new(sample_rate),
            mixer: Mixer::new(),
            active: Vec::new(),
            buffer_cache: HashMap::new(),
            next_playback_id: 0,
            clock_samples: 0,
            volume: 0.7,
            enabled: true,
            bus,
            inbox,
        };
        engine.bus.publish(AudioEvent::SystemInitialized);
        engine
    }

    /// Engine over the built-in sound configuration.
    pub fn with_default_bank(sample_rate: u32) -> Self {
        Self::new(sample_rate, SoundBank::load_default())
    }

    // ── Triggering ──────────────────────────────────────────

    /// Play the sound mapped to `action`.
    ///
    /// Returns `true` when a playback was admitted; `false` when the
    /// engine is disabled, the action has no sound, or the concurrency
    /// cap is reached.
    pub fn trigger(&mut self, action: &str) -> bool {
        if !self.enabled {
            debug!("sound disabled, ignoring '{action}'");
            return false;
        }
        if self.active.len() >= MAX_CONCURRENT_SOUNDS {
            warn!("sound cap reached, dropping '{action}'");
            return false;
        }

        let buffer = match self.buffer_cache.get(action) {
            Some(cached) => Arc::clone(cached),
            None => {
                let Some(spec) = self.bank.resolve(action) else {
                    warn!("no sound mapped for action '{action}'");
                    return false;
                };
                let buffer = Arc::new(self.synth.render(spec));
                self.buffer_cache
                    .insert(action.to_string(), Arc::clone(&buffer));
                buffer
            }
        };

        let id = self.next_playback_id;
        self.next_playback_id += 1;
        self.active.push(ActivePlayback {
            id,
            action: action.to_string(),
            buffer,
            position: 0,
            admitted_at: self.clock_samples,
        });
        true
    }

    // ── Rendering ───────────────────────────────────────────

    /// Mix every active playback into `out`, advancing the engine clock
    /// by `out.len()` samples. Exhausted playbacks are removed; entries
    /// older than [`PLAYBACK_TIMEOUT_SECS`] are forcibly evicted.
    pub fn render(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        self.clock_samples += out.len() as u64;

        if self.enabled && !self.active.is_empty() {
            self.mixer.master_gain = self.volume;
            self.mixer.clear(out.len());
            for playback in self.active.iter_mut() {
                let remaining = &playback.buffer[playback.position..];
                let take = remaining.len().min(out.len());
                for (i, &sample) in remaining[..take].iter().enumerate() {
                    self.mixer.add(i, sample);
                }
                playback.position += take;
            }
            out.copy_from_slice(&self.mixer.output());
        }

        let deadline = PLAYBACK_TIMEOUT_SECS as u64 * self.sample_rate as u64;
        let clock = self.clock_samples;
        self.active.retain(|p| {
            if p.is_exhausted() {
                return false;
            }
            if clock.saturating_sub(p.admitted_at) >= deadline {
                warn!("evicting stuck playback #{} ('{}')", p.id, p.action);
                return false;
            }
            true
        });
    }

    // ── Event-bus wiring ────────────────────────────────────

    /// The bus this engine listens on. Publish [`AudioEvent::Action`]
    /// events here (and call [`SfxEngine::pump`]) to trigger sounds from
    /// decoupled code.
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Drain the inbox, applying each event. Returns how many events
    /// were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.inbox.try_recv() {
            match event {
                AudioEvent::Action { name } => {
                    self.trigger(&name);
                }
                AudioEvent::VolumeChanged { volume } => self.apply_volume(volume),
                AudioEvent::EnabledChanged { enabled } => self.apply_enabled(enabled),
                AudioEvent::SystemInitialized => {}
            }
            handled += 1;
        }
        handled
    }

    // ── Settings ────────────────────────────────────────────

    /// Set the master volume (clamped to 0..=1) and announce the change
    /// on the bus.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        if volume != self.volume {
            self.apply_volume(volume);
            self.bus.publish(AudioEvent::VolumeChanged { volume });
        }
    }

    fn apply_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Enable or disable sound output and announce the change on the
    /// bus. Disabling stops everything currently playing.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled != self.enabled {
            self.apply_enabled(enabled);
            self.bus.publish(AudioEvent::EnabledChanged { enabled });
        }
    }

    fn apply_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.stop_all();
        }
    }

    // ── Observation ─────────────────────────────────────────

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn bank(&self) -> &SoundBank {
        &self.bank
    }

    pub fn stop_all(&mut self) {
        self.active.clear();
    }
}

// ── Tests ───────────────────────────────────────────────────
