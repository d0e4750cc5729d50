//! Persisted audio settings.
//!
//! The settings blob is written verbatim as JSON — the native analog of
//! the demo page's local-storage key. Every field carries a serde
//! default so partial files from older versions still load.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// File name under the platform config directory.
pub const SETTINGS_FILE: &str = "audio-settings.json";

const SETTINGS_VERSION: u32 = 1;

/// The singleton audio settings object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Master on/off switch.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Master volume [0.0, 1.0].
    #[serde(default = "default_master_volume")]
    pub master_volume: f32,
    /// Per-category toggles.
    #[serde(default)]
    pub effects: EffectToggles,
}

/// Which sound categories are audible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectToggles {
    #[serde(default = "default_true")]
    pub ui: bool,
    #[serde(default = "default_true")]
    pub production: bool,
    #[serde(default = "default_true")]
    pub ambient: bool,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

fn default_true() -> bool {
    true
}

fn default_master_volume() -> f32 {
    0.7
}

impl Default for EffectToggles {
    fn default() -> Self {
        EffectToggles {
            ui: true,
            production: true,
            ambient: true,
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        AudioSettings {
            version: SETTINGS_VERSION,
            enabled: true,
            master_volume: default_master_volume(),
            effects: EffectToggles::default(),
        }
    }
}

impl AudioSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the master volume, clamped to 0.0..=1.0.
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
    }

    /// The volume the engine should actually use: 0.0 when disabled.
    pub fn effective_volume(&self) -> f32 {
        if self.enabled { self.master_volume } else { 0.0 }
    }

    /// Load settings from a specific path.
    ///
    /// A missing or empty file yields the defaults; a malformed file is
    /// an error.
    pub fn load_from(path: &std::path::Path) -> Result<Self, StorageError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(StorageError::Io {
                    path: path.display().to_string(),
                    source: e,
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(&content).map_err(|e| StorageError::Serialize {
            message: format!("{}: {e}", path.display()),
        })
    }

    /// Save settings to a specific path, creating parent directories.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StorageError::Io {
                    path: parent.display().to_string(),
                    source: e,
                })?;
            }
        }
        let content = serde_json::to_string_pretty(self).map_err(|e| StorageError::Serialize {
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| StorageError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Load from the default location, warning and falling back to the
    /// defaults if anything goes wrong.
    #[cfg(feature = "storage")]
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("could not load audio settings, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Load settings from the platform config directory.
    #[cfg(feature = "storage")]
    pub fn load() -> Result<Self, StorageError> {
        Self::load_from(&settings_path()?)
    }

    /// Save settings to the platform config directory.
    #[cfg(feature = "storage")]
    pub fn save(&self) -> Result<(), StorageError> {
        self.save_to(&settings_path()?)
    }
}

/// Path of the settings file under the platform config directory.
#[cfg(feature = "storage")]
pub fn settings_path() -> Result<std::path::PathBuf, StorageError> {
    let dirs = directories::ProjectDirs::from("io", "pixelpantry", "catfactory")
        .ok_or(StorageError::NoConfigDir)?;
    Ok(dirs.config_dir().join(SETTINGS_FILE))
}

// ── Tests ───────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;
    use std::fs;
    use std::sync::atomic::{AtomicU32, Ordering};

    static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_path() -> std::path::PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        temp_dir().join(format!("catfactory_settings_test_{id}.json"))
    }

    #[test]
    fn defaults() {
        let settings = AudioSettings::default();
        assert_eq!(settings.version, 1);
        assert!(settings.enabled);
        assert_eq!(settings.master_volume, 0.7);
        assert!(settings.effects.ui);
        assert!(settings.effects.production);
        assert!(settings.effects.ambient);
    }

    #[test]
    fn volume_clamping() {
        let mut settings = AudioSettings::new();
        settings.set_master_volume(1.5);
        assert_eq!(settings.master_volume, 1.0);
        settings.set_master_volume(-0.5);
        assert_eq!(settings.master_volume, 0.0);
        settings.set_master_volume(0.4);
        assert_eq!(settings.master_volume, 0.4);
    }

    #[test]
    fn effective_volume_zero_when_disabled() {
        let mut settings = AudioSettings::new();
        settings.master_volume = 0.6;
        assert_eq!(settings.effective_volume(), 0.6);
        settings.enabled = false;
        assert_eq!(settings.effective_volume(), 0.0);
        assert_eq!(settings.master_volume, 0.6, "volume itself is preserved");
    }

    #[test]
    fn save_and_load_roundtrip() {
        let path = temp_path();

        let mut settings = AudioSettings::new();
        settings.enabled = false;
        settings.master_volume = 0.25;
        settings.effects.ambient = false;
        settings.save_to(&path).expect("save");

        let loaded = AudioSettings::load_from(&path).expect("load");
        assert_eq!(loaded, settings);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let settings = AudioSettings::load_from(&temp_path()).expect("load");
        assert_eq!(settings, AudioSettings::default());
    }

    #[test]
    fn empty_file_yields_defaults() {
        let path = temp_path();
        fs::write(&path, "   \n\t ").expect("write");
        let settings = AudioSettings::load_from(&path).expect("load");
        assert_eq!(settings, AudioSettings::default());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let path = temp_path();
        fs::write(&path, r#"{ "masterVolume": 0.3 }"#).expect("write");
        let settings = AudioSettings::load_from(&path).expect("load");
        assert_eq!(settings.master_volume, 0.3);
        assert!(settings.enabled, "missing fields come from defaults");
        assert!(settings.effects.ui);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn nested_toggles_persist() {
        let path = temp_path();
        fs::write(
            &path,
            r#"{ "effects": { "ui": false, "production": false } }"#,
        )
        .expect("write");
        let settings = AudioSettings::load_from(&path).expect("load");
        assert!(!settings.effects.ui);
        assert!(!settings.effects.production);
        assert!(settings.effects.ambient, "unlisted toggle defaults on");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = temp_path();
        fs::write(&path, "{ not json }").expect("write");
        assert!(AudioSettings::load_from(&path).is_err());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let path = temp_path();
        fs::write(
            &path,
            r#"{ "masterVolume": 0.9, "someFutureField": [1, 2, 3] }"#,
        )
        .expect("write");
        let settings = AudioSettings::load_from(&path).expect("load");
        assert_eq!(settings.master_volume, 0.9);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn json_uses_camel_case() {
        let json = serde_json::to_string(&AudioSettings::default()).expect("serialize");
        assert!(json.contains("\"masterVolume\""), "camelCase keys: {json}");
    }
}
