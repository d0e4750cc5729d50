//! Sound configuration — the action map and the patch bank.
//!
//! Two JSON files describe the demo's audio: `sound-map.json` binds
//! abstract action names to sounds, and `sound-patches.json` holds the
//! synthesis parameter bundles those names resolve to. The page fetches
//! both relative to the document and hands them to this module as
//! strings.

use std::collections::HashMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

use super::patch::{PatchBank, SoundPatch, SynthesisSpec};

const DEFAULT_MAP_JSON: &str = include_str!("../../config/sound-map.json");
const DEFAULT_PATCHES_JSON: &str = include_str!("../../config/sound-patches.json");

// ── Action map ──────────────────────────────────────────────

/// Top-level action map file. Each `sound-map.json` contains one of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundMap {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Abstract action name -> sound.
    pub actions: HashMap<String, SoundRef>,
}

fn default_version() -> u32 {
    1
}

/// One mapping entry: either a literal sound identifier referencing a
/// patch by id, or an inline synthesis parameter bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SoundRef {
    Id(String),
    Inline(Box<SynthesisSpec>),
}

// ── Resolved bank ───────────────────────────────────────────

/// The resolved pair of map + patch index, ready for lookup.
#[derive(Debug, Clone)]
pub struct SoundBank {
    map: SoundMap,
    patches: HashMap<String, SoundPatch>,
}

impl SoundBank {
    /// Parse both configuration files and assemble the bank.
    pub fn from_json(map_json: &str, patches_json: &str) -> Result<Self, ConfigError> {
        let map: SoundMap = serde_json::from_str(map_json).map_err(|e| ConfigError::Parse {
            file: "sound-map.json".to_string(),
            message: e.to_string(),
        })?;
        let bank: PatchBank =
            serde_json::from_str(patches_json).map_err(|e| ConfigError::Parse {
                file: "sound-patches.json".to_string(),
                message: e.to_string(),
            })?;

        let mut patches = HashMap::new();
        for patch in bank.patches {
            if patches.contains_key(&patch.id) {
                warn!("duplicate patch id '{}', keeping the first", patch.id);
                continue;
            }
            patches.insert(patch.id.clone(), patch);
        }

        Ok(SoundBank { map, patches })
    }

    /// Parse both files, falling back to the built-in defaults with a
    /// warning on any failure.
    pub fn from_json_or_default(map_json: &str, patches_json: &str) -> Self {
        match Self::from_json(map_json, patches_json) {
            Ok(bank) => bank,
            Err(e) => {
                warn!("sound configuration rejected, using defaults: {e}");
                Self::load_default()
            }
        }
    }

    /// The built-in bank compiled in from `config/sound-map.json` and
    /// `config/sound-patches.json`.
    pub fn load_default() -> Self {
        match Self::from_json(DEFAULT_MAP_JSON, DEFAULT_PATCHES_JSON) {
            Ok(bank) => bank,
            Err(e) => {
                // Unreachable with a well-formed build; degrade to silence.
                warn!("built-in sound configuration is invalid: {e}");
                Self::empty()
            }
        }
    }

    /// A bank with no mappings and no patches; every action resolves to
    /// nothing.
    pub fn empty() -> Self {
        SoundBank {
            map: SoundMap {
                version: 1,
                actions: HashMap::new(),
            },
            patches: HashMap::new(),
        }
    }

    /// Resolve an action name to its synthesis spec.
    ///
    /// Returns `None` for unmapped actions and for mappings whose patch
    /// id does not exist (with a warning).
    pub fn resolve(&self, action: &str) -> Option<&SynthesisSpec> {
        match self.map.actions.get(action)? {
            SoundRef::Id(id) => match self.patches.get(id) {
                Some(patch) => Some(&patch.synthesis),
                None => {
                    warn!("action '{action}' references unknown patch '{id}'");
                    None
                }
            },
            SoundRef::Inline(spec) => Some(spec),
        }
    }

    pub fn map(&self) -> &SoundMap {
        &self.map
    }

    pub fn patch(&self, id: &str) -> Option<&SoundPatch> {
        self.patches.get(id)
    }

    pub fn action_count(&self) -> usize {
        self.map.actions.len()
    }

    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }
}

// ── Tests ───────────────────────────────────────────────────
