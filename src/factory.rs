//! Factory state — the five production-quality dials behind the sliders.

use serde::{Deserialize, Serialize};

// ── Dials ───────────────────────────────────────────────────

/// One of the five production-quality dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dial {
    Recipe,
    Production,
    Quality,
    Packaging,
    Logistics,
}

impl Dial {
    /// All dials in display order.
    pub const ALL: [Dial; 5] = [
        Dial::Recipe,
        Dial::Production,
        Dial::Quality,
        Dial::Packaging,
        Dial::Logistics,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Dial::Recipe => "Recipe",
            Dial::Production => "Production",
            Dial::Quality => "Quality",
            Dial::Packaging => "Packaging",
            Dial::Logistics => "Logistics",
        }
    }

    /// Default value shown when the page first loads (and after a reset).
    pub fn default_value(&self) -> u8 {
        match self {
            Dial::Recipe => 75,
            Dial::Production => 80,
            Dial::Quality => 90,
            Dial::Packaging => 70,
            Dial::Logistics => 85,
        }
    }

    fn index(&self) -> usize {
        match self {
            Dial::Recipe => 0,
            Dial::Production => 1,
            Dial::Quality => 2,
            Dial::Packaging => 3,
            Dial::Logistics => 4,
        }
    }
}

// ── Ratings ─────────────────────────────────────────────────

/// Quality rating derived from a 0-100 dial value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityRating {
    /// Threshold mapping: >= 80 Excellent, >= 60 Good, >= 40 Fair, else Poor.
    pub fn from_value(value: u8) -> Self {
        match value {
            80.. => QualityRating::Excellent,
            60..=79 => QualityRating::Good,
            40..=59 => QualityRating::Fair,
            _ => QualityRating::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityRating::Excellent => "Excellent",
            QualityRating::Good => "Good",
            QualityRating::Fair => "Fair",
            QualityRating::Poor => "Poor",
        }
    }
}

// ── Factory state ───────────────────────────────────────────

/// The flat configuration object behind the five percentage sliders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryState {
    values: [u8; 5],
}

impl Default for FactoryState {
    fn default() -> Self {
        Self::new()
    }
}

impl FactoryState {
    /// Every dial at its default value.
    pub fn new() -> Self {
        let mut values = [0; 5];
        for dial in Dial::ALL {
            values[dial.index()] = dial.default_value();
        }
        FactoryState { values }
    }

    pub fn value(&self, dial: Dial) -> u8 {
        self.values[dial.index()]
    }

    /// Store a slider value, clamped to 0..=100.
    pub fn set(&mut self, dial: Dial, value: u8) {
        self.values[dial.index()] = value.min(100);
    }

    /// The percentage string displayed next to the slider.
    pub fn percent_label(&self, dial: Dial) -> String {
        format!("{}%", self.value(dial))
    }

    pub fn rating(&self, dial: Dial) -> QualityRating {
        QualityRating::from_value(self.value(dial))
    }

    /// Opacity of the connector between a dial and the production line.
    ///
    /// A dial at 0 leaves a faint (0.2) connector; a dial at 100 a fully
    /// opaque one.
    pub fn connector_opacity(&self, dial: Dial) -> f32 {
        0.2 + 0.8 * self.value(dial) as f32 / 100.0
    }

    /// Rounded mean of the five dial values.
    pub fn overall(&self) -> u8 {
        let sum: u32 = self.values.iter().map(|&v| v as u32).sum();
        ((sum as f32 / 5.0).round()) as u8
    }

    pub fn overall_rating(&self) -> QualityRating {
        QualityRating::from_value(self.overall())
    }

    /// Per-dial snapshot in display order, used by the product card.
    pub fn snapshot(&self) -> [(Dial, u8); 5] {
        let mut out = [(Dial::Recipe, 0); 5];
        for (i, dial) in Dial::ALL.into_iter().enumerate() {
            out[i] = (dial, self.value(dial));
        }
        out
    }

    /// Restore all dials to their defaults.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

// ── Tests ───────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page_load_values() {
        let state = FactoryState::new();
        assert_eq!(state.value(Dial::Recipe), 75);
        assert_eq!(state.value(Dial::Production), 80);
        assert_eq!(state.value(Dial::Quality), 90);
        assert_eq!(state.value(Dial::Packaging), 70);
        assert_eq!(state.value(Dial::Logistics), 85);
    }

    #[test]
    fn set_clamps_to_100() {
        let mut state = FactoryState::new();
        state.set(Dial::Recipe, 250);
        assert_eq!(state.value(Dial::Recipe), 100);
        state.set(Dial::Recipe, 0);
        assert_eq!(state.value(Dial::Recipe), 0);
    }

    #[test]
    fn percent_label_tracks_value() {
        let mut state = FactoryState::new();
        state.set(Dial::Packaging, 42);
        assert_eq!(state.percent_label(Dial::Packaging), "42%");
    }

    #[test]
    fn rating_boundaries_inclusive() {
        assert_eq!(QualityRating::from_value(80), QualityRating::Excellent);
        assert_eq!(QualityRating::from_value(79), QualityRating::Good);
        assert_eq!(QualityRating::from_value(60), QualityRating::Good);
        assert_eq!(QualityRating::from_value(59), QualityRating::Fair);
        assert_eq!(QualityRating::from_value(40), QualityRating::Fair);
        assert_eq!(QualityRating::from_value(39), QualityRating::Poor);
        assert_eq!(QualityRating::from_value(100), QualityRating::Excellent);
        assert_eq!(QualityRating::from_value(0), QualityRating::Poor);
    }

    #[test]
    fn rating_labels_for_display() {
        assert_eq!(QualityRating::Excellent.label(), "Excellent");
        assert_eq!(QualityRating::Poor.label(), "Poor");
        assert_eq!(Dial::Logistics.label(), "Logistics");
    }

    #[test]
    fn connector_opacity_endpoints() {
        let mut state = FactoryState::new();
        state.set(Dial::Quality, 0);
        assert!((state.connector_opacity(Dial::Quality) - 0.2).abs() < 1e-6);
        state.set(Dial::Quality, 100);
        assert!((state.connector_opacity(Dial::Quality) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn connector_opacity_monotonic() {
        let mut state = FactoryState::new();
        let mut last = -1.0_f32;
        for v in (0..=100).step_by(10) {
            state.set(Dial::Recipe, v);
            let opacity = state.connector_opacity(Dial::Recipe);
            assert!(opacity > last, "opacity should increase with the value");
            last = opacity;
        }
    }

    #[test]
    fn overall_is_rounded_mean() {
        let state = FactoryState::new();
        // (75 + 80 + 90 + 70 + 85) / 5 = 80
        assert_eq!(state.overall(), 80);
        assert_eq!(state.overall_rating(), QualityRating::Excellent);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut state = FactoryState::new();
        for dial in Dial::ALL {
            state.set(dial, 1);
        }
        state.reset();
        assert_eq!(state, FactoryState::new());
    }

    #[test]
    fn snapshot_preserves_display_order() {
        let state = FactoryState::new();
        let snap = state.snapshot();
        assert_eq!(snap[0], (Dial::Recipe, 75));
        assert_eq!(snap[4], (Dial::Logistics, 85));
    }
}
