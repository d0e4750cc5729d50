//! Production flow — the timed five-step run that turns dial settings
//! into a finished product card.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::factory::{Dial, FactoryState, QualityRating};

// ── Steps ───────────────────────────────────────────────────

/// The five production-line steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductionStep {
    Mixing,
    Cooking,
    Inspection,
    Packaging,
    Shipping,
}

impl ProductionStep {
    pub const ALL: [ProductionStep; 5] = [
        ProductionStep::Mixing,
        ProductionStep::Cooking,
        ProductionStep::Inspection,
        ProductionStep::Packaging,
        ProductionStep::Shipping,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProductionStep::Mixing => "Mixing",
            ProductionStep::Cooking => "Cooking",
            ProductionStep::Inspection => "Inspection",
            ProductionStep::Packaging => "Packaging",
            ProductionStep::Shipping => "Shipping",
        }
    }

    /// How long the step animation holds before advancing.
    pub fn duration(&self) -> Duration {
        match self {
            ProductionStep::Mixing => Duration::from_millis(900),
            ProductionStep::Cooking => Duration::from_millis(1100),
            ProductionStep::Inspection => Duration::from_millis(800),
            ProductionStep::Packaging => Duration::from_millis(700),
            ProductionStep::Shipping => Duration::from_millis(1000),
        }
    }
}

/// Total wall-clock length of a full run.
pub fn total_duration() -> Duration {
    ProductionStep::ALL.iter().map(|s| s.duration()).sum()
}

// ── Events & product card ───────────────────────────────────

/// Emitted by [`ProductionFlow::tick`] as the clock crosses step boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEvent {
    StepStarted(ProductionStep),
    StepCompleted(ProductionStep),
    Completed,
}

/// The card revealed when a run finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    /// `TRK-` followed by exactly eight decimal digits.
    pub tracking_number: String,
    /// Rounded mean of the dial values captured when the run started.
    pub overall: u8,
    pub grade: QualityRating,
    /// Per-dial breakdown captured when the run started.
    pub breakdown: [(Dial, u8); 5],
}

// ── Flow state machine ──────────────────────────────────────

#[derive(Debug)]
enum FlowState {
    Idle,
    Running {
        step: usize,
        elapsed: Duration,
        started: bool,
        snapshot: [(Dial, u8); 5],
    },
    Complete {
        card: ProductCard,
    },
}

/// Timer-driven production run: `Idle -> Running -> Complete`.
#[derive(Debug)]
pub struct ProductionFlow {
    state: FlowState,
    rng: StdRng,
}

impl Default for ProductionFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductionFlow {
    pub fn new() -> Self {
        ProductionFlow {
            state: FlowState::Idle,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic tracking numbers, for tests.
    pub fn with_seed(seed: u64) -> Self {
        ProductionFlow {
            state: FlowState::Idle,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Begin a run, capturing the current dial settings.
    ///
    /// Returns `false` without effect while a run is already in progress.
    /// Starting from `Complete` discards the previous card.
    pub fn start(&mut self, factory: &FactoryState) -> bool {
        if matches!(self.state, FlowState::Running { .. }) {
            return false;
        }
        self.state = FlowState::Running {
            step: 0,
            elapsed: Duration::ZERO,
            started: false,
            snapshot: factory.snapshot(),
        };
        true
    }

    /// Advance the run clock by `dt`, returning the events crossed in order.
    ///
    /// A large `dt` may cross several step boundaries in one call.
    pub fn tick(&mut self, dt: Duration) -> Vec<FlowEvent> {
        let mut events = Vec::new();

        let FlowState::Running {
            step,
            elapsed,
            started,
            snapshot,
        } = &mut self.state
        else {
            return events;
        };

        if !*started {
            *started = true;
            events.push(FlowEvent::StepStarted(ProductionStep::ALL[*step]));
        }

        *elapsed += dt;
        while *elapsed >= ProductionStep::ALL[*step].duration() {
            let current = ProductionStep::ALL[*step];
            *elapsed -= current.duration();
            events.push(FlowEvent::StepCompleted(current));

            if *step + 1 == ProductionStep::ALL.len() {
                let card = Self::make_card(&mut self.rng, *snapshot);
                self.state = FlowState::Complete { card };
                events.push(FlowEvent::Completed);
                return events;
            }

            *step += 1;
            events.push(FlowEvent::StepStarted(ProductionStep::ALL[*step]));
        }

        events
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, FlowState::Running { .. })
    }

    pub fn current_step(&self) -> Option<ProductionStep> {
        match &self.state {
            FlowState::Running { step, .. } => Some(ProductionStep::ALL[*step]),
            _ => None,
        }
    }

    /// Progress across the whole run, 0.0 to 1.0.
    pub fn progress(&self) -> f32 {
        match &self.state {
            FlowState::Idle => 0.0,
            FlowState::Running { step, elapsed, .. } => {
                let done: Duration = ProductionStep::ALL[..*step]
                    .iter()
                    .map(|s| s.duration())
                    .sum();
                let within = (*elapsed).min(ProductionStep::ALL[*step].duration());
                (done + within).as_secs_f32() / total_duration().as_secs_f32()
            }
            FlowState::Complete { .. } => 1.0,
        }
    }

    /// The product card, present iff the run has completed.
    pub fn card(&self) -> Option<&ProductCard> {
        match &self.state {
            FlowState::Complete { card } => Some(card),
            _ => None,
        }
    }

    /// Return to `Idle`, discarding any card (hides the product card).
    pub fn reset(&mut self) {
        self.state = FlowState::Idle;
    }

    fn make_card(rng: &mut StdRng, breakdown: [(Dial, u8); 5]) -> ProductCard {
        let sum: u32 = breakdown.iter().map(|&(_, v)| v as u32).sum();
        let overall = ((sum as f32 / 5.0).round()) as u8;
        ProductCard {
            tracking_number: format!("TRK-{:08}", rng.random_range(0..100_000_000u32)),
            overall,
            grade: QualityRating::from_value(overall),
            breakdown,
        }
    }
}

// ── Tests ───────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn tracking_number_is_well_formed(tracking: &str) -> bool {
        tracking.len() == 12
            && tracking.starts_with("TRK-")
            && tracking[4..].bytes().all(|b| b.is_ascii_digit())
    }

    #[test]
    fn idle_flow_does_nothing() {
        let mut flow = ProductionFlow::with_seed(1);
        assert!(!flow.is_running());
        assert!(flow.tick(Duration::from_secs(10)).is_empty());
        assert!(flow.card().is_none());
        assert_eq!(flow.progress(), 0.0);
    }

    #[test]
    fn start_begins_at_mixing() {
        let mut flow = ProductionFlow::with_seed(1);
        assert!(flow.start(&FactoryState::new()));
        assert_eq!(flow.current_step(), Some(ProductionStep::Mixing));

        let events = flow.tick(Duration::from_millis(10));
        assert_eq!(events, vec![FlowEvent::StepStarted(ProductionStep::Mixing)]);
    }

    #[test]
    fn start_while_running_is_refused() {
        let mut flow = ProductionFlow::with_seed(1);
        let factory = FactoryState::new();
        assert!(flow.start(&factory));
        assert!(!flow.start(&factory));
        assert!(flow.is_running());
    }

    #[test]
    fn full_run_emits_five_completions_and_a_card() {
        let mut flow = ProductionFlow::with_seed(7);
        flow.start(&FactoryState::new());

        let mut events = Vec::new();
        // Tick in 100ms slices until complete, with a safety bound.
        for _ in 0..200 {
            events.extend(flow.tick(Duration::from_millis(100)));
            if flow.card().is_some() {
                break;
            }
        }

        let completed: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, FlowEvent::StepCompleted(_)))
            .collect();
        assert_eq!(completed.len(), 5, "every step should complete exactly once");
        assert_eq!(events.last(), Some(&FlowEvent::Completed));

        let card = flow.card().expect("card should exist after completion");
        assert!(
            tracking_number_is_well_formed(&card.tracking_number),
            "bad tracking number: {}",
            card.tracking_number
        );
        assert_eq!(card.overall, 80);
        assert_eq!(card.grade, QualityRating::Excellent);
        assert_eq!(flow.progress(), 1.0);
    }

    #[test]
    fn oversized_tick_crosses_multiple_boundaries() {
        let mut flow = ProductionFlow::with_seed(3);
        flow.start(&FactoryState::new());

        // One giant tick covers the entire run.
        let events = flow.tick(total_duration() + Duration::from_secs(1));
        let completed = events
            .iter()
            .filter(|e| matches!(e, FlowEvent::StepCompleted(_)))
            .count();
        assert_eq!(completed, 5);
        assert!(flow.card().is_some());
    }

    #[test]
    fn steps_advance_in_order() {
        let mut flow = ProductionFlow::with_seed(5);
        flow.start(&FactoryState::new());

        let mut started = Vec::new();
        for _ in 0..200 {
            for event in flow.tick(Duration::from_millis(50)) {
                if let FlowEvent::StepStarted(step) = event {
                    started.push(step);
                }
            }
            if flow.card().is_some() {
                break;
            }
        }
        assert_eq!(started, ProductionStep::ALL.to_vec());
    }

    #[test]
    fn card_captures_settings_at_start() {
        let mut factory = FactoryState::new();
        factory.set(Dial::Recipe, 20);
        factory.set(Dial::Production, 20);
        factory.set(Dial::Quality, 20);
        factory.set(Dial::Packaging, 20);
        factory.set(Dial::Logistics, 20);

        let mut flow = ProductionFlow::with_seed(11);
        flow.start(&factory);

        // Changing the dials mid-run must not affect the card.
        factory.set(Dial::Recipe, 100);

        flow.tick(total_duration());
        let card = flow.card().expect("card");
        assert_eq!(card.overall, 20);
        assert_eq!(card.grade, QualityRating::Poor);
        assert_eq!(card.breakdown[0], (Dial::Recipe, 20));
    }

    #[test]
    fn reset_discards_card() {
        let mut flow = ProductionFlow::with_seed(2);
        flow.start(&FactoryState::new());
        flow.tick(total_duration());
        assert!(flow.card().is_some());

        flow.reset();
        assert!(flow.card().is_none());
        assert!(!flow.is_running());
        assert_eq!(flow.progress(), 0.0);
    }

    #[test]
    fn restart_after_completion_discards_previous_card() {
        let mut flow = ProductionFlow::with_seed(2);
        let factory = FactoryState::new();
        flow.start(&factory);
        flow.tick(total_duration());
        let first = flow.card().expect("card").tracking_number.clone();

        assert!(flow.start(&factory));
        assert!(flow.card().is_none());
        flow.tick(total_duration());
        let second = flow.card().expect("card").tracking_number.clone();
        assert_ne!(first, second, "each run gets a fresh tracking number");
    }

    #[test]
    fn seeded_flows_are_deterministic() {
        let run = |seed| {
            let mut flow = ProductionFlow::with_seed(seed);
            flow.start(&FactoryState::new());
            flow.tick(total_duration());
            flow.card().expect("card").tracking_number.clone()
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn progress_is_monotonic() {
        let mut flow = ProductionFlow::with_seed(9);
        flow.start(&FactoryState::new());
        let mut last = 0.0_f32;
        for _ in 0..100 {
            flow.tick(Duration::from_millis(50));
            let p = flow.progress();
            assert!(p >= last, "progress should never move backwards");
            assert!(p <= 1.0);
            last = p;
        }
    }
}
