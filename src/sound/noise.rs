//! Colored noise sources: white, pink, and brown.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Noise color, as named by the `color` field of the patch schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseColor {
    White,
    Pink,
    Brown,
}

/// Stateful noise generator.
pub struct NoiseSource {
    color: NoiseColor,
    rng: StdRng,
    /// Pink-noise filter state (Paul Kellet's economy filter).
    pink: [f32; 7],
    /// Brown-noise leaky-integrator state.
    brown: f32,
}

impl NoiseSource {
    pub fn new(color: NoiseColor) -> Self {
        NoiseSource {
            color,
            rng: StdRng::from_os_rng(),
            pink: [0.0; 7],
            brown: 0.0,
        }
    }

    /// Deterministic source, for tests.
    pub fn with_seed(color: NoiseColor, seed: u64) -> Self {
        NoiseSource {
            color,
            rng: StdRng::seed_from_u64(seed),
            pink: [0.0; 7],
            brown: 0.0,
        }
    }

    pub fn next_sample(&mut self) -> f32 {
        let white = self.rng.random::<f32>() * 2.0 - 1.0;
        match self.color {
            NoiseColor::White => white,
            NoiseColor::Pink => self.pink(white),
            NoiseColor::Brown => self.brown(white),
        }
    }

    /// Based on code snippets from https://www.firstpr.com.au/dsp/pink-noise/
    fn pink(&mut self, white: f32) -> f32 {
        let b = &mut self.pink;
        b[0] = 0.99886 * b[0] + white * 0.0555179;
        b[1] = 0.99332 * b[1] + white * 0.0750759;
        b[2] = 0.96900 * b[2] + white * 0.153852;
        b[3] = 0.86650 * b[3] + white * 0.3104856;
        b[4] = 0.55000 * b[4] + white * 0.5329522;
        b[5] = -0.7616 * b[5] - white * 0.0168980;
        let pink = b[0] + b[1] + b[2] + b[3] + b[4] + b[5] + b[6] + white * 0.5362;
        b[6] = white * 0.115926;
        pink * 0.25
    }

    /// Approximation of brown noise: white noise through a leaky
    /// integrator, hand-tuned.
    fn brown(&mut self, white: f32) -> f32 {
        self.brown = (self.brown * 0.99) + (white * 0.1);
        self.brown
    }
}
