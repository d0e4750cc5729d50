//! Summing mixer with master gain and soft clipping.

/// Accumulates audio from multiple sources into one buffer.
#[derive(Debug, Clone)]
pub struct Mixer {
    pub master_gain: f32,
    buffer: Vec<f32>,
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

impl Mixer {
    pub fn new() -> Self {
        Mixer {
            master_gain: 1.0,
            buffer: Vec::new(),
        }
    }

    /// Prepare a buffer of `num_samples` filled with zeros.
    pub fn clear(&mut self, num_samples: usize) {
        self.buffer.clear();
        self.buffer.resize(num_samples, 0.0);
    }

    /// Add a sample at the given index.
    pub fn add(&mut self, index: usize, sample: f32) {
        if index < self.buffer.len() {
            self.buffer[index] += sample;
        }
    }

    /// Accumulate an entire source buffer, scaled by `gain`.
    pub fn mix(&mut self, samples: &[f32], gain: f32) {
        for (i, &s) in samples.iter().enumerate() {
            self.add(i, s * gain);
        }
    }

    /// The mixed output, with master gain and soft clipping applied.
    pub fn output(&self) -> Vec<f32> {
        self.buffer
            .iter()
            .map(|&s| soft_clip(s * self.master_gain))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Soft clipper using tanh to prevent harsh digital clipping.
pub fn soft_clip(x: f32) -> f32 {
    x.tanh()
}
