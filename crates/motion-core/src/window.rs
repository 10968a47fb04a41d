//! Fixed-capacity rolling sample windows.
//!
//! Every tracked signal keeps its recent history in a [`RollingWindow`]:
//! appending at capacity evicts the oldest sample, so memory stays bounded
//! regardless of session length.

use std::collections::VecDeque;

/// Insertion-ordered window of the most recent samples for one signal.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    samples: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    /// Create a window holding at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest if the window is full.
    pub fn push(&mut self, sample: T) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the window holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently appended sample.
    pub fn latest(&self) -> Option<&T> {
        self.samples.back()
    }

    /// Oldest sample still in the window.
    pub fn oldest(&self) -> Option<&T> {
        self.samples.front()
    }

    /// Iterate samples oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.samples.iter()
    }

    /// Drop all samples, keeping the capacity.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl RollingWindow<f64> {
    /// Sample mean, or `None` on an empty window.
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: f64 = self.samples.iter().sum();
        Some(sum / self.samples.len() as f64)
    }

    /// Population variance (sum of squared deviations over n, not n-1).
    ///
    /// Defined as 0 for fewer than 2 samples so startup never reports
    /// phantom motion.
    pub fn population_variance(&self) -> f64 {
        if self.samples.len() < 2 {
            return 0.0;
        }
        let mean = self.mean().unwrap_or(0.0);
        let ssd: f64 = self.samples.iter().map(|v| (v - mean).powi(2)).sum();
        ssd / self.samples.len() as f64
    }

    /// Sum of samples (commutative aggregate for side-order-independent pooling).
    pub fn sum(&self) -> f64 {
        self.samples.iter().sum()
    }

    /// Sum of squared deviations from an externally supplied mean.
    pub fn sum_squared_deviations(&self, mean: f64) -> f64 {
        self.samples.iter().map(|v| (v - mean).powi(2)).sum()
    }
}

/// Clamp a ratio into `[0, 1]`, mapping NaN to 0 and +inf to 1.
///
/// Published metric fields must stay inside their declared bound for every
/// input sequence; this is the single choke point that guarantees it.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
