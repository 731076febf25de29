//! Sliding-window moving average over recent forward-tilt angles.

use std::collections::VecDeque;

/// Default number of frames averaged together.
pub const POINT_WINDOW: usize = 6;

/// Fixed-capacity FIFO of adjusted angles.
///
/// The mean is taken over whatever is held, so the first few frames after
/// start (or a reset) are averaged over fewer than `capacity` samples and
/// jitter more.
#[derive(Debug, Clone)]
pub struct AngleWindow {
    values: VecDeque<f64>,
    capacity: usize,
}

impl AngleWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a value, evicting the oldest when full, and returns the new mean.
    pub fn push(&mut self, value: f64) -> f64 {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
        self.mean()
    }

    fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl Default for AngleWindow {
    fn default() -> Self {
        Self::new(POINT_WINDOW)
    }
}
