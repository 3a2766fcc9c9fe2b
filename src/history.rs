// SensorConsole
// Supplied without warranty.
// Use at your own risk.

use std::collections::{HashMap, VecDeque};

use crate::classifier::{Category, Reading};

pub const MAX_DISPLAY_POINTS: usize = 300;

/// Recent numeric readings per category, as `(elapsed_s, value)`.
#[derive(Debug, Clone)]
pub struct ReadingHistory {
    points: HashMap<Category, VecDeque<(f32, f32)>>,
    capacity: usize,
}

impl Default for ReadingHistory {
    fn default() -> Self {
        Self::with_capacity(MAX_DISPLAY_POINTS)
    }
}

impl ReadingHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: HashMap::new(),
            capacity,
        }
    }

    /// Adds the reading if its token is numeric; returns the value stored.
    pub fn push(&mut self, reading: &Reading, elapsed_secs: f32) -> Option<f32> {
        let value = reading.value()?;
        let series = self.points.entry(reading.category).or_default();
        if series.len() >= self.capacity {
            series.pop_front();
        }
        series.push_back((elapsed_secs, value));
        Some(value)
    }

    pub fn series(&self, category: Category) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.points.get(&category).into_iter().flatten().copied()
    }

    pub fn latest(&self, category: Category) -> Option<f32> {
        self.points.get(&category)?.back().map(|&(_, v)| v)
    }

    pub fn len(&self, category: Category) -> usize {
        self.points.get(&category).map_or(0, VecDeque::len)
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
