//! Fixed-capacity deduplicating windows, one per category

use super::category::Category;
use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Window contents before and after one merge, captured under the same lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowUpdate {
    pub previous: Vec<i64>,
    pub current: Vec<i64>,
}

#[derive(Debug, Default)]
struct NumberWindow {
    values: VecDeque<i64>,
    members: HashSet<i64>,
}

impl NumberWindow {
    fn snapshot(&self) -> Vec<i64> {
        self.values.iter().copied().collect()
    }

    fn push_unique(&mut self, value: i64) {
        if self.members.insert(value) {
            self.values.push_back(value);
        }
    }

    fn evict_to(&mut self, capacity: usize) {
        while self.values.len() > capacity {
            if let Some(oldest) = self.values.pop_front() {
                self.members.remove(&oldest);
            }
        }
    }
}

/// Per-category number windows sharing one capacity
///
/// Each category sits behind its own mutex, so merges on different
/// categories never contend and merges on the same category are serialized.
#[derive(Debug)]
pub struct WindowStore {
    capacity: usize,
    windows: [Mutex<NumberWindow>; 4],
}

impl WindowStore {
    /// `capacity` is clamped to at least 1
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            windows: Default::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn window(&self, category: Category) -> MutexGuard<'_, NumberWindow> {
        self.windows[category.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Merge `new_values` and return the window as it was before the call
    ///
    /// Values already present (including ones added earlier in the same
    /// batch) are skipped. Overflow evicts from the front.
    pub fn merge(&self, category: Category, new_values: &[i64]) -> Vec<i64> {
        self.merge_with_snapshots(category, new_values).previous
    }

    /// Same as [`merge`](Self::merge) but also returns the post-merge window
    pub fn merge_with_snapshots(&self, category: Category, new_values: &[i64]) -> WindowUpdate {
        let mut window = self.window(category);
        let previous = window.snapshot();

        for &value in new_values {
            window.push_unique(value);
        }
        window.evict_to(self.capacity);

        WindowUpdate {
            previous,
            current: window.snapshot(),
        }
    }

    pub fn current_state(&self, category: Category) -> Vec<i64> {
        self.window(category).snapshot()
    }

    /// Mean of the current window rounded to 2 decimals, 0 when empty
    pub fn average(&self, category: Category) -> f64 {
        average_of(&self.window(category).snapshot())
    }
}

/// Arithmetic mean rounded half away from zero to 2 decimals
pub fn average_of(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: f64 = values.iter().map(|&v| v as f64).sum();
    round2(sum / values.len() as f64)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
