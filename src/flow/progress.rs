//! Per-step completion tracking for the result view.

use std::collections::BTreeSet;

use crate::error::FlowError;
use crate::path::model::LearningPath;

/// Completed step indices for the currently displayed path.
///
/// Keyed by position, so a new path always starts with a fresh tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionTracker {
    completed: BTreeSet<usize>,
    total: usize,
}

impl CompletionTracker {
    pub fn for_path(path: &LearningPath) -> Self {
        Self::with_total(path.steps.len())
    }

    pub fn with_total(total: usize) -> Self {
        Self {
            completed: BTreeSet::new(),
            total,
        }
    }

    /// Flip completion of step `index`. Returns whether it is now completed.
    pub fn toggle(&mut self, index: usize) -> Result<bool, FlowError> {
        if index >= self.total {
            return Err(FlowError::StepOutOfRange {
                index,
                total: self.total,
            });
        }
        if self.completed.remove(&index) {
            Ok(false)
        } else {
            self.completed.insert(index);
            Ok(true)
        }
    }

    pub fn is_completed(&self, index: usize) -> bool {
        self.completed.contains(&index)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn completed_indices(&self) -> Vec<usize> {
        self.completed.iter().copied().collect()
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed.len() as f64 / self.total as f64 * 100.0
    }

    /// Progress rounded for display.
    pub fn rounded_percent(&self) -> u8 {
        self.percent().round() as u8
    }
}
