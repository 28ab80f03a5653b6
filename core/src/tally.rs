//! Answer tally: correct/total counters for the active run.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerTally {
    correct_count: u64,
    total_count:   u64,
}

impl AnswerTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one answer. `correct_count <= total_count` always holds.
    pub fn record_answer(&mut self, was_correct: bool) {
        self.total_count += 1;
        if was_correct {
            self.correct_count += 1;
        }
        log::debug!(
            "Tally now {}/{}",
            self.correct_count, self.total_count
        );
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn correct_count(&self) -> u64 { self.correct_count }
    pub fn total_count(&self)   -> u64 { self.total_count }
}
