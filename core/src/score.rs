//! Score calculator: turns a finished tally into an immutable result.
//!
//! RULE: no I/O here. The finalization instant is passed in by the caller.

use crate::{tally::AnswerTally, types::Percentage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of one completed run. Field names match the persisted layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub score:          u64,
    pub total_answered: u64,
    pub percentage:     Percentage,
    pub timestamp:      DateTime<Utc>,
}

/// Build the result record for `tally`, stamped with `at`.
pub fn finalize(tally: &AnswerTally, at: DateTime<Utc>) -> ResultRecord {
    let score = tally.correct_count();
    let total_answered = tally.total_count();
    let record = ResultRecord {
        score,
        total_answered,
        percentage: percentage(score, total_answered),
        timestamp: at,
    };
    log::debug!(
        "Finalized run: {}/{} = {}%",
        record.score, record.total_answered, record.percentage
    );
    record
}

/// `round(100 * score / total)` with halves rounded away from zero.
/// Zero answered questions yields 0.
pub fn percentage(score: u64, total: u64) -> Percentage {
    if total == 0 {
        return 0;
    }
    let score = score.min(total) as u128;
    let total = total as u128;
    // Integer form of floor(100 * score / total + 0.5).
    ((200 * score + total) / (2 * total)) as Percentage
}
