//! Stats aggregator: lifetime summary derived from the history log.
//!
//! RULE: OverallStats is never stored. It is recomputed from the full
//! history on every read so it cannot go stale.

use crate::{score::ResultRecord, types::Percentage};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub total_simulations: usize,
    pub best_score:        Percentage,
    pub average_score:     Percentage,
}

/// Summarize `history`. An empty history is the zero state.
///
/// The average is the unweighted mean of each run's percentage, not a
/// mean weighted by questions answered.
pub fn aggregate(history: &[ResultRecord]) -> OverallStats {
    if history.is_empty() {
        return OverallStats::default();
    }
    let n = history.len() as u64;
    let sum: u64 = history.iter().map(|r| r.percentage as u64).sum();
    let best = history.iter().map(|r| r.percentage).max().unwrap_or(0);

    OverallStats {
        total_simulations: history.len(),
        best_score:        best,
        average_score:     ((2 * sum + n) / (2 * n)) as Percentage,
    }
}
