//! Snapshot serialization: full history to/from JSON.
//!
//! The JSON layout is the durable contract shared with embedding
//! applications: the feature key plus an ordered list of
//! `{score, totalAnswered, percentage, timestamp}` records.

use crate::{error::SimResult, score::ResultRecord, types::FeatureKey};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySnapshot {
    pub feature_key: FeatureKey,
    pub records:     Vec<ResultRecord>,
}

impl HistorySnapshot {
    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
