//! History log: ordered, append-only record of completed runs.
//!
//! RULES:
//!   - Insertion order is chronological order; entries are never
//!     mutated, reordered or deleted.
//!   - append() is write-through: the record is durable before it
//!     joins the in-memory log. A failed write leaves the log at its
//!     last known good contents.

use crate::{
    error::{SimError, SimResult},
    score::ResultRecord,
    types::FeatureKey,
};

/// Durable backing for the history log.
pub trait HistoryStore {
    /// All persisted records for `feature_key`, oldest first.
    /// No prior state is an empty vec, not an error.
    fn load(&self, feature_key: &str) -> SimResult<Vec<ResultRecord>>;

    /// Durably persist one record. Must not disturb existing records on failure.
    fn append(&self, feature_key: &str, record: &ResultRecord) -> SimResult<()>;
}

pub struct HistoryLog {
    feature_key: FeatureKey,
    limit:       Option<usize>,
    store:       Box<dyn HistoryStore>,
    entries:     Option<Vec<ResultRecord>>, // None until restore()
}

impl HistoryLog {
    pub fn new(feature_key: FeatureKey, limit: Option<usize>, store: Box<dyn HistoryStore>) -> Self {
        Self {
            feature_key,
            limit,
            store,
            entries: None,
        }
    }

    /// Load persisted entries. Must run before the first append()/all().
    /// Calling it again reloads from the store.
    pub fn restore(&mut self) -> SimResult<usize> {
        let entries = self.store.load(&self.feature_key)?;
        log::info!(
            "Restored {} result(s) for '{}'",
            entries.len(), self.feature_key
        );
        let count = entries.len();
        self.entries = Some(entries);
        Ok(count)
    }

    pub fn is_restored(&self) -> bool {
        self.entries.is_some()
    }

    pub fn append(&mut self, record: ResultRecord) -> SimResult<()> {
        let limit = self.limit;
        let entries = self.entries.as_mut().ok_or(SimError::HistoryNotRestored)?;
        if let Some(limit) = limit {
            if entries.len() >= limit {
                return Err(SimError::HistoryFull { limit });
            }
        }

        if let Err(e) = self.store.append(&self.feature_key, &record) {
            log::warn!("Persisting result for '{}' failed: {e}", self.feature_key);
            return Err(SimError::Persistence {
                key:    self.feature_key.clone(),
                source: Box::new(e),
            });
        }
        entries.push(record);
        Ok(())
    }

    /// Defensive copy of every entry, oldest first.
    pub fn all(&self) -> SimResult<Vec<ResultRecord>> {
        Ok(self.entries()?.to_vec())
    }

    /// Read-only view of every entry, oldest first.
    pub fn entries(&self) -> SimResult<&[ResultRecord]> {
        self.entries.as_deref().ok_or(SimError::HistoryNotRestored)
    }

    pub fn feature_key(&self) -> &str {
        &self.feature_key
    }
}
