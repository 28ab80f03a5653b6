use crate::types::FeatureKey;
use serde::{Deserialize, Serialize};

fn default_feature_key() -> FeatureKey {
    "phishing_simulation".into()
}

fn default_questions_per_run() -> u32 {
    10
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Key that scopes persisted history to this simulation feature.
    #[serde(default = "default_feature_key")]
    pub feature_key: FeatureKey,
    /// Maximum number of history entries. None = unbounded.
    /// A full log rejects appends; entries are never evicted.
    #[serde(default)]
    pub history_limit: Option<usize>,
    /// Question set size used by headless runs.
    #[serde(default = "default_questions_per_run")]
    pub questions_per_run: u32,
}

impl SimConfig {
    /// Load from the data/ directory.
    /// In tests, use SimConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/simulation.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid {path}: {e}"))?;
        if config.feature_key.trim().is_empty() {
            anyhow::bail!("{path}: feature_key must not be empty");
        }
        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            feature_key:       default_feature_key(),
            history_limit:     None,
            questions_per_run: default_questions_per_run(),
        }
    }
}
