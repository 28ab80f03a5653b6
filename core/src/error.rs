use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No simulation run is active")]
    RunNotActive,

    #[error("No simulation run has been completed yet")]
    NoCompletedRun,

    #[error("History log used before restore()")]
    HistoryNotRestored,

    #[error("History log is full: limit of {limit} entries reached")]
    HistoryFull { limit: usize },

    #[error("Failed to persist result for '{key}': {source}")]
    Persistence {
        key: String,
        #[source]
        source: Box<SimError>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SimError {
    /// Misuse of the engine API, as opposed to an I/O or storage failure.
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            Self::RunNotActive | Self::NoCompletedRun | Self::HistoryNotRestored
        )
    }
}

pub type SimResult<T> = Result<T, SimError>;
