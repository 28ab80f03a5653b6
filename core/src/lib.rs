//! Scoring and statistics engine for the phishing-awareness simulation.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod rng;
pub mod score;
pub mod snapshot;
pub mod stats;
pub mod store;
pub mod tally;
pub mod types;
