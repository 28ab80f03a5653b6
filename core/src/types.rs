//! Shared primitive types used across the engine.

/// Stable identifier that scopes persisted history to one simulation feature.
pub type FeatureKey = String;

/// Integer percentage in [0, 100].
pub type Percentage = u32;
