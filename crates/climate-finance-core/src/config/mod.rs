//! Configuration store: weights, thresholds, scalar parameters, and the
//! credit-rating matrix, persisted as a flat key→value table.

pub mod defaults;
pub mod keys;
pub mod model;
pub mod repository;
pub mod store;

pub use model::{
    CreditCutoffs, RiskConfig, RiskParameters, RiskThresholds, RiskWeights, ThresholdTriple,
    CONFIDENCE_BASE_MAX, CONFIDENCE_BASE_MIN, WEIGHT_SUM_TOLERANCE,
};
pub use repository::{ConfigRepository, InMemoryConfigRepository};
pub use store::RiskConfigStore;
