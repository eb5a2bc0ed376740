//! Risk scoring: signal resolution, the scoring engine, and the
//! cache-aware scoring service.

pub mod engine;
pub mod service;
pub mod signals;

pub use engine::{
    assess_risk, classify_against, classify_composite, credit_subscore, validate_config,
    RiskAssessment,
};
pub use service::{
    BatchFailure, BatchRecalcSummary, InMemoryReceivableStore, ReceivableStore,
    RiskScoringService, SignalProvider, StaticSignalProvider,
};
pub use signals::{
    confidence_for, resolve_component, ResolvedComponent, RiskSignals,
    DEGRADED_PENALTY_FRACTION, NEUTRAL_COMPONENT_SCORE,
};
