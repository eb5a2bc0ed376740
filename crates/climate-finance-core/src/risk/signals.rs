//! Externally resolved risk signals and the graceful-degradation policy.
//!
//! Upstream providers (credit rating, weather/production, market, policy)
//! supply already-resolved values or nothing at all. A missing signal never
//! fails a calculation: the component falls back to a neutral default and the
//! reported confidence drops. Both halves of that policy live here as plain
//! functions so they can be tested in isolation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::RiskParameters;
use crate::types::Score;

/// Neutral default substituted for any missing 0–100 component.
pub const NEUTRAL_COMPONENT_SCORE: Decimal = dec!(50);

/// Fraction of the confidence base forfeited per defaulted component.
pub const DEGRADED_PENALTY_FRACTION: Decimal = dec!(0.10);

/// Raw signals for one receivable. Every field is optional; absence triggers
/// degradation, not failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskSignals {
    /// Payer credit rating label, e.g. "BBB+".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_rating: Option<String>,
    /// Payer financial-health risk score, 0 (strong) to 100 (distressed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial_health: Option<Score>,
    /// Production variability estimate, 0 (steady) to 100 (erratic).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_variability: Option<Score>,
    /// Market volatility estimate, 0–100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_volatility: Option<Score>,
    /// Policy impact estimate, 0–100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_impact: Option<Score>,
}

/// One scoring component after resolution: its value on the 0–100 scale and
/// whether a live signal backed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedComponent {
    pub name: String,
    pub value: Score,
    pub live: bool,
}

/// Resolve one component: a present signal is clamped into [0, 100] and
/// marked live; an absent one takes the neutral default.
pub fn resolve_component(name: &str, signal: Option<Score>, default: Score) -> ResolvedComponent {
    match signal {
        Some(value) => ResolvedComponent {
            name: name.to_string(),
            value: value.clamp(Decimal::ZERO, dec!(100)),
            live: true,
        },
        None => ResolvedComponent {
            name: name.to_string(),
            value: default,
            live: false,
        },
    }
}

/// Confidence policy:
/// - every component live → base + real-time bonus;
/// - otherwise → base minus `DEGRADED_PENALTY_FRACTION × base` per defaulted
///   component;
/// - always capped to [0, 100].
pub fn confidence_for(parameters: &RiskParameters, live_count: usize, total: usize) -> Score {
    let confidence = if live_count == total {
        parameters.confidence_base + parameters.confidence_realtime_bonus
    } else {
        let defaulted = Decimal::from((total - live_count) as u64);
        parameters.confidence_base
            - parameters.confidence_base * DEGRADED_PENALTY_FRACTION * defaulted
    };
    confidence.clamp(Decimal::ZERO, dec!(100))
}
