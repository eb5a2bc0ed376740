//! Risk scoring engine.
//!
//! A pure function of (receivable, configuration snapshot, signals):
//! identical inputs always produce identical output. The engine trusts
//! nothing — an invalid snapshot fails the whole calculation with a
//! `Configuration` error rather than silently substituting defaults, which
//! is the store's job, not the engine's.

use std::time::Instant;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::model::{CreditCutoffs, ThresholdTriple};
use crate::config::RiskConfig;
use crate::error::ClimateFinanceError;
use crate::types::{
    with_metadata, ComputationOutput, CreditRatingBand, Pct, Receivable, RiskLevel, Score,
};
use crate::ClimateFinanceResult;

use super::signals::{
    confidence_for, resolve_component, ResolvedComponent, RiskSignals, NEUTRAL_COMPONENT_SCORE,
};

/// Full result of one risk calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub receivable_id: Uuid,
    /// Composite score in [0, 100]; higher is riskier.
    pub composite_score: Score,
    /// Overall level, located against the configured credit cutoffs.
    pub risk_level: RiskLevel,
    /// Production sub-score located against the production thresholds.
    /// Absent when serving a cached score (components not re-resolved).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_level: Option<RiskLevel>,
    /// Market sub-score located against the volatility thresholds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_level: Option<RiskLevel>,
    /// Discount rate in percentage points.
    pub discount_rate: Pct,
    /// Confidence in [0, 100].
    pub confidence: Score,
    /// Every component that entered the composite, with live/default flags.
    pub components: Vec<ResolvedComponent>,
    /// True when every component was backed by a live signal.
    pub fully_live: bool,
}

/// Validate a snapshot before any calculation. Store-level validation errors
/// become `Configuration` here: the engine was handed a bad snapshot.
pub fn validate_config(config: &RiskConfig) -> ClimateFinanceResult<()> {
    config
        .validate()
        .map_err(|e| ClimateFinanceError::Configuration(e.to_string()))
}

/// Locate a 0–100 score against a low/medium/high triple.
pub fn classify_against(triple: &ThresholdTriple, score: Score) -> RiskLevel {
    if score < triple.low {
        RiskLevel::Low
    } else if score < triple.medium {
        RiskLevel::Medium
    } else if score < triple.high {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

/// Locate a composite score against the configured credit cutoffs.
pub fn classify_composite(cutoffs: &CreditCutoffs, score: Score) -> RiskLevel {
    if score < cutoffs.investment_grade {
        RiskLevel::Low
    } else if score < cutoffs.speculative_grade {
        RiskLevel::Medium
    } else if score < cutoffs.high_risk {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

/// Map a rating label to a 0–100 sub-score: the band's rank within the
/// matrix ordered by ascending default rate, scaled to the score range.
/// Works for arbitrary configured matrices — labels are opaque, the default
/// rate is the one ordered numeric field every band carries.
pub fn credit_subscore(matrix: &[CreditRatingBand], label: &str) -> ClimateFinanceResult<Score> {
    let mut ordered: Vec<&CreditRatingBand> = matrix.iter().collect();
    ordered.sort_by(|a, b| a.default_rate.cmp(&b.default_rate).then(a.rating.cmp(&b.rating)));

    let rank = ordered
        .iter()
        .position(|b| b.rating.eq_ignore_ascii_case(label))
        .ok_or_else(|| ClimateFinanceError::not_found("Credit rating", label))?;

    if ordered.len() < 2 {
        return Ok(NEUTRAL_COMPONENT_SCORE);
    }
    let span = Decimal::from((ordered.len() - 1) as u64);
    Ok(dec!(100) * Decimal::from(rank as u64) / span)
}

/// Map a composite score into the configured discount-rate range: 0 anchors
/// to the minimum rate, 100 to the maximum. When no component was live the
/// base rate is used instead — there is nothing to risk-adjust from.
fn discount_rate_for(config: &RiskConfig, score: Score, any_live: bool) -> Pct {
    let p = &config.parameters;
    if !any_live {
        return p.base_discount_rate;
    }
    p.min_discount_rate + (score / dec!(100)) * (p.max_discount_rate - p.min_discount_rate)
}

/// Calculate the composite risk score, level, discount rate, and confidence
/// for one receivable.
pub fn assess_risk(
    receivable: &Receivable,
    config: &RiskConfig,
    signals: &RiskSignals,
) -> ClimateFinanceResult<ComputationOutput<RiskAssessment>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_config(config)?;

    // -- Resolve the five components -----------------------------------------
    let credit = match &signals.credit_rating {
        Some(label) => ResolvedComponent {
            name: "credit_rating".into(),
            value: credit_subscore(&config.credit_matrix, label)?,
            live: true,
        },
        None => ResolvedComponent {
            name: "credit_rating".into(),
            value: NEUTRAL_COMPONENT_SCORE,
            live: false,
        },
    };
    let financial = resolve_component(
        "financial_health",
        signals.financial_health,
        NEUTRAL_COMPONENT_SCORE,
    );
    let production = resolve_component(
        "production_variability",
        signals.production_variability,
        NEUTRAL_COMPONENT_SCORE,
    );
    let market = resolve_component(
        "market_volatility",
        signals.market_volatility,
        NEUTRAL_COMPONENT_SCORE,
    );
    let policy = resolve_component(
        "policy_impact",
        signals.policy_impact,
        NEUTRAL_COMPONENT_SCORE,
    );

    let components = vec![credit, financial, production, market, policy];
    for c in components.iter().filter(|c| !c.live) {
        warnings.push(format!(
            "No live signal for {}; using neutral default {NEUTRAL_COMPONENT_SCORE}.",
            c.name
        ));
    }

    // -- Composite ------------------------------------------------------------
    let w = &config.weights;
    let weighted = w.credit_rating * components[0].value
        + w.financial_health * components[1].value
        + w.production_variability * components[2].value
        + w.market_conditions * components[3].value
        + w.policy_impact * components[4].value;
    let composite_score = weighted.clamp(Decimal::ZERO, dec!(100));

    let live_count = components.iter().filter(|c| c.live).count();
    let fully_live = live_count == components.len();

    let assessment = RiskAssessment {
        receivable_id: receivable.id,
        composite_score,
        risk_level: classify_composite(&config.thresholds.credit, composite_score),
        production_level: Some(classify_against(
            &config.thresholds.production,
            components[2].value,
        )),
        market_level: Some(classify_against(
            &config.thresholds.market_volatility,
            components[3].value,
        )),
        discount_rate: discount_rate_for(config, composite_score, live_count > 0),
        confidence: confidence_for(&config.parameters, live_count, components.len()),
        components,
        fully_live,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "neutral_component_score": NEUTRAL_COMPONENT_SCORE.to_string(),
        "credit_subscore": "band rank by ascending default rate, scaled to 0-100",
        "discount_anchoring": "score 0 -> min rate, score 100 -> max rate, base rate when no live signal",
    });

    Ok(with_metadata(
        "Composite weighted risk scoring",
        &assumptions,
        warnings,
        elapsed,
        assessment,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::default_risk_config;
    use chrono::NaiveDate;

    fn sample_receivable() -> Receivable {
        Receivable {
            id: Uuid::nil(),
            asset_id: Uuid::nil(),
            payer_id: Uuid::nil(),
            amount: dec!(10_000),
            due_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            risk_score: None,
            discount_rate: None,
        }
    }

    fn full_signals() -> RiskSignals {
        RiskSignals {
            credit_rating: Some("BBB".into()),
            financial_health: Some(dec!(40)),
            production_variability: Some(dec!(30)),
            market_volatility: Some(dec!(25)),
            policy_impact: Some(dec!(20)),
        }
    }

    #[test]
    fn test_deterministic_for_identical_inputs() {
        let r = sample_receivable();
        let config = default_risk_config();
        let signals = full_signals();
        let a = assess_risk(&r, &config, &signals).unwrap().result;
        let b = assess_risk(&r, &config, &signals).unwrap().result;
        assert_eq!(a.composite_score, b.composite_score);
        assert_eq!(a.discount_rate, b.discount_rate);
        assert_eq!(a.confidence, b.confidence);
    }

    #[test]
    fn test_invalid_config_fails_whole_calculation() {
        let r = sample_receivable();
        let mut config = default_risk_config();
        config.weights.credit_rating = dec!(0.90); // sum far from 1
        let err = assess_risk(&r, &config, &full_signals()).unwrap_err();
        assert!(matches!(err, ClimateFinanceError::Configuration(_)));
    }

    #[test]
    fn test_unknown_rating_label_is_not_found() {
        let r = sample_receivable();
        let config = default_risk_config();
        let mut signals = full_signals();
        signals.credit_rating = Some("ZZZ".into());
        let err = assess_risk(&r, &config, &signals).unwrap_err();
        assert!(matches!(err, ClimateFinanceError::NotFound { .. }));
    }

    #[test]
    fn test_missing_signal_degrades_not_fails() {
        let r = sample_receivable();
        let config = default_risk_config();
        let mut signals = full_signals();
        signals.market_volatility = None;
        let out = assess_risk(&r, &config, &signals).unwrap();
        assert!(!out.result.fully_live);
        assert!(!out.warnings.is_empty());
        // 80 - 80*0.10 = 72
        assert_eq!(out.result.confidence, dec!(72.0));
    }

    #[test]
    fn test_fully_live_earns_bonus_confidence() {
        let r = sample_receivable();
        let config = default_risk_config();
        let out = assess_risk(&r, &config, &full_signals()).unwrap();
        assert!(out.result.fully_live);
        assert_eq!(out.result.confidence, dec!(90));
    }

    #[test]
    fn test_no_signals_at_all_uses_base_discount_rate() {
        let r = sample_receivable();
        let config = default_risk_config();
        let out = assess_risk(&r, &config, &RiskSignals::default()).unwrap();
        assert_eq!(out.result.discount_rate, config.parameters.base_discount_rate);
        // All five components defaulted: 80 - 80*0.10*5 = 40
        assert_eq!(out.result.confidence, dec!(40.0));
    }

    #[test]
    fn test_discount_rate_anchoring() {
        let config = default_risk_config();
        assert_eq!(
            discount_rate_for(&config, Decimal::ZERO, true),
            config.parameters.min_discount_rate
        );
        assert_eq!(
            discount_rate_for(&config, dec!(100), true),
            config.parameters.max_discount_rate
        );
        // Midpoint: 1.5 + 0.5*(12-1.5) = 6.75
        assert_eq!(discount_rate_for(&config, dec!(50), true), dec!(6.750));
    }

    #[test]
    fn test_credit_subscore_endpoints() {
        let config = default_risk_config();
        assert_eq!(credit_subscore(&config.credit_matrix, "AAA").unwrap(), Decimal::ZERO);
        assert_eq!(credit_subscore(&config.credit_matrix, "D").unwrap(), dec!(100));
    }

    #[test]
    fn test_credit_subscore_monotone_in_rating_quality() {
        let config = default_risk_config();
        let aa = credit_subscore(&config.credit_matrix, "AA").unwrap();
        let bbb = credit_subscore(&config.credit_matrix, "BBB").unwrap();
        let ccc = credit_subscore(&config.credit_matrix, "CCC").unwrap();
        assert!(aa < bbb && bbb < ccc);
    }

    #[test]
    fn test_composite_is_weighted_sum() {
        let r = sample_receivable();
        let config = default_risk_config();
        // BBB is rank 8 of 22: subscore = 100*8/21
        let credit = dec!(100) * dec!(8) / dec!(21);
        let expected = dec!(0.35) * credit
            + dec!(0.25) * dec!(40)
            + dec!(0.20) * dec!(30)
            + dec!(0.10) * dec!(25)
            + dec!(0.10) * dec!(20);
        let out = assess_risk(&r, &config, &full_signals()).unwrap();
        assert_eq!(out.result.composite_score, expected);
    }

    #[test]
    fn test_risk_level_boundaries_come_from_config() {
        let mut config = default_risk_config();
        config.thresholds.credit = CreditCutoffs {
            investment_grade: dec!(10),
            speculative_grade: dec!(20),
            high_risk: dec!(30),
        };
        assert_eq!(classify_composite(&config.thresholds.credit, dec!(5)), RiskLevel::Low);
        assert_eq!(classify_composite(&config.thresholds.credit, dec!(10)), RiskLevel::Medium);
        assert_eq!(classify_composite(&config.thresholds.credit, dec!(25)), RiskLevel::High);
        assert_eq!(classify_composite(&config.thresholds.credit, dec!(30)), RiskLevel::Critical);
    }

    #[test]
    fn test_sub_level_classification_uses_triples() {
        let config = default_risk_config();
        // production triple {20, 50, 80}
        assert_eq!(
            classify_against(&config.thresholds.production, dec!(19)),
            RiskLevel::Low
        );
        assert_eq!(
            classify_against(&config.thresholds.production, dec!(20)),
            RiskLevel::Medium
        );
        assert_eq!(
            classify_against(&config.thresholds.production, dec!(79)),
            RiskLevel::High
        );
        assert_eq!(
            classify_against(&config.thresholds.production, dec!(80)),
            RiskLevel::Critical
        );
    }
}
