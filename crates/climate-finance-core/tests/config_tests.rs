use std::sync::Arc;

use climate_finance_core::config::{
    defaults, keys, InMemoryConfigRepository, RiskConfigStore, RiskWeights,
};
use climate_finance_core::{ClimateFinanceError, CreditRatingBand, RiskTier};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

// ===========================================================================
// Configuration store tests
// ===========================================================================

fn store() -> RiskConfigStore {
    RiskConfigStore::new(Arc::new(InMemoryConfigRepository::new()))
}

#[test]
fn test_canonical_weights_accepted() {
    let s = store();
    let w = RiskWeights {
        credit_rating: dec!(0.35),
        financial_health: dec!(0.25),
        production_variability: dec!(0.20),
        market_conditions: dec!(0.10),
        policy_impact: dec!(0.10),
    };
    assert!(s.update_risk_weights(&w).is_ok());
    assert_eq!(s.get_risk_weights(), w);
}

#[test]
fn test_weights_summing_to_1_05_rejected_and_store_unchanged() {
    let s = store();
    s.update_risk_weights(&defaults::default_risk_weights())
        .unwrap();

    let bad = RiskWeights {
        credit_rating: dec!(0.40),
        financial_health: dec!(0.25),
        production_variability: dec!(0.20),
        market_conditions: dec!(0.10),
        policy_impact: dec!(0.10),
    };
    let err = s.update_risk_weights(&bad).unwrap_err();
    assert!(matches!(err, ClimateFinanceError::Validation { .. }));
    assert_eq!(s.get_risk_weights(), defaults::default_risk_weights());
}

#[test]
fn test_reset_to_defaults_returns_canonical_weights() {
    let s = store();
    let skewed = RiskWeights {
        credit_rating: dec!(0.50),
        financial_health: dec!(0.20),
        production_variability: dec!(0.15),
        market_conditions: dec!(0.10),
        policy_impact: dec!(0.05),
    };
    s.update_risk_weights(&skewed).unwrap();

    s.reset_to_defaults().unwrap();
    let w = s.get_risk_weights();
    assert_eq!(w.credit_rating, dec!(0.35));
    assert_eq!(w.financial_health, dec!(0.25));
    assert_eq!(w.production_variability, dec!(0.20));
    assert_eq!(w.market_conditions, dec!(0.10));
    assert_eq!(w.policy_impact, dec!(0.10));
}

#[test]
fn test_parameter_invariants_enforced() {
    let s = store();
    let mut p = defaults::default_risk_parameters();

    p.min_discount_rate = dec!(5.0);
    p.base_discount_rate = dec!(4.0); // min > base
    assert!(s.update_risk_parameters(&p).is_err());

    p = defaults::default_risk_parameters();
    p.confidence_base = dec!(98);
    assert!(s.update_risk_parameters(&p).is_err());

    p = defaults::default_risk_parameters();
    p.confidence_base = dec!(95);
    assert!(s.update_risk_parameters(&p).is_ok());
    assert_eq!(s.get_risk_parameters().confidence_base, dec!(95));
}

#[test]
fn test_threshold_monotonicity_enforced() {
    let s = store();
    let mut t = defaults::default_risk_thresholds();
    t.production.low = dec!(60);
    t.production.medium = dec!(50);
    let err = s.update_risk_thresholds(&t).unwrap_err();
    assert!(err.to_string().contains("production"));
    assert_eq!(s.get_risk_thresholds(), defaults::default_risk_thresholds());
}

#[test]
fn test_default_matrix_served_when_nothing_configured() {
    let s = store();
    let matrix = s.get_credit_rating_matrix();
    assert_eq!(matrix.len(), 22);
    assert_eq!(matrix.first().map(|b| b.rating.as_str()), Some("AAA"));
    assert!(matrix.iter().any(|b| b.rating == "D"));
}

#[test]
fn test_rating_label_storage_key_mapping() {
    // Each band expands into four keys derived from the label encoding.
    let repo = Arc::new(InMemoryConfigRepository::new());
    let s = RiskConfigStore::new(repo.clone());
    let bands = vec![CreditRatingBand {
        rating: "BB+".into(),
        default_rate: dec!(0.0175),
        spread_bps: dec!(325),
        investment_grade: false,
        risk_tier: RiskTier::Speculative,
    }];
    s.update_credit_rating_matrix(&bands).unwrap();

    use climate_finance_core::config::ConfigRepository;
    assert_eq!(
        repo.get("credit_rating_bb_plus_default_rate").as_deref(),
        Some("0.0175")
    );
    assert_eq!(
        repo.get("credit_rating_bb_plus_spread_bps").as_deref(),
        Some("325")
    );
    assert_eq!(
        repo.get("credit_rating_bb_plus_investment_grade").as_deref(),
        Some("false")
    );
    assert_eq!(
        repo.get("credit_rating_bb_plus_risk_tier").as_deref(),
        Some("Speculative")
    );

    // And the read path decodes the same keys back into the band.
    let round_tripped = s.get_credit_rating_matrix();
    assert_eq!(round_tripped, bands);
}

#[test]
fn test_label_key_mapping_roundtrip_for_all_canonical_bands() {
    for label in defaults::CANONICAL_RATING_LABELS {
        let encoded = keys::encode_rating_label(label);
        assert_eq!(&keys::decode_rating_label(&encoded), label);
    }
}

#[test]
fn test_partially_configured_store_yields_complete_values() {
    let s = store();
    // Write only the thresholds; weights and parameters stay default.
    s.update_risk_thresholds(&defaults::default_risk_thresholds())
        .unwrap();
    let snapshot = s.snapshot();
    assert!(snapshot.validate().is_ok());
    assert_eq!(snapshot.weights, defaults::default_risk_weights());
    assert_eq!(snapshot.parameters, defaults::default_risk_parameters());
}
