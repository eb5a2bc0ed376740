//! Canonical defaults. Configuration exists implicitly even before any
//! write: every getter falls back to these values field by field, so reads
//! never fail due to absence.

use rust_decimal_macros::dec;

use crate::types::{CreditRatingBand, RiskTier};

use super::model::{
    CreditCutoffs, RiskConfig, RiskParameters, RiskThresholds, RiskWeights, ThresholdTriple,
};

pub fn default_risk_weights() -> RiskWeights {
    RiskWeights {
        credit_rating: dec!(0.35),
        financial_health: dec!(0.25),
        production_variability: dec!(0.20),
        market_conditions: dec!(0.10),
        policy_impact: dec!(0.10),
    }
}

pub fn default_risk_thresholds() -> RiskThresholds {
    RiskThresholds {
        production: ThresholdTriple {
            low: dec!(20),
            medium: dec!(50),
            high: dec!(80),
        },
        market_volatility: ThresholdTriple {
            low: dec!(15),
            medium: dec!(40),
            high: dec!(70),
        },
        credit: CreditCutoffs {
            investment_grade: dec!(30),
            speculative_grade: dec!(60),
            high_risk: dec!(80),
        },
    }
}

pub fn default_risk_parameters() -> RiskParameters {
    RiskParameters {
        base_discount_rate: dec!(4.0),
        max_discount_rate: dec!(12.0),
        min_discount_rate: dec!(1.5),
        confidence_base: dec!(80),
        confidence_realtime_bonus: dec!(10),
    }
}

/// The 22 canonical rating labels, best to worst.
pub const CANONICAL_RATING_LABELS: &[&str] = &[
    "AAA", "AA+", "AA", "AA-", "A+", "A", "A-", "BBB+", "BBB", "BBB-", "BB+", "BB", "BB-", "B+",
    "B", "B-", "CCC+", "CCC", "CCC-", "CC", "C", "D",
];

/// Canonical 22-band credit matrix, AAA through D. Default rates and spreads
/// follow the usual agency-style grid shape: slow growth through investment
/// grade, steep growth below it.
pub fn default_credit_matrix() -> Vec<CreditRatingBand> {
    let grid: &[(&str, rust_decimal::Decimal, rust_decimal::Decimal, bool, RiskTier)] = &[
        ("AAA", dec!(0.0002), dec!(50), true, RiskTier::Prime),
        ("AA+", dec!(0.0003), dec!(60), true, RiskTier::Prime),
        ("AA", dec!(0.0005), dec!(70), true, RiskTier::Prime),
        ("AA-", dec!(0.0008), dec!(85), true, RiskTier::Prime),
        ("A+", dec!(0.0010), dec!(100), true, RiskTier::InvestmentGrade),
        ("A", dec!(0.0015), dec!(120), true, RiskTier::InvestmentGrade),
        ("A-", dec!(0.0025), dec!(145), true, RiskTier::InvestmentGrade),
        ("BBB+", dec!(0.0040), dec!(175), true, RiskTier::InvestmentGrade),
        ("BBB", dec!(0.0060), dec!(210), true, RiskTier::InvestmentGrade),
        ("BBB-", dec!(0.0100), dec!(260), true, RiskTier::InvestmentGrade),
        ("BB+", dec!(0.0175), dec!(325), false, RiskTier::Speculative),
        ("BB", dec!(0.0250), dec!(400), false, RiskTier::Speculative),
        ("BB-", dec!(0.0400), dec!(500), false, RiskTier::Speculative),
        ("B+", dec!(0.0600), dec!(625), false, RiskTier::Speculative),
        ("B", dec!(0.0850), dec!(775), false, RiskTier::Speculative),
        ("B-", dec!(0.1200), dec!(950), false, RiskTier::Speculative),
        ("CCC+", dec!(0.1600), dec!(1150), false, RiskTier::HighRisk),
        ("CCC", dec!(0.2000), dec!(1400), false, RiskTier::HighRisk),
        ("CCC-", dec!(0.2500), dec!(1700), false, RiskTier::HighRisk),
        ("CC", dec!(0.3000), dec!(2100), false, RiskTier::HighRisk),
        ("C", dec!(0.4000), dec!(2600), false, RiskTier::HighRisk),
        ("D", dec!(1.0000), dec!(5000), false, RiskTier::DefaultRisk),
    ];

    grid.iter()
        .map(
            |(rating, default_rate, spread_bps, investment_grade, risk_tier)| CreditRatingBand {
                rating: (*rating).to_string(),
                default_rate: *default_rate,
                spread_bps: *spread_bps,
                investment_grade: *investment_grade,
                risk_tier: *risk_tier,
            },
        )
        .collect()
}

/// A complete default snapshot.
pub fn default_risk_config() -> RiskConfig {
    RiskConfig {
        weights: default_risk_weights(),
        thresholds: default_risk_thresholds(),
        parameters: default_risk_parameters(),
        credit_matrix: default_credit_matrix(),
    }
}
