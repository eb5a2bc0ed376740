//! Configuration value objects and their invariants.
//!
//! Validation lives here so that both the store (before persisting) and the
//! risk engine (before trusting a snapshot) apply the same rules.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ClimateFinanceError;
use crate::types::{CreditRatingBand, Pct, Score};
use crate::ClimateFinanceResult;

/// Accepted deviation of the weight sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: Decimal = dec!(0.001);

/// Bounds on the confidence base parameter.
pub const CONFIDENCE_BASE_MIN: Decimal = dec!(50);
pub const CONFIDENCE_BASE_MAX: Decimal = dec!(95);

/// Relative weight of each scoring component. Fractions, must sum to 1.0
/// within [`WEIGHT_SUM_TOLERANCE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskWeights {
    pub credit_rating: Decimal,
    pub financial_health: Decimal,
    pub production_variability: Decimal,
    pub market_conditions: Decimal,
    pub policy_impact: Decimal,
}

impl RiskWeights {
    pub fn sum(&self) -> Decimal {
        self.credit_rating
            + self.financial_health
            + self.production_variability
            + self.market_conditions
            + self.policy_impact
    }

    pub fn validate(&self) -> ClimateFinanceResult<()> {
        for (name, w) in [
            ("credit_rating", self.credit_rating),
            ("financial_health", self.financial_health),
            ("production_variability", self.production_variability),
            ("market_conditions", self.market_conditions),
            ("policy_impact", self.policy_impact),
        ] {
            if w < Decimal::ZERO {
                return Err(ClimateFinanceError::validation(
                    name,
                    "Risk weights must be non-negative.",
                ));
            }
        }
        let sum = self.sum();
        if (sum - Decimal::ONE).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ClimateFinanceError::validation(
                "weights",
                format!("Risk weights must sum to 1.0 ± {WEIGHT_SUM_TOLERANCE}, got {sum}."),
            ));
        }
        Ok(())
    }
}

/// A low/medium/high cutoff triple on the 0–100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTriple {
    pub low: Score,
    pub medium: Score,
    pub high: Score,
}

impl ThresholdTriple {
    fn validate(&self, name: &str) -> ClimateFinanceResult<()> {
        if !(self.low < self.medium && self.medium < self.high) {
            return Err(ClimateFinanceError::validation(
                name,
                format!(
                    "Thresholds must be strictly increasing (low < medium < high), got {} / {} / {}.",
                    self.low, self.medium, self.high
                ),
            ));
        }
        Ok(())
    }
}

/// Score cutoffs separating the credit-quality zones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreditCutoffs {
    pub investment_grade: Score,
    pub speculative_grade: Score,
    pub high_risk: Score,
}

impl CreditCutoffs {
    fn validate(&self) -> ClimateFinanceResult<()> {
        if !(self.investment_grade < self.speculative_grade
            && self.speculative_grade < self.high_risk)
        {
            return Err(ClimateFinanceError::validation(
                "credit",
                format!(
                    "Credit cutoffs must be strictly increasing (investment_grade < speculative_grade < high_risk), got {} / {} / {}.",
                    self.investment_grade, self.speculative_grade, self.high_risk
                ),
            ));
        }
        Ok(())
    }
}

/// The nine threshold values driving level classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub production: ThresholdTriple,
    pub market_volatility: ThresholdTriple,
    pub credit: CreditCutoffs,
}

impl RiskThresholds {
    pub fn validate(&self) -> ClimateFinanceResult<()> {
        self.production.validate("production")?;
        self.market_volatility.validate("market_volatility")?;
        self.credit.validate()?;
        Ok(())
    }
}

/// Scalar parameters for discount-rate and confidence calculation.
/// Discount rates are percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskParameters {
    pub base_discount_rate: Pct,
    pub max_discount_rate: Pct,
    pub min_discount_rate: Pct,
    pub confidence_base: Score,
    pub confidence_realtime_bonus: Score,
}

impl RiskParameters {
    pub fn validate(&self) -> ClimateFinanceResult<()> {
        if !(self.min_discount_rate < self.base_discount_rate
            && self.base_discount_rate < self.max_discount_rate)
        {
            return Err(ClimateFinanceError::validation(
                "discount_rates",
                format!(
                    "Discount rates must satisfy min < base < max, got min {} / base {} / max {}.",
                    self.min_discount_rate, self.base_discount_rate, self.max_discount_rate
                ),
            ));
        }
        if self.confidence_base < CONFIDENCE_BASE_MIN || self.confidence_base > CONFIDENCE_BASE_MAX
        {
            return Err(ClimateFinanceError::validation(
                "confidence_base",
                format!(
                    "Confidence base must lie in [{CONFIDENCE_BASE_MIN}, {CONFIDENCE_BASE_MAX}], got {}.",
                    self.confidence_base
                ),
            ));
        }
        if self.confidence_realtime_bonus < Decimal::ZERO {
            return Err(ClimateFinanceError::validation(
                "confidence_realtime_bonus",
                "Real-time confidence bonus must be non-negative.",
            ));
        }
        Ok(())
    }
}

/// A complete, validated configuration snapshot. The risk engine consumes
/// these; it never reads the store directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    pub weights: RiskWeights,
    pub thresholds: RiskThresholds,
    pub parameters: RiskParameters,
    pub credit_matrix: Vec<CreditRatingBand>,
}

impl RiskConfig {
    /// Validate the whole snapshot. Used by the engine to fail fast with a
    /// `Configuration` error rather than silently substituting defaults.
    pub fn validate(&self) -> ClimateFinanceResult<()> {
        self.weights.validate()?;
        self.thresholds.validate()?;
        self.parameters.validate()?;
        if self.credit_matrix.is_empty() {
            return Err(ClimateFinanceError::validation(
                "credit_matrix",
                "Credit rating matrix must contain at least one band.",
            ));
        }
        let mut seen = std::collections::BTreeSet::new();
        for band in &self.credit_matrix {
            if !seen.insert(band.rating.as_str()) {
                return Err(ClimateFinanceError::validation(
                    "credit_matrix",
                    format!("Duplicate rating label: {}.", band.rating),
                ));
            }
        }
        Ok(())
    }
}
