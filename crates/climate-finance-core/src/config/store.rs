//! The configuration store: validated reads and writes over the flat table.
//!
//! Reads never fail due to absence. Each field falls back to its named
//! default individually, so a partially configured table still yields a
//! complete, semantically valid object. Writes validate first and persist as
//! one atomic batch per category — a rejected update leaves the prior
//! configuration untouched.

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::warn;

use crate::error::ClimateFinanceError;
use crate::types::{CreditRatingBand, RiskTier};
use crate::ClimateFinanceResult;

use super::defaults;
use super::keys;
use super::model::{
    CreditCutoffs, RiskConfig, RiskParameters, RiskThresholds, RiskWeights, ThresholdTriple,
};
use super::repository::ConfigRepository;

#[derive(Clone)]
pub struct RiskConfigStore {
    repo: Arc<dyn ConfigRepository>,
}

impl RiskConfigStore {
    pub fn new(repo: Arc<dyn ConfigRepository>) -> Self {
        Self { repo }
    }

    // -- Weights -------------------------------------------------------------

    pub fn get_risk_weights(&self) -> RiskWeights {
        let d = defaults::default_risk_weights();
        RiskWeights {
            credit_rating: self.decimal_or(keys::WEIGHT_CREDIT_RATING, d.credit_rating),
            financial_health: self.decimal_or(keys::WEIGHT_FINANCIAL_HEALTH, d.financial_health),
            production_variability: self
                .decimal_or(keys::WEIGHT_PRODUCTION_VARIABILITY, d.production_variability),
            market_conditions: self.decimal_or(keys::WEIGHT_MARKET_CONDITIONS, d.market_conditions),
            policy_impact: self.decimal_or(keys::WEIGHT_POLICY_IMPACT, d.policy_impact),
        }
    }

    pub fn update_risk_weights(&self, weights: &RiskWeights) -> ClimateFinanceResult<()> {
        weights.validate()?;
        self.repo.set_many(vec![
            kv(keys::WEIGHT_CREDIT_RATING, weights.credit_rating),
            kv(keys::WEIGHT_FINANCIAL_HEALTH, weights.financial_health),
            kv(
                keys::WEIGHT_PRODUCTION_VARIABILITY,
                weights.production_variability,
            ),
            kv(keys::WEIGHT_MARKET_CONDITIONS, weights.market_conditions),
            kv(keys::WEIGHT_POLICY_IMPACT, weights.policy_impact),
        ])
    }

    // -- Thresholds ----------------------------------------------------------

    pub fn get_risk_thresholds(&self) -> RiskThresholds {
        let d = defaults::default_risk_thresholds();
        RiskThresholds {
            production: ThresholdTriple {
                low: self.decimal_or(keys::THRESHOLD_PRODUCTION_LOW, d.production.low),
                medium: self.decimal_or(keys::THRESHOLD_PRODUCTION_MEDIUM, d.production.medium),
                high: self.decimal_or(keys::THRESHOLD_PRODUCTION_HIGH, d.production.high),
            },
            market_volatility: ThresholdTriple {
                low: self.decimal_or(keys::THRESHOLD_VOLATILITY_LOW, d.market_volatility.low),
                medium: self
                    .decimal_or(keys::THRESHOLD_VOLATILITY_MEDIUM, d.market_volatility.medium),
                high: self.decimal_or(keys::THRESHOLD_VOLATILITY_HIGH, d.market_volatility.high),
            },
            credit: CreditCutoffs {
                investment_grade: self
                    .decimal_or(keys::THRESHOLD_CREDIT_INVESTMENT_GRADE, d.credit.investment_grade),
                speculative_grade: self
                    .decimal_or(keys::THRESHOLD_CREDIT_SPECULATIVE_GRADE, d.credit.speculative_grade),
                high_risk: self.decimal_or(keys::THRESHOLD_CREDIT_HIGH_RISK, d.credit.high_risk),
            },
        }
    }

    pub fn update_risk_thresholds(&self, thresholds: &RiskThresholds) -> ClimateFinanceResult<()> {
        thresholds.validate()?;
        self.repo.set_many(vec![
            kv(keys::THRESHOLD_PRODUCTION_LOW, thresholds.production.low),
            kv(keys::THRESHOLD_PRODUCTION_MEDIUM, thresholds.production.medium),
            kv(keys::THRESHOLD_PRODUCTION_HIGH, thresholds.production.high),
            kv(keys::THRESHOLD_VOLATILITY_LOW, thresholds.market_volatility.low),
            kv(
                keys::THRESHOLD_VOLATILITY_MEDIUM,
                thresholds.market_volatility.medium,
            ),
            kv(keys::THRESHOLD_VOLATILITY_HIGH, thresholds.market_volatility.high),
            kv(
                keys::THRESHOLD_CREDIT_INVESTMENT_GRADE,
                thresholds.credit.investment_grade,
            ),
            kv(
                keys::THRESHOLD_CREDIT_SPECULATIVE_GRADE,
                thresholds.credit.speculative_grade,
            ),
            kv(keys::THRESHOLD_CREDIT_HIGH_RISK, thresholds.credit.high_risk),
        ])
    }

    // -- Parameters ----------------------------------------------------------

    pub fn get_risk_parameters(&self) -> RiskParameters {
        let d = defaults::default_risk_parameters();
        RiskParameters {
            base_discount_rate: self.decimal_or(keys::PARAM_BASE_DISCOUNT_RATE, d.base_discount_rate),
            max_discount_rate: self.decimal_or(keys::PARAM_MAX_DISCOUNT_RATE, d.max_discount_rate),
            min_discount_rate: self.decimal_or(keys::PARAM_MIN_DISCOUNT_RATE, d.min_discount_rate),
            confidence_base: self.decimal_or(keys::PARAM_CONFIDENCE_BASE, d.confidence_base),
            confidence_realtime_bonus: self
                .decimal_or(keys::PARAM_CONFIDENCE_REALTIME_BONUS, d.confidence_realtime_bonus),
        }
    }

    pub fn update_risk_parameters(&self, parameters: &RiskParameters) -> ClimateFinanceResult<()> {
        parameters.validate()?;
        self.repo.set_many(vec![
            kv(keys::PARAM_BASE_DISCOUNT_RATE, parameters.base_discount_rate),
            kv(keys::PARAM_MAX_DISCOUNT_RATE, parameters.max_discount_rate),
            kv(keys::PARAM_MIN_DISCOUNT_RATE, parameters.min_discount_rate),
            kv(keys::PARAM_CONFIDENCE_BASE, parameters.confidence_base),
            kv(
                keys::PARAM_CONFIDENCE_REALTIME_BONUS,
                parameters.confidence_realtime_bonus,
            ),
        ])
    }

    // -- Credit-rating matrix ------------------------------------------------

    /// The configured matrix, or the canonical 22-band default when no band
    /// has ever been written.
    pub fn get_credit_rating_matrix(&self) -> Vec<CreditRatingBand> {
        let entries = self.repo.get_prefixed(keys::CREDIT_RATING_PREFIX);
        if entries.is_empty() {
            return defaults::default_credit_matrix();
        }

        // Group the flat keys back into bands by their encoded label.
        let mut grouped: BTreeMap<String, BTreeMap<&'static str, String>> = BTreeMap::new();
        for (key, value) in entries {
            let rest = &key[keys::CREDIT_RATING_PREFIX.len()..];
            let field = [
                keys::RATING_FIELD_DEFAULT_RATE,
                keys::RATING_FIELD_SPREAD_BPS,
                keys::RATING_FIELD_INVESTMENT_GRADE,
                keys::RATING_FIELD_RISK_TIER,
            ]
            .into_iter()
            .find(|f| rest.ends_with(f) && rest.len() > f.len());
            let Some(field) = field else {
                warn!(%key, "unrecognised credit rating key, skipping");
                continue;
            };
            let enc = rest[..rest.len() - field.len()].trim_end_matches('_');
            grouped
                .entry(enc.to_string())
                .or_default()
                .insert(field, value);
        }

        grouped
            .into_iter()
            .map(|(enc, fields)| self.band_from_fields(&enc, &fields))
            .collect()
    }

    /// Bulk replace of the whole matrix as one atomic operation.
    pub fn update_credit_rating_matrix(
        &self,
        bands: &[CreditRatingBand],
    ) -> ClimateFinanceResult<()> {
        let mut seen = std::collections::BTreeSet::new();
        for band in bands {
            if band.rating.trim().is_empty() {
                return Err(ClimateFinanceError::validation(
                    "rating",
                    "Rating label must not be empty.",
                ));
            }
            if !seen.insert(keys::encode_rating_label(&band.rating)) {
                return Err(ClimateFinanceError::validation(
                    "rating",
                    format!("Duplicate rating label: {}.", band.rating),
                ));
            }
            if band.default_rate < Decimal::ZERO || band.spread_bps < Decimal::ZERO {
                return Err(ClimateFinanceError::validation(
                    "rating",
                    format!(
                        "Default rate and spread must be non-negative for {}.",
                        band.rating
                    ),
                ));
            }
        }

        let mut entries = Vec::with_capacity(bands.len() * 4);
        for band in bands {
            entries.push((
                keys::rating_key(&band.rating, keys::RATING_FIELD_DEFAULT_RATE),
                band.default_rate.to_string(),
            ));
            entries.push((
                keys::rating_key(&band.rating, keys::RATING_FIELD_SPREAD_BPS),
                band.spread_bps.to_string(),
            ));
            entries.push((
                keys::rating_key(&band.rating, keys::RATING_FIELD_INVESTMENT_GRADE),
                band.investment_grade.to_string(),
            ));
            entries.push((
                keys::rating_key(&band.rating, keys::RATING_FIELD_RISK_TIER),
                band.risk_tier.to_string(),
            ));
        }
        self.repo.replace_prefixed(keys::CREDIT_RATING_PREFIX, entries)
    }

    // -- Reset / snapshot ----------------------------------------------------

    /// Delete every key this subsystem owns and reseed all four categories.
    pub fn reset_to_defaults(&self) -> ClimateFinanceResult<()> {
        self.repo.remove_prefixed(keys::RISK_CONFIG_PREFIX)?;
        self.repo.remove_prefixed(keys::CREDIT_RATING_PREFIX)?;
        self.update_risk_weights(&defaults::default_risk_weights())?;
        self.update_risk_thresholds(&defaults::default_risk_thresholds())?;
        self.update_risk_parameters(&defaults::default_risk_parameters())?;
        self.update_credit_rating_matrix(&defaults::default_credit_matrix())
    }

    /// A complete snapshot for the risk engine.
    pub fn snapshot(&self) -> RiskConfig {
        RiskConfig {
            weights: self.get_risk_weights(),
            thresholds: self.get_risk_thresholds(),
            parameters: self.get_risk_parameters(),
            credit_matrix: self.get_credit_rating_matrix(),
        }
    }

    // -- Internal ------------------------------------------------------------

    fn decimal_or(&self, key: &str, default: Decimal) -> Decimal {
        match self.repo.get(key) {
            Some(raw) => match raw.parse::<Decimal>() {
                Ok(v) => v,
                Err(_) => {
                    warn!(key, %raw, "unparsable configuration value, using default");
                    default
                }
            },
            None => default,
        }
    }

    fn band_from_fields(
        &self,
        enc: &str,
        fields: &BTreeMap<&'static str, String>,
    ) -> CreditRatingBand {
        let label = keys::decode_rating_label(enc);

        // A band missing a field falls back to the canonical band of the
        // same label when one exists, else to neutral values.
        let canonical = defaults::default_credit_matrix()
            .into_iter()
            .find(|b| b.rating == label);

        let default_rate = fields
            .get(keys::RATING_FIELD_DEFAULT_RATE)
            .and_then(|v| v.parse().ok())
            .or(canonical.as_ref().map(|b| b.default_rate))
            .unwrap_or(Decimal::ZERO);
        let spread_bps = fields
            .get(keys::RATING_FIELD_SPREAD_BPS)
            .and_then(|v| v.parse().ok())
            .or(canonical.as_ref().map(|b| b.spread_bps))
            .unwrap_or(Decimal::ZERO);
        let investment_grade = fields
            .get(keys::RATING_FIELD_INVESTMENT_GRADE)
            .and_then(|v| v.parse().ok())
            .or(canonical.as_ref().map(|b| b.investment_grade))
            .unwrap_or(false);
        let risk_tier = fields
            .get(keys::RATING_FIELD_RISK_TIER)
            .and_then(|v| v.parse().ok())
            .or(canonical.as_ref().map(|b| b.risk_tier))
            .unwrap_or(RiskTier::Speculative);

        CreditRatingBand {
            rating: label,
            default_rate,
            spread_bps,
            investment_grade,
            risk_tier,
        }
    }
}

fn kv(key: &str, value: Decimal) -> (String, String) {
    (key.to_string(), value.to_string())
}
