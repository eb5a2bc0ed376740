//! Key naming for the flat configuration table.
//!
//! Every persisted value lives under a fixed key per category. Credit-rating
//! bands expand into four keys each, derived from the rating label through an
//! explicit bidirectional encoding (lowercase; `+` → `_plus`; `-` → `_minus`).

// ---------------------------------------------------------------------------
// Weight keys
// ---------------------------------------------------------------------------

pub const WEIGHT_CREDIT_RATING: &str = "risk_weight_credit_rating";
pub const WEIGHT_FINANCIAL_HEALTH: &str = "risk_weight_financial_health";
pub const WEIGHT_PRODUCTION_VARIABILITY: &str = "risk_weight_production_variability";
pub const WEIGHT_MARKET_CONDITIONS: &str = "risk_weight_market_conditions";
pub const WEIGHT_POLICY_IMPACT: &str = "risk_weight_policy_impact";

// ---------------------------------------------------------------------------
// Threshold keys
// ---------------------------------------------------------------------------

pub const THRESHOLD_PRODUCTION_LOW: &str = "risk_threshold_production_low";
pub const THRESHOLD_PRODUCTION_MEDIUM: &str = "risk_threshold_production_medium";
pub const THRESHOLD_PRODUCTION_HIGH: &str = "risk_threshold_production_high";
pub const THRESHOLD_VOLATILITY_LOW: &str = "risk_threshold_volatility_low";
pub const THRESHOLD_VOLATILITY_MEDIUM: &str = "risk_threshold_volatility_medium";
pub const THRESHOLD_VOLATILITY_HIGH: &str = "risk_threshold_volatility_high";
pub const THRESHOLD_CREDIT_INVESTMENT_GRADE: &str = "risk_threshold_credit_investment_grade";
pub const THRESHOLD_CREDIT_SPECULATIVE_GRADE: &str = "risk_threshold_credit_speculative_grade";
pub const THRESHOLD_CREDIT_HIGH_RISK: &str = "risk_threshold_credit_high_risk";

// ---------------------------------------------------------------------------
// Parameter keys
// ---------------------------------------------------------------------------

pub const PARAM_BASE_DISCOUNT_RATE: &str = "risk_param_base_discount_rate";
pub const PARAM_MAX_DISCOUNT_RATE: &str = "risk_param_max_discount_rate";
pub const PARAM_MIN_DISCOUNT_RATE: &str = "risk_param_min_discount_rate";
pub const PARAM_CONFIDENCE_BASE: &str = "risk_param_confidence_base";
pub const PARAM_CONFIDENCE_REALTIME_BONUS: &str = "risk_param_confidence_realtime_bonus";

// ---------------------------------------------------------------------------
// Credit-rating keys
// ---------------------------------------------------------------------------

/// Prefix shared by every credit-rating key.
pub const CREDIT_RATING_PREFIX: &str = "credit_rating_";

/// Prefix shared by every key this subsystem owns. `reset_to_defaults`
/// removes everything under these two prefixes.
pub const RISK_CONFIG_PREFIX: &str = "risk_";

/// Field suffixes for the four persisted values per rating band.
pub const RATING_FIELD_DEFAULT_RATE: &str = "default_rate";
pub const RATING_FIELD_SPREAD_BPS: &str = "spread_bps";
pub const RATING_FIELD_INVESTMENT_GRADE: &str = "investment_grade";
pub const RATING_FIELD_RISK_TIER: &str = "risk_tier";

/// Encode a rating label into its storage-key fragment.
///
/// Lowercase; `+` becomes `_plus`, `-` becomes `_minus`. "BB+" → "bb_plus".
pub fn encode_rating_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len() + 6);
    for c in label.chars() {
        match c {
            '+' => out.push_str("_plus"),
            '-' => out.push_str("_minus"),
            c => out.extend(c.to_lowercase()),
        }
    }
    out
}

/// Decode a storage-key fragment back into the rating label.
///
/// Inverse of [`encode_rating_label`] for every label that contains at most
/// one trailing `+` or `-` (all agency-style labels do).
pub fn decode_rating_label(encoded: &str) -> String {
    let (stem, suffix) = if let Some(stem) = encoded.strip_suffix("_plus") {
        (stem, "+")
    } else if let Some(stem) = encoded.strip_suffix("_minus") {
        (stem, "-")
    } else {
        (encoded, "")
    };
    let mut out: String = stem.to_uppercase();
    out.push_str(suffix);
    out
}

/// Full storage key for one field of one rating band.
pub fn rating_key(label: &str, field: &str) -> String {
    format!("{CREDIT_RATING_PREFIX}{}_{field}", encode_rating_label(label))
}
