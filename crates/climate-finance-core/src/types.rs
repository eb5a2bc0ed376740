use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Percentage points (4.5 = 4.5%). Discount rates are stored this way.
pub type Pct = Decimal;

/// Scores on the 0–100 scale.
pub type Score = Decimal;

/// A payment obligation owed against an energy asset's output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receivable {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub payer_id: Uuid,
    pub amount: Money,
    pub due_date: NaiveDate,
    /// Composite risk score in [0, 100], if one has been calculated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<Score>,
    /// Discount rate in percentage points, if one has been calculated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_rate: Option<Pct>,
}

/// Lifecycle status of an incentive claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncentiveStatus {
    Applied,
    Pending,
    Approved,
    Received,
    Rejected,
}

impl IncentiveStatus {
    /// Days until expected receipt when no explicit receipt date is set.
    /// Received and Rejected never contribute a lead time.
    pub fn receipt_lead_days(&self) -> i64 {
        match self {
            IncentiveStatus::Applied => 90,
            IncentiveStatus::Pending => 60,
            IncentiveStatus::Approved => 30,
            IncentiveStatus::Received | IncentiveStatus::Rejected => 0,
        }
    }

    /// Likelihood-weighted multiplier applied to the incentive amount.
    pub fn probability_factor(&self) -> Decimal {
        match self {
            IncentiveStatus::Applied => dec!(0.70),
            IncentiveStatus::Pending => dec!(0.80),
            IncentiveStatus::Approved => dec!(0.95),
            IncentiveStatus::Received => Decimal::ONE,
            IncentiveStatus::Rejected => Decimal::ZERO,
        }
    }
}

impl std::fmt::Display for IncentiveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncentiveStatus::Applied => write!(f, "Applied"),
            IncentiveStatus::Pending => write!(f, "Pending"),
            IncentiveStatus::Approved => write!(f, "Approved"),
            IncentiveStatus::Received => write!(f, "Received"),
            IncentiveStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

/// Kind of ancillary incentive attached to an asset or receivable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncentiveType {
    TaxCredit,
    Rec,
    Grant,
    Subsidy,
    Other(String),
}

/// A credit, offset, or subsidy expected against an asset's output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incentive {
    pub id: Uuid,
    pub incentive_type: IncentiveType,
    pub amount: Money,
    pub status: IncentiveStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_receipt_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receivable_id: Option<Uuid>,
}

/// Origin of a projected cash flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Receivable,
    Incentive,
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceType::Receivable => write!(f, "receivable"),
            SourceType::Incentive => write!(f, "incentive"),
        }
    }
}

/// A single dated, probability-weighted cash inflow. Ephemeral — computed on
/// demand, never persisted by the generator itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowProjection {
    pub projection_date: NaiveDate,
    pub projected_amount: Money,
    pub source_type: SourceType,
    pub entity_id: Uuid,
}

/// Categorical risk level derived from the composite score against the
/// configured credit cutoffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
            RiskLevel::Critical => write!(f, "Critical"),
        }
    }
}

/// Tier label assigned to a credit-rating band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    Prime,
    InvestmentGrade,
    Speculative,
    HighRisk,
    DefaultRisk,
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Prime => write!(f, "Prime"),
            RiskTier::InvestmentGrade => write!(f, "Investment Grade"),
            RiskTier::Speculative => write!(f, "Speculative"),
            RiskTier::HighRisk => write!(f, "High Risk"),
            RiskTier::DefaultRisk => write!(f, "Default Risk"),
        }
    }
}

impl std::str::FromStr for RiskTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Prime" => Ok(RiskTier::Prime),
            "Investment Grade" => Ok(RiskTier::InvestmentGrade),
            "Speculative" => Ok(RiskTier::Speculative),
            "High Risk" => Ok(RiskTier::HighRisk),
            "Default Risk" => Ok(RiskTier::DefaultRisk),
            other => Err(format!("Unknown risk tier: {other}")),
        }
    }
}

/// One band of the credit-rating matrix, keyed by its rating label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditRatingBand {
    /// Rating label, e.g. "AAA", "BB+", "D".
    pub rating: String,
    /// Annualised default rate as a decimal fraction (0.0002 = 2bp).
    pub default_rate: Rate,
    /// Credit spread over the risk-free curve, in basis points.
    pub spread_bps: Decimal,
    pub investment_grade: bool,
    pub risk_tier: RiskTier,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_lead_days() {
        assert_eq!(IncentiveStatus::Applied.receipt_lead_days(), 90);
        assert_eq!(IncentiveStatus::Pending.receipt_lead_days(), 60);
        assert_eq!(IncentiveStatus::Approved.receipt_lead_days(), 30);
        assert_eq!(IncentiveStatus::Received.receipt_lead_days(), 0);
        assert_eq!(IncentiveStatus::Rejected.receipt_lead_days(), 0);
    }

    #[test]
    fn test_status_probability_factors() {
        assert_eq!(IncentiveStatus::Applied.probability_factor(), dec!(0.70));
        assert_eq!(IncentiveStatus::Pending.probability_factor(), dec!(0.80));
        assert_eq!(IncentiveStatus::Approved.probability_factor(), dec!(0.95));
        assert_eq!(IncentiveStatus::Received.probability_factor(), Decimal::ONE);
        assert_eq!(IncentiveStatus::Rejected.probability_factor(), Decimal::ZERO);
    }

    #[test]
    fn test_risk_tier_display_roundtrip() {
        for tier in [
            RiskTier::Prime,
            RiskTier::InvestmentGrade,
            RiskTier::Speculative,
            RiskTier::HighRisk,
            RiskTier::DefaultRisk,
        ] {
            let parsed: RiskTier = tier.to_string().parse().unwrap();
            assert_eq!(parsed, tier);
        }
    }

    #[test]
    fn test_source_type_ordering_receivable_first() {
        assert!(SourceType::Receivable < SourceType::Incentive);
    }
}
