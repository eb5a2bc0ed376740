use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use climate_finance_core::config::{defaults, RiskConfig};
use climate_finance_core::risk::{assess_risk, RiskSignals};
use climate_finance_core::Receivable;

use crate::input;

/// Arguments for risk assessment
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AssessArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a configuration snapshot JSON file (defaults apply otherwise)
    #[arg(long)]
    pub config: Option<String>,

    /// Receivable face value
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Receivable due date (YYYY-MM-DD)
    #[arg(long)]
    pub due_date: Option<NaiveDate>,

    /// Payer credit rating label, e.g. BBB+
    #[arg(long)]
    pub rating: Option<String>,

    /// Payer financial-health risk score (0-100)
    #[arg(long)]
    pub financial_health: Option<Decimal>,

    /// Production variability estimate (0-100)
    #[arg(long)]
    pub production_variability: Option<Decimal>,

    /// Market volatility estimate (0-100)
    #[arg(long)]
    pub market_volatility: Option<Decimal>,

    /// Policy impact estimate (0-100)
    #[arg(long)]
    pub policy_impact: Option<Decimal>,
}

/// Full assessment payload accepted via --input / stdin.
#[derive(Debug, Serialize, Deserialize)]
pub struct AssessRequest {
    pub receivable: Receivable,
    #[serde(default)]
    pub signals: RiskSignals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<RiskConfig>,
}

pub fn run_assess(args: AssessArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: AssessRequest = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        AssessRequest {
            receivable: Receivable {
                id: Uuid::new_v4(),
                asset_id: Uuid::new_v4(),
                payer_id: Uuid::new_v4(),
                amount: args.amount.ok_or("--amount is required (or provide --input)")?,
                due_date: args
                    .due_date
                    .ok_or("--due-date is required (or provide --input)")?,
                risk_score: None,
                discount_rate: None,
            },
            signals: RiskSignals {
                credit_rating: args.rating,
                financial_health: args.financial_health,
                production_variability: args.production_variability,
                market_volatility: args.market_volatility,
                policy_impact: args.policy_impact,
            },
            config: None,
        }
    };

    let config = match request.config {
        Some(config) => config,
        None => match args.config {
            Some(ref path) => input::file::read_json(path)?,
            None => defaults::default_risk_config(),
        },
    };

    let output = assess_risk(&request.receivable, &config, &request.signals)?;
    Ok(serde_json::to_value(&output)?)
}
