//! Cash-flow forecast generation.
//!
//! Stateless and idempotent: the generator holds nothing between calls, and
//! identical inputs (including the evaluation date) produce byte-identical,
//! totally ordered output. The evaluation date is an explicit parameter —
//! only callers bind it to the wall clock.

use std::time::Instant;

use chrono::{Duration, Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ClimateFinanceError;
use crate::types::{
    with_metadata, CashFlowProjection, ComputationOutput, Incentive, IncentiveStatus, Money,
    Receivable, SourceType,
};
use crate::ClimateFinanceResult;

/// Default forecast horizon when none is given.
pub const DEFAULT_HORIZON_MONTHS: u32 = 12;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastInput {
    pub receivables: Vec<Receivable>,
    pub incentives: Vec<Incentive>,
    /// Defaults to the evaluation date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_start: Option<NaiveDate>,
    /// Defaults to [`DEFAULT_HORIZON_MONTHS`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizon_months: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastOutput {
    pub forecast_start: NaiveDate,
    /// Last date inside the window, inclusive.
    pub forecast_end: NaiveDate,
    pub horizon_months: u32,
    /// Sorted ascending by (date, source type, entity id).
    pub projections: Vec<CashFlowProjection>,
    pub receivables_total: Money,
    pub incentives_total: Money,
    pub combined_total: Money,
}

/// Project probability-weighted cash inflows over the horizon window.
///
/// `today` is the evaluation date: it supplies the default forecast start
/// and anchors status-derived incentive receipt dates.
pub fn generate_forecast(
    input: &ForecastInput,
    today: NaiveDate,
) -> ClimateFinanceResult<ComputationOutput<ForecastOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let forecast_start = input.forecast_start.unwrap_or(today);
    let horizon_months = input.horizon_months.unwrap_or(DEFAULT_HORIZON_MONTHS);
    let forecast_end = forecast_start
        .checked_add_months(Months::new(horizon_months))
        .ok_or_else(|| {
            ClimateFinanceError::validation(
                "horizon_months",
                format!("Horizon of {horizon_months} months overflows the date range."),
            )
        })?;

    let mut projections: Vec<CashFlowProjection> = Vec::new();

    // -- Receivables: risk-adjusted face value --------------------------------
    for receivable in &input.receivables {
        if receivable.due_date < forecast_start || receivable.due_date > forecast_end {
            continue;
        }
        if receivable.amount < Decimal::ZERO {
            warnings.push(format!(
                "Receivable {} has a negative amount; projecting as-is.",
                receivable.id
            ));
        }
        let projected_amount = match receivable.risk_score {
            Some(score) => {
                (receivable.amount * (Decimal::ONE - score / dec!(100))).max(Decimal::ZERO)
            }
            // No score yet: full face value.
            None => receivable.amount,
        };
        projections.push(CashFlowProjection {
            projection_date: receivable.due_date,
            projected_amount,
            source_type: SourceType::Receivable,
            entity_id: receivable.id,
        });
    }

    // -- Incentives: probability-weighted by status ---------------------------
    for incentive in &input.incentives {
        if incentive.status == IncentiveStatus::Rejected {
            continue;
        }
        let effective_date = incentive
            .expected_receipt_date
            .unwrap_or_else(|| today + Duration::days(incentive.status.receipt_lead_days()));
        if effective_date < forecast_start || effective_date > forecast_end {
            continue;
        }
        projections.push(CashFlowProjection {
            projection_date: effective_date,
            projected_amount: incentive.amount * incentive.status.probability_factor(),
            source_type: SourceType::Incentive,
            entity_id: incentive.id,
        });
    }

    // Total order: date, then source type, then entity id. Keeps repeated
    // runs byte-identical even when dates collide.
    projections.sort_by(|a, b| {
        a.projection_date
            .cmp(&b.projection_date)
            .then(a.source_type.cmp(&b.source_type))
            .then(a.entity_id.cmp(&b.entity_id))
    });

    let receivables_total: Money = projections
        .iter()
        .filter(|p| p.source_type == SourceType::Receivable)
        .map(|p| p.projected_amount)
        .sum();
    let incentives_total: Money = projections
        .iter()
        .filter(|p| p.source_type == SourceType::Incentive)
        .map(|p| p.projected_amount)
        .sum();

    let output = ForecastOutput {
        forecast_start,
        forecast_end,
        horizon_months,
        combined_total: receivables_total + incentives_total,
        receivables_total,
        incentives_total,
        projections,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "window": "inclusive of both the start and the horizon boundary",
        "unscored_receivables": "projected at full face value",
        "incentive_lead_days": { "Applied": 90, "Pending": 60, "Approved": 30 },
        "incentive_probability": { "Applied": "0.70", "Pending": "0.80", "Approved": "0.95", "Received": "1.00" },
    });

    Ok(with_metadata(
        "Probability-weighted cash-flow projection",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}
