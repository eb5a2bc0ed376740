//! Period bucketing of cash-flow projections.
//!
//! Buckets keep separate receivable and incentive subtotals plus the
//! combined total, keyed by strings that sort chronologically, so a
//! `BTreeMap` walk is already in display order.
//!
//! Week bucketing is the month-relative approximation
//! `ceil((day_of_month + weekday_offset_of_month_start) / 7)` with the
//! offset counted in days from Sunday. It is deliberately NOT ISO-8601:
//! downstream consumers depend on these bucket boundaries.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::{CashFlowProjection, Money, SourceType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationPeriod {
    Day,
    Week,
    Month,
    Quarter,
}

impl std::str::FromStr for AggregationPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(AggregationPeriod::Day),
            "week" => Ok(AggregationPeriod::Week),
            "month" => Ok(AggregationPeriod::Month),
            "quarter" => Ok(AggregationPeriod::Quarter),
            other => Err(format!("Unknown aggregation period: {other}")),
        }
    }
}

/// Subtotals for one bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlowBucket {
    pub receivables: Money,
    pub incentives: Money,
    pub total: Money,
}

/// Week of month for the approximation documented above. 1-based.
pub fn week_of_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).expect("day 1 always exists");
    let offset = first.weekday().num_days_from_sunday();
    (date.day() + offset).div_ceil(7)
}

/// The bucket key a date falls into for the given period.
pub fn bucket_key(date: NaiveDate, period: AggregationPeriod) -> String {
    match period {
        AggregationPeriod::Day => date.format("%Y-%m-%d").to_string(),
        AggregationPeriod::Week => {
            format!("{:04}-{:02}-W{}", date.year(), date.month(), week_of_month(date))
        }
        AggregationPeriod::Month => date.format("%Y-%m").to_string(),
        AggregationPeriod::Quarter => {
            format!("{:04}-Q{}", date.year(), (date.month() - 1) / 3 + 1)
        }
    }
}

/// Accumulate projections into period buckets.
pub fn aggregate(
    projections: &[CashFlowProjection],
    period: AggregationPeriod,
) -> BTreeMap<String, CashFlowBucket> {
    let mut buckets: BTreeMap<String, CashFlowBucket> = BTreeMap::new();
    for projection in projections {
        let bucket = buckets
            .entry(bucket_key(projection.projection_date, period))
            .or_default();
        match projection.source_type {
            SourceType::Receivable => bucket.receivables += projection.projected_amount,
            SourceType::Incentive => bucket.incentives += projection.projected_amount,
        }
        bucket.total += projection.projected_amount;
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn projection(d: NaiveDate, amount: Decimal, source_type: SourceType) -> CashFlowProjection {
        CashFlowProjection {
            projection_date: d,
            projected_amount: amount,
            source_type,
            entity_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_week_of_month_sunday_start() {
        // 2026-02-01 is a Sunday: offset 0, so days 1-7 are week 1.
        assert_eq!(week_of_month(date(2026, 2, 1)), 1);
        assert_eq!(week_of_month(date(2026, 2, 7)), 1);
        assert_eq!(week_of_month(date(2026, 2, 8)), 2);
        assert_eq!(week_of_month(date(2026, 2, 28)), 4);
    }

    #[test]
    fn test_week_of_month_midweek_start() {
        // 2026-01-01 is a Thursday: offset 4, so Jan 1-3 land in week 1
        // and Jan 4 (Sunday) starts week 2. Not ISO-8601, by contract.
        assert_eq!(week_of_month(date(2026, 1, 1)), 1);
        assert_eq!(week_of_month(date(2026, 1, 3)), 1);
        assert_eq!(week_of_month(date(2026, 1, 4)), 2);
        assert_eq!(week_of_month(date(2026, 1, 31)), 5);
    }

    #[test]
    fn test_bucket_keys_per_period() {
        let d = date(2026, 8, 6);
        assert_eq!(bucket_key(d, AggregationPeriod::Day), "2026-08-06");
        assert_eq!(bucket_key(d, AggregationPeriod::Week), "2026-08-W2");
        assert_eq!(bucket_key(d, AggregationPeriod::Month), "2026-08");
        assert_eq!(bucket_key(d, AggregationPeriod::Quarter), "2026-Q3");
    }

    #[test]
    fn test_aggregate_separates_source_subtotals() {
        let projections = vec![
            projection(date(2026, 3, 10), dec!(1_000), SourceType::Receivable),
            projection(date(2026, 3, 20), dec!(500), SourceType::Incentive),
            projection(date(2026, 4, 1), dec!(2_000), SourceType::Receivable),
        ];
        let buckets = aggregate(&projections, AggregationPeriod::Month);
        assert_eq!(buckets.len(), 2);
        let march = &buckets["2026-03"];
        assert_eq!(march.receivables, dec!(1_000));
        assert_eq!(march.incentives, dec!(500));
        assert_eq!(march.total, dec!(1_500));
        let april = &buckets["2026-04"];
        assert_eq!(april.receivables, dec!(2_000));
        assert_eq!(april.incentives, Decimal::ZERO);
    }

    #[test]
    fn test_empty_projections_give_empty_map() {
        assert!(aggregate(&[], AggregationPeriod::Day).is_empty());
    }

    #[test]
    fn test_bucket_keys_sort_chronologically() {
        let projections = vec![
            projection(date(2026, 12, 31), dec!(1), SourceType::Receivable),
            projection(date(2026, 1, 1), dec!(1), SourceType::Receivable),
            projection(date(2027, 1, 1), dec!(1), SourceType::Receivable),
        ];
        for period in [
            AggregationPeriod::Day,
            AggregationPeriod::Week,
            AggregationPeriod::Month,
            AggregationPeriod::Quarter,
        ] {
            let keys: Vec<String> = aggregate(&projections, period).into_keys().collect();
            let mut sorted = keys.clone();
            sorted.sort();
            assert_eq!(keys, sorted);
        }
    }

    #[test]
    fn test_period_parse() {
        assert_eq!("Week".parse::<AggregationPeriod>(), Ok(AggregationPeriod::Week));
        assert!("fortnight".parse::<AggregationPeriod>().is_err());
    }
}
