//! Chart-ready series: one label per bucket and one aligned numeric series
//! per source type, in bucket (chronological) order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Money;

use super::aggregation::CashFlowBucket;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub receivables: Vec<Money>,
    pub incentives: Vec<Money>,
    pub totals: Vec<Money>,
}

pub fn to_chart_series(buckets: &BTreeMap<String, CashFlowBucket>) -> ChartSeries {
    let mut series = ChartSeries {
        labels: Vec::with_capacity(buckets.len()),
        receivables: Vec::with_capacity(buckets.len()),
        incentives: Vec::with_capacity(buckets.len()),
        totals: Vec::with_capacity(buckets.len()),
    };
    for (label, bucket) in buckets {
        series.labels.push(label.clone());
        series.receivables.push(bucket.receivables);
        series.incentives.push(bucket.incentives);
        series.totals.push(bucket.total);
    }
    series
}
