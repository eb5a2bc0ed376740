//! Cash-flow forecasting: projection, period aggregation, chart shaping.

pub mod aggregation;
pub mod chart;
pub mod projection;

pub use aggregation::{aggregate, bucket_key, week_of_month, AggregationPeriod, CashFlowBucket};
pub use chart::{to_chart_series, ChartSeries};
pub use projection::{generate_forecast, ForecastInput, ForecastOutput, DEFAULT_HORIZON_MONTHS};
