use chrono::{NaiveDate, Utc};
use clap::Args;
use serde_json::Value;

use climate_finance_core::forecast::{
    aggregate, generate_forecast, to_chart_series, AggregationPeriod, ForecastInput,
};

use crate::input;

/// Arguments for forecast generation
#[derive(Args)]
pub struct ForecastArgs {
    /// Path to JSON input file with receivables and incentives
    #[arg(long)]
    pub input: Option<String>,

    /// Forecast start date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Forecast horizon in months (defaults to 12)
    #[arg(long)]
    pub horizon_months: Option<u32>,

    /// Aggregation period: day, week, month, or quarter
    #[arg(long, default_value = "month")]
    pub period: AggregationPeriodArg,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum AggregationPeriodArg {
    Day,
    Week,
    Month,
    Quarter,
}

impl From<AggregationPeriodArg> for AggregationPeriod {
    fn from(arg: AggregationPeriodArg) -> Self {
        match arg {
            AggregationPeriodArg::Day => AggregationPeriod::Day,
            AggregationPeriodArg::Week => AggregationPeriod::Week,
            AggregationPeriodArg::Month => AggregationPeriod::Month,
            AggregationPeriodArg::Quarter => AggregationPeriod::Quarter,
        }
    }
}

pub fn run_forecast(args: ForecastArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut forecast_input: ForecastInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input or piped JSON is required".into());
    };

    // CLI flags override whatever the payload carries.
    if args.start.is_some() {
        forecast_input.forecast_start = args.start;
    }
    if args.horizon_months.is_some() {
        forecast_input.horizon_months = args.horizon_months;
    }

    let today = Utc::now().date_naive();
    let output = generate_forecast(&forecast_input, today)?;

    let period: AggregationPeriod = args.period.into();
    let buckets = aggregate(&output.result.projections, period);
    let chart = to_chart_series(&buckets);

    let mut value = serde_json::to_value(&output)?;
    if let Some(result) = value.get_mut("result").and_then(Value::as_object_mut) {
        result.insert("aggregation".into(), serde_json::to_value(&buckets)?);
        result.insert("chart".into(), serde_json::to_value(&chart)?);
    }
    Ok(value)
}
