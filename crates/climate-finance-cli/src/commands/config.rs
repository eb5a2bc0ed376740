use clap::Args;
use serde_json::Value;

use climate_finance_core::config::{defaults, RiskConfig};

use crate::input;

/// Arguments for configuration validation
#[derive(Args)]
pub struct ConfigValidateArgs {
    /// Path to a configuration snapshot JSON file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_defaults() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(defaults::default_risk_config())?)
}

pub fn run_validate(args: ConfigValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config: RiskConfig = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input or piped JSON is required".into());
    };

    // Validation failure is the command's error path: the violated
    // invariant surfaces on stderr with a non-zero exit.
    config.validate()?;

    Ok(serde_json::json!({
        "valid": true,
        "bands": config.credit_matrix.len(),
    }))
}
