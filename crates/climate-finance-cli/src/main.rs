mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::config::ConfigValidateArgs;
use commands::forecast::ForecastArgs;
use commands::risk::AssessArgs;

/// Climate-receivables risk scoring and cash-flow forecasting
#[derive(Parser)]
#[command(
    name = "crf",
    version,
    about = "Risk-adjusted valuation and cash-flow forecasting for climate receivables",
    long_about = "A CLI for scoring climate receivables and forecasting probability-weighted \
                  cash flows with decimal precision. Supports composite risk scoring against \
                  a configurable weight/threshold/credit-matrix setup, forecast generation \
                  with period aggregation, and configuration validation."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one receivable from resolved risk signals
    Assess(AssessArgs),
    /// Generate a probability-weighted cash-flow forecast
    Forecast(ForecastArgs),
    /// Print the canonical default risk configuration
    ConfigDefaults,
    /// Validate a risk configuration snapshot
    ConfigValidate(ConfigValidateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Assess(args) => commands::risk::run_assess(args),
        Commands::Forecast(args) => commands::forecast::run_forecast(args),
        Commands::ConfigDefaults => commands::config::run_defaults(),
        Commands::ConfigValidate(args) => commands::config::run_validate(args),
        Commands::Version => {
            println!("crf {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
