use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use feesim_core::analytics::{
    calculate_performance, compare_to_benchmark, yearly_returns, BenchmarkComparisonInput,
    PerformanceInput,
};

use crate::input;

/// Arguments for risk-adjusted return metrics
#[derive(Args)]
pub struct MetricsArgs {
    /// Path to a returns CSV with Date,GrossReturn columns
    #[arg(long)]
    pub input: Option<String>,

    /// Comma-separated monthly returns (e.g. "0.05,0.02,-0.01,0.03")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub returns: Option<Vec<Decimal>>,

    /// Risk-free rate (annualised)
    #[arg(long, default_value = "0.025")]
    pub risk_free_rate: Decimal,
}

/// Arguments for strategy-versus-benchmark comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to the strategy returns CSV (Date,GrossReturn)
    #[arg(long)]
    pub strategy: String,

    /// Path to the benchmark returns CSV (Date,Return); aligned to the
    /// strategy's dates by forward fill
    #[arg(long)]
    pub benchmark: String,
}

pub fn run_metrics(args: MetricsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let returns: Vec<Decimal> = if let Some(ref path) = args.input {
        input::file::read_returns_csv(path)?
            .iter()
            .map(|o| o.gross_return)
            .collect()
    } else if let Some(ref inline) = args.returns {
        inline.clone()
    } else if let Some(piped) = input::stdin::read_returns_stdin()? {
        piped
    } else {
        return Err("Provide --returns or --input file or pipe a JSON array via stdin".into());
    };

    let output = calculate_performance(&PerformanceInput {
        net_returns: returns,
        risk_free_rate: args.risk_free_rate,
    })?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let strategy = input::file::read_returns_csv(&args.strategy)?;
    let benchmark_series = input::file::read_benchmark_csv(&args.benchmark)?;

    let dates: Vec<NaiveDate> = strategy.iter().map(|o| o.date).collect();
    let strategy_returns: Vec<Decimal> = strategy.iter().map(|o| o.gross_return).collect();
    let aligned = input::align::align_to_dates(&benchmark_series, &dates);

    let comparison = compare_to_benchmark(&BenchmarkComparisonInput {
        strategy: strategy_returns.clone(),
        benchmark: aligned.clone(),
    })?;

    let yearly_strategy = yearly_returns(&dates, &strategy_returns)?;
    let yearly_benchmark = yearly_returns(&dates, &aligned)?;

    Ok(serde_json::json!({
        "comparison": comparison,
        "yearly_returns": {
            "strategy": yearly_strategy,
            "benchmark": yearly_benchmark,
        },
    }))
}
