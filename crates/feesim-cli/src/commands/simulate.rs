use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use feesim_core::analytics::{
    calculate_performance, compare_to_benchmark, revenue_stats, yearly_returns,
    BenchmarkComparisonInput, PerformanceInput,
};
use feesim_core::scheme::FeeSchemeConfig;
use feesim_core::simulation::{simulate_scheme, SimulationInput};
use feesim_core::ReturnObservation;

use crate::input;

/// Arguments for a full fee-scheme simulation run
#[derive(Args)]
pub struct SimulateArgs {
    /// Path to a fund returns CSV with Date,GrossReturn columns
    #[arg(long)]
    pub returns: String,

    /// Path to a JSON/YAML file with a list of fee scheme configurations
    #[arg(long)]
    pub schemes: String,

    /// Initial AUM; thousands separators accepted (e.g. "30,000,000.00")
    #[arg(long, default_value = "30,000,000")]
    pub initial_aum: String,

    /// Risk-free rate (annualised)
    #[arg(long, default_value = "0.025")]
    pub risk_free_rate: Decimal,

    /// Optional benchmark CSV with Date,Return columns, aligned to the
    /// fund's dates by forward fill (zero fill before the first value)
    #[arg(long)]
    pub benchmark: Option<String>,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let observations = input::file::read_returns_csv(&args.returns)?;
    let schemes: Vec<FeeSchemeConfig> = input::file::read_config(&args.schemes)?;
    if schemes.is_empty() {
        return Err("The schemes file contains no fee schemes".into());
    }
    let initial_aum = input::file::parse_aum(&args.initial_aum)?;

    let dates: Vec<NaiveDate> = observations.iter().map(|o| o.date).collect();
    let benchmark_returns: Option<Vec<Decimal>> = match &args.benchmark {
        Some(path) => {
            let series = input::file::read_benchmark_csv(path)?;
            Some(input::align::align_to_dates(&series, &dates))
        }
        None => None,
    };

    // Each scheme is evaluated independently; a failing scheme is
    // reported in place without aborting the rest of the run.
    let mut reports: Vec<Value> = Vec::new();
    for scheme in schemes {
        let name = scheme.name.clone();
        match evaluate_scheme(
            scheme,
            &observations,
            &dates,
            initial_aum,
            args.risk_free_rate,
            benchmark_returns.as_deref(),
        ) {
            Ok(report) => reports.push(report),
            Err(e) => reports.push(serde_json::json!({
                "scheme": name,
                "error": e.to_string(),
            })),
        }
    }

    let benchmark_section = match &benchmark_returns {
        Some(returns) => {
            let yearly = yearly_returns(&dates, returns)?;
            serde_json::json!({
                "aligned_returns": returns,
                "yearly_returns": yearly,
            })
        }
        None => Value::Null,
    };

    Ok(serde_json::json!({
        "initial_aum": initial_aum.to_string(),
        "risk_free_rate": args.risk_free_rate.to_string(),
        "schemes": reports,
        "benchmark": benchmark_section,
    }))
}

fn evaluate_scheme(
    scheme: FeeSchemeConfig,
    observations: &[ReturnObservation],
    dates: &[NaiveDate],
    initial_aum: Decimal,
    risk_free_rate: Decimal,
    benchmark: Option<&[Decimal]>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let name = scheme.name.clone();
    let simulation = simulate_scheme(&SimulationInput {
        observations: observations.to_vec(),
        scheme,
        initial_aum,
    })?;

    let net_returns: Vec<Decimal> = simulation
        .result
        .periods
        .iter()
        .map(|p| p.net_return)
        .collect();

    let performance = calculate_performance(&PerformanceInput {
        net_returns: net_returns.clone(),
        risk_free_rate,
    })?;

    let stats = revenue_stats(&simulation.result.annual)?;
    let yearly_net = yearly_returns(dates, &net_returns)?;

    let comparison = match benchmark {
        Some(bench) => Some(compare_to_benchmark(&BenchmarkComparisonInput {
            strategy: net_returns,
            benchmark: bench.to_vec(),
        })?),
        None => None,
    };

    Ok(serde_json::json!({
        "scheme": name,
        "simulation": simulation,
        "performance": performance,
        "revenue_stats": stats,
        "yearly_net_returns": yearly_net,
        "benchmark_comparison": comparison,
    }))
}
