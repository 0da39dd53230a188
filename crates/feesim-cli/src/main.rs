mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::analytics::{CompareArgs, MetricsArgs};
use commands::simulate::SimulateArgs;
use commands::waterfall::WaterfallArgs;

/// Hedge-fund fee schedule simulation and performance analytics
#[derive(Parser)]
#[command(
    name = "feesim",
    version,
    about = "Hedge-fund fee schedule simulation and performance analytics",
    long_about = "Simulates month-by-month AUM evolution under flat or tiered \
                  fee schedules (with optional hurdle and high-water mark) and \
                  compares net returns against a benchmark via Sharpe, Sortino, \
                  tracking error, information ratio, and beta."
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
    /// Simulate one or more fee schemes over a monthly return series
    Simulate(SimulateArgs),
    /// Risk-adjusted return metrics for a net return series
    Metrics(MetricsArgs),
    /// Compare a strategy series against a benchmark series
    Compare(CompareArgs),
    /// Apportion a gain through a tiered waterfall
    Waterfall(WaterfallArgs),
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
        Commands::Simulate(args) => commands::simulate::run_simulate(args),
        Commands::Metrics(args) => commands::analytics::run_metrics(args),
        Commands::Compare(args) => commands::analytics::run_compare(args),
        Commands::Waterfall(args) => commands::waterfall::run_waterfall(args),
        Commands::Version => {
            println!("feesim {}", env!("CARGO_PKG_VERSION"));
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
