use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use feesim_core::scheme::{FeeSchemeConfig, FeeTerms, WaterfallTier};
use feesim_core::simulation::calculate_waterfall;

use crate::input;

/// Arguments for a standalone waterfall apportionment
#[derive(Args)]
pub struct WaterfallArgs {
    /// Gain above the baseline, in money terms
    #[arg(long)]
    pub gain_excess: Decimal,

    /// Starting AUM the tier thresholds are proportional to
    #[arg(long)]
    pub aum_start: Decimal,

    /// Path to a JSON/YAML file with the ordered tier list
    #[arg(long)]
    pub tiers: String,
}

pub fn run_waterfall(args: WaterfallArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if args.gain_excess < Decimal::ZERO {
        return Err("--gain-excess cannot be negative".into());
    }
    if args.aum_start <= Decimal::ZERO {
        return Err("--aum-start must be positive".into());
    }

    let tiers: Vec<WaterfallTier> = input::file::read_config(&args.tiers)?;

    // Malformed tier lists get the same rejection the engine gives.
    FeeSchemeConfig {
        name: "waterfall".into(),
        uses_high_water_mark: false,
        terms: FeeTerms::Tiered {
            tiers: tiers.clone(),
        },
    }
    .validate()?;

    let breakdown = calculate_waterfall(args.gain_excess, args.aum_start, &tiers);
    Ok(serde_json::to_value(breakdown)?)
}
