use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates and fractional returns expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// One month's gross return observation for a fund.
///
/// The simulation assumes one observation per accounting period with
/// strictly increasing dates; ordering is the caller's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnObservation {
    pub date: NaiveDate,
    /// Gross monthly return as a decimal fraction (0.015 = 1.5%)
    pub gross_return: Rate,
}

/// Result of one simulated accounting period. Immutable once emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodResult {
    pub date: NaiveDate,
    pub gross_return: Rate,
    /// Return after both fee streams are deducted
    pub net_return: Rate,
    pub mgmt_fee_revenue: Money,
    pub perf_fee_revenue: Money,
    pub aum_end: Money,
}

impl PeriodResult {
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// Fee revenue for one calendar year of simulated periods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnualAggregate {
    pub year: i32,
    pub mgmt_fee_revenue: Money,
    pub perf_fee_revenue: Money,
    /// Always the sum of the two fee streams
    pub total_fee_revenue: Money,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
