pub mod benchmark;
pub mod performance;
pub mod revenue;

pub use benchmark::{
    annualize_return, compare_to_benchmark, yearly_returns, BenchmarkComparison,
    BenchmarkComparisonInput,
};
pub use performance::{calculate_performance, cumulative_growth, PerformanceInput, PerformanceMetrics};
pub use revenue::{revenue_stats, RevenueStats};

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

pub(crate) fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    values.iter().sum::<Decimal>() / Decimal::from(values.len() as i64)
}

/// Population standard deviation (divide by N, not N-1)
pub(crate) fn population_std_dev(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let avg = mean(values);
    let sum_sq: Decimal = values.iter().map(|v| (v - avg) * (v - avg)).sum();
    sqrt_decimal(sum_sq / Decimal::from(values.len() as i64))
}

pub(crate) fn sqrt_decimal(val: Decimal) -> Decimal {
    if val <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    val.sqrt().unwrap_or(Decimal::ZERO)
}
