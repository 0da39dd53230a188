use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::analytics::{population_std_dev, sqrt_decimal};
use crate::error::FeeSimError;
use crate::types::*;
use crate::FeeSimResult;

/// Input for strategy-versus-benchmark comparison.
///
/// Both series are monthly fractional returns, equal length and aligned
/// on the same dates; alignment is the ingestion layer's contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkComparisonInput {
    pub strategy: Vec<Rate>,
    pub benchmark: Vec<Rate>,
}

/// Relative performance metrics for one strategy/benchmark pair.
///
/// `None` means the ratio is undefined (zero denominator), never zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub annualized_strategy_return: Rate,
    pub annualized_benchmark_return: Rate,
    pub tracking_error: Rate,
    pub information_ratio: Option<Decimal>,
    pub beta: Option<Decimal>,
}

/// Compute tracking error, information ratio, and beta for a strategy
/// against its benchmark.
pub fn compare_to_benchmark(
    input: &BenchmarkComparisonInput,
) -> FeeSimResult<ComputationOutput<BenchmarkComparison>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    if input.strategy.len() != input.benchmark.len() {
        return Err(FeeSimError::InputMismatch {
            expected: input.strategy.len(),
            actual: input.benchmark.len(),
        });
    }
    if input.strategy.is_empty() {
        return Err(FeeSimError::InsufficientData(
            "At least one aligned observation pair is required".into(),
        ));
    }

    let ann_strategy = annualize_return(&input.strategy)?;
    let ann_benchmark = annualize_return(&input.benchmark)?;

    // Tracking error = annualized population std-dev of active returns
    let diffs: Vec<Decimal> = input
        .strategy
        .iter()
        .zip(input.benchmark.iter())
        .map(|(s, b)| s - b)
        .collect();
    let tracking_error = population_std_dev(&diffs) * sqrt_decimal(dec!(12));

    let information_ratio = if tracking_error.is_zero() {
        None
    } else {
        Some((ann_strategy - ann_benchmark) / tracking_error)
    };

    let beta = sample_beta(&input.strategy, &input.benchmark);

    let output = BenchmarkComparison {
        annualized_strategy_return: ann_strategy,
        annualized_benchmark_return: ann_benchmark,
        tracking_error,
        information_ratio,
        beta,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Benchmark Comparison (Tracking Error, Information Ratio, Beta)",
        &serde_json::json!({
            "observations": input.strategy.len(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Annualize a series of N monthly returns: `(Π(1+r))^(12/N) - 1`.
///
/// Usable standalone on any fraction series, fund or benchmark.
pub fn annualize_return(returns: &[Rate]) -> FeeSimResult<Rate> {
    if returns.is_empty() {
        return Err(FeeSimError::InsufficientData(
            "Cannot annualize an empty return series".into(),
        ));
    }

    let growth: Decimal = returns
        .iter()
        .fold(Decimal::ONE, |acc, r| acc * (Decimal::ONE + r));
    if growth <= Decimal::ZERO {
        return Err(FeeSimError::FinancialImpossibility(format!(
            "Cumulative growth {growth} is non-positive; annualized return is undefined"
        )));
    }

    let exponent = dec!(12) / Decimal::from(returns.len() as i64);
    let annualized = growth.checked_powd(exponent).ok_or_else(|| {
        FeeSimError::FinancialImpossibility(format!(
            "Cannot raise cumulative growth {growth} to the power {exponent}"
        ))
    })?;
    Ok(annualized - Decimal::ONE)
}

/// Compound monthly returns into one value per calendar year:
/// `Π(1+r) - 1` within each year, ordered by year.
pub fn yearly_returns(
    dates: &[NaiveDate],
    returns: &[Rate],
) -> FeeSimResult<BTreeMap<i32, Rate>> {
    if dates.len() != returns.len() {
        return Err(FeeSimError::InputMismatch {
            expected: dates.len(),
            actual: returns.len(),
        });
    }

    let mut growth_by_year: BTreeMap<i32, Decimal> = BTreeMap::new();
    for (date, ret) in dates.iter().zip(returns.iter()) {
        let entry = growth_by_year.entry(date.year()).or_insert(Decimal::ONE);
        *entry *= Decimal::ONE + ret;
    }

    Ok(growth_by_year
        .into_iter()
        .map(|(year, growth)| (year, growth - Decimal::ONE))
        .collect())
}

/// Beta = Cov(strategy, benchmark) / Var(benchmark), both with ddof = 1.
/// Undefined below two observations or with a flat benchmark.
fn sample_beta(strategy: &[Decimal], benchmark: &[Decimal]) -> Option<Decimal> {
    let n = strategy.len();
    if n < 2 {
        return None;
    }
    let n_minus_1 = Decimal::from((n - 1) as i64);
    let s_mean = crate::analytics::mean(strategy);
    let b_mean = crate::analytics::mean(benchmark);

    let cov: Decimal = strategy
        .iter()
        .zip(benchmark.iter())
        .map(|(s, b)| (s - s_mean) * (b - b_mean))
        .sum::<Decimal>()
        / n_minus_1;
    let var: Decimal = benchmark
        .iter()
        .map(|b| (b - b_mean) * (b - b_mean))
        .sum::<Decimal>()
        / n_minus_1;

    if var.is_zero() {
        None
    } else {
        Some(cov / var)
    }
}
