use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::analytics::benchmark::annualize_return;
use crate::analytics::{population_std_dev, sqrt_decimal};
use crate::error::FeeSimError;
use crate::types::*;
use crate::FeeSimResult;

/// Input for single-series risk/return analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceInput {
    /// Monthly net returns (after fees), as decimal fractions
    pub net_returns: Vec<Rate>,
    /// Risk-free rate (annualized)
    pub risk_free_rate: Rate,
}

/// Risk-adjusted return metrics for one return series.
///
/// A ratio is `None` when its denominator is exactly zero: "no defined
/// value" is distinct from a value of zero and must not participate in
/// further arithmetic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub annualized_return: Rate,
    pub annualized_volatility: Rate,
    pub downside_deviation: Rate,
    pub sharpe_ratio: Option<Decimal>,
    pub sortino_ratio: Option<Decimal>,
}

/// Compute annualized return, volatility, Sharpe, and Sortino for a
/// series of monthly net returns.
pub fn calculate_performance(
    input: &PerformanceInput,
) -> FeeSimResult<ComputationOutput<PerformanceMetrics>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    if input.net_returns.is_empty() {
        return Err(FeeSimError::InsufficientData(
            "At least one net return observation is required".into(),
        ));
    }

    let annualized_return = annualize_return(&input.net_returns)?;

    // Population std-dev (divide by N) annualized over 12 months
    let annualized_volatility = population_std_dev(&input.net_returns) * sqrt_decimal(dec!(12));

    let sharpe_ratio = if annualized_volatility.is_zero() {
        None
    } else {
        Some((annualized_return - input.risk_free_rate) / annualized_volatility)
    };

    // Downside deviation over the negative months only, from the raw
    // squared returns rather than deviations from a target
    let downside: Vec<Decimal> = input
        .net_returns
        .iter()
        .copied()
        .filter(|r| *r < Decimal::ZERO)
        .collect();
    let downside_deviation = if downside.is_empty() {
        Decimal::ZERO
    } else {
        let mean_sq: Decimal = downside.iter().map(|r| r * r).sum::<Decimal>()
            / Decimal::from(downside.len() as i64);
        sqrt_decimal(mean_sq) * sqrt_decimal(dec!(12))
    };

    let sortino_ratio = if downside_deviation.is_zero() {
        None
    } else {
        Some((annualized_return - input.risk_free_rate) / downside_deviation)
    };

    let output = PerformanceMetrics {
        annualized_return,
        annualized_volatility,
        downside_deviation,
        sharpe_ratio,
        sortino_ratio,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Risk-Adjusted Returns (Annualized Return/Volatility, Sharpe, Sortino)",
        &serde_json::json!({
            "observations": input.net_returns.len(),
            "risk_free_rate": input.risk_free_rate.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Running product of `(1 + r)`, one value per period. Feeds
/// cumulative-net-return reporting; starts from the first period's
/// growth, not from 1.
pub fn cumulative_growth(returns: &[Rate]) -> Vec<Decimal> {
    let mut acc = Decimal::ONE;
    returns
        .iter()
        .map(|r| {
            acc *= Decimal::ONE + r;
            acc
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::MathematicalOps;
    use rust_decimal_macros::dec;

    fn input(returns: Vec<Decimal>, rf: Decimal) -> PerformanceInput {
        PerformanceInput {
            net_returns: returns,
            risk_free_rate: rf,
        }
    }

    #[test]
    fn test_basic_metrics() {
        let returns = vec![
            dec!(0.02),
            dec!(-0.01),
            dec!(0.03),
            dec!(0.01),
            dec!(-0.02),
            dec!(0.04),
        ];
        let out = calculate_performance(&input(returns, dec!(0.025)))
            .unwrap()
            .result;

        assert!(out.annualized_return > dec!(0.10));
        assert!(out.annualized_volatility > Decimal::ZERO);
        assert!(out.sharpe_ratio.is_some());
        assert!(out.sortino_ratio.is_some());
        assert!(out.downside_deviation > Decimal::ZERO);
    }

    #[test]
    fn test_constant_returns_have_undefined_sharpe() {
        // Zero volatility: Sharpe has no defined value, not a value of zero
        let out = calculate_performance(&input(vec![dec!(0.01); 6], dec!(0.025)))
            .unwrap()
            .result;
        assert_eq!(out.annualized_volatility, Decimal::ZERO);
        assert_eq!(out.sharpe_ratio, None);
    }

    #[test]
    fn test_all_positive_returns_have_undefined_sortino() {
        let out = calculate_performance(&input(
            vec![dec!(0.01), dec!(0.02), dec!(0.03)],
            dec!(0.0),
        ))
        .unwrap()
        .result;
        assert_eq!(out.downside_deviation, Decimal::ZERO);
        assert_eq!(out.sortino_ratio, None);
        assert!(out.sharpe_ratio.is_some());
    }

    #[test]
    fn test_downside_deviation_uses_raw_squared_returns() {
        // downside = {-0.02, -0.04}: dd = sqrt((0.0004+0.0016)/2) * sqrt(12)
        let returns = vec![dec!(0.05), dec!(-0.02), dec!(0.03), dec!(-0.04)];
        let out = calculate_performance(&input(returns, dec!(0.0)))
            .unwrap()
            .result;
        let expected = sqrt_decimal(dec!(0.001)) * sqrt_decimal(dec!(12));
        assert!((out.downside_deviation - expected).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_single_observation_allowed() {
        let out = calculate_performance(&input(vec![dec!(0.01)], dec!(0.0)))
            .unwrap()
            .result;
        // One month of 1% annualizes to 1.01^12 - 1
        let expected = dec!(1.01).powi(12) - Decimal::ONE;
        assert!((out.annualized_return - expected).abs() < dec!(0.0000001));
        assert_eq!(out.sharpe_ratio, None); // single point has zero spread
    }

    #[test]
    fn test_empty_series_rejected() {
        assert!(matches!(
            calculate_performance(&input(vec![], dec!(0.025))),
            Err(FeeSimError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_cumulative_growth() {
        let growth = cumulative_growth(&[dec!(0.10), dec!(-0.50), dec!(1.0)]);
        assert_eq!(growth, vec![dec!(1.10), dec!(0.55), dec!(1.10)]);
    }
}
