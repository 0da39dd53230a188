use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::analytics::sqrt_decimal;
use crate::error::FeeSimError;
use crate::types::{AnnualAggregate, Money};
use crate::FeeSimResult;

/// Dispersion of a scheme's annual fee take.
///
/// Standard deviation is the sample flavor (ddof = 1) and therefore
/// undefined below two years; the coefficient of variation additionally
/// requires a nonzero mean.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueStats {
    pub mean: Money,
    pub std_dev: Option<Decimal>,
    pub coeff_variation: Option<Decimal>,
    pub years: usize,
}

/// Summarize total fee revenue across the simulated years.
pub fn revenue_stats(annual: &BTreeMap<i32, AnnualAggregate>) -> FeeSimResult<RevenueStats> {
    if annual.is_empty() {
        return Err(FeeSimError::InsufficientData(
            "At least one simulated year is required".into(),
        ));
    }

    let totals: Vec<Decimal> = annual.values().map(|a| a.total_fee_revenue).collect();
    let n = totals.len();
    let mean = totals.iter().sum::<Decimal>() / Decimal::from(n as i64);

    let std_dev = if n < 2 {
        None
    } else {
        let sum_sq: Decimal = totals.iter().map(|t| (t - mean) * (t - mean)).sum();
        Some(sqrt_decimal(sum_sq / Decimal::from((n - 1) as i64)))
    };

    let coeff_variation = match std_dev {
        Some(sd) if !mean.is_zero() => Some(sd / mean),
        _ => None,
    };

    Ok(RevenueStats {
        mean,
        std_dev,
        coeff_variation,
        years: n,
    })
}
