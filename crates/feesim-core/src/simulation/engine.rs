use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::FeeSimError;
use crate::scheme::{FeeSchemeConfig, FeeTerms};
use crate::simulation::waterfall::calculate_waterfall;
use crate::types::*;
use crate::FeeSimResult;

/// Input for a single-scheme fee simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInput {
    /// Monthly gross returns, chronologically sorted (caller's guarantee)
    pub observations: Vec<ReturnObservation>,
    pub scheme: FeeSchemeConfig,
    /// Starting assets under management; must be positive
    pub initial_aum: Money,
}

/// Per-period trace plus annual fee aggregates for one scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub periods: Vec<PeriodResult>,
    /// One aggregate per calendar year present in the input, ordered by year
    pub annual: BTreeMap<i32, AnnualAggregate>,
}

/// Engine-internal simulation state, one instance per run.
///
/// The transition is the per-period fee recurrence; the emitted
/// `PeriodResult` sequence is the trace of transitions. The high-water
/// mark is non-decreasing whenever the scheme uses one.
struct SimulationState {
    aum: Money,
    high_water_mark: Money,
}

impl SimulationState {
    fn new(initial_aum: Money) -> Self {
        SimulationState {
            aum: initial_aum,
            high_water_mark: initial_aum,
        }
    }

    fn step(
        &mut self,
        obs: &ReturnObservation,
        scheme: &FeeSchemeConfig,
    ) -> FeeSimResult<PeriodResult> {
        let aum_start = self.aum;
        if aum_start.is_zero() {
            // Net return would need aum_end / 0; negative AUM continues,
            // exactly zero cannot.
            return Err(FeeSimError::DivisionByZero {
                context: format!("net return for period {}", obs.date),
            });
        }

        let mgmt_fee = match &scheme.terms {
            FeeTerms::Flat { mgmt_rate, .. } => *mgmt_rate / dec!(12) * aum_start,
            FeeTerms::Tiered { .. } => Decimal::ZERO,
        };

        let aum_after_gross = aum_start * (Decimal::ONE + obs.gross_return);

        let baseline = if scheme.uses_high_water_mark {
            self.high_water_mark
        } else {
            aum_start
        };
        let gain_excess = (aum_after_gross - baseline).max(Decimal::ZERO);

        let perf_fee = if gain_excess > Decimal::ZERO {
            match &scheme.terms {
                FeeTerms::Tiered { tiers } => {
                    calculate_waterfall(gain_excess, aum_start, tiers).fee
                }
                // Gated by the baseline excess test but computed from the
                // raw monthly return against the prorated hurdle.
                FeeTerms::Flat {
                    perf_rate,
                    hurdle_rate,
                    ..
                } => {
                    let monthly_hurdle = *hurdle_rate / dec!(12);
                    *perf_rate * (obs.gross_return - monthly_hurdle).max(Decimal::ZERO) * aum_start
                }
            }
        } else {
            Decimal::ZERO
        };

        let aum_end = aum_after_gross - mgmt_fee - perf_fee;
        if scheme.uses_high_water_mark {
            self.high_water_mark = self.high_water_mark.max(aum_end);
        }

        let net_return = aum_end / aum_start - Decimal::ONE;

        self.aum = aum_end;
        Ok(PeriodResult {
            date: obs.date,
            gross_return: obs.gross_return,
            net_return,
            mgmt_fee_revenue: mgmt_fee,
            perf_fee_revenue: perf_fee,
            aum_end,
        })
    }
}

/// Fold a return series and a fee scheme into per-period results and
/// annual fee aggregates.
///
/// Nothing bounds `aum_end` away from zero under large losses; the
/// recurrence continues with whatever sign the AUM has, and the first
/// non-positive period is surfaced as a warning in the envelope.
pub fn simulate_scheme(
    input: &SimulationInput,
) -> FeeSimResult<ComputationOutput<SimulationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.scheme.validate()?;
    if input.initial_aum <= Decimal::ZERO {
        return Err(FeeSimError::InvalidConfiguration {
            field: "initial_aum".into(),
            reason: "Initial AUM must be positive".into(),
        });
    }
    if input.observations.is_empty() {
        return Err(FeeSimError::InsufficientData(
            "At least one return observation is required".into(),
        ));
    }

    let mut state = SimulationState::new(input.initial_aum);
    let mut periods: Vec<PeriodResult> = Vec::with_capacity(input.observations.len());

    for obs in &input.observations {
        let period = state.step(obs, &input.scheme)?;
        if period.aum_end <= Decimal::ZERO && warnings.is_empty() {
            warnings.push(format!(
                "AUM went non-positive in period {}; the recurrence continues unclamped",
                period.date
            ));
        }
        periods.push(period);
    }

    let mut annual: BTreeMap<i32, AnnualAggregate> = BTreeMap::new();
    for period in &periods {
        let entry = annual.entry(period.year()).or_insert(AnnualAggregate {
            year: period.year(),
            mgmt_fee_revenue: Decimal::ZERO,
            perf_fee_revenue: Decimal::ZERO,
            total_fee_revenue: Decimal::ZERO,
        });
        entry.mgmt_fee_revenue += period.mgmt_fee_revenue;
        entry.perf_fee_revenue += period.perf_fee_revenue;
        entry.total_fee_revenue += period.mgmt_fee_revenue + period.perf_fee_revenue;
    }

    let output = SimulationOutput { periods, annual };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly Fee Schedule Simulation (AUM recurrence with high-water mark)",
        &serde_json::json!({
            "scheme": input.scheme.name,
            "tiered": input.scheme.is_tiered(),
            "uses_high_water_mark": input.scheme.uses_high_water_mark,
            "initial_aum": input.initial_aum.to_string(),
            "observations": input.observations.len(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::WaterfallTier;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn obs(year: i32, month: u32, gross: Decimal) -> ReturnObservation {
        ReturnObservation {
            date: NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
            gross_return: gross,
        }
    }

    fn flat_scheme(mgmt: Decimal, perf: Decimal, hurdle: Decimal, hwm: bool) -> FeeSchemeConfig {
        FeeSchemeConfig {
            name: "Flat".into(),
            uses_high_water_mark: hwm,
            terms: FeeTerms::Flat {
                mgmt_rate: mgmt,
                perf_rate: perf,
                hurdle_rate: hurdle,
            },
        }
    }

    fn tiered_scheme(hwm: bool) -> FeeSchemeConfig {
        FeeSchemeConfig {
            name: "Waterfall".into(),
            uses_high_water_mark: hwm,
            terms: FeeTerms::Tiered {
                tiers: vec![
                    WaterfallTier {
                        upper_threshold: Some(dec!(0.01)),
                        manager_share: dec!(0.10),
                    },
                    WaterfallTier {
                        upper_threshold: None,
                        manager_share: dec!(0.50),
                    },
                ],
            },
        }
    }

    #[test]
    fn test_flat_single_period_end_to_end() {
        // 1M AUM, 2-and-20 with HWM, one +5% month:
        // mgmt = 0.02/12 * 1M, perf = 0.20 * 0.05 * 1M = 10,000
        let input = SimulationInput {
            observations: vec![obs(2024, 1, dec!(0.05))],
            scheme: flat_scheme(dec!(0.02), dec!(0.20), dec!(0), true),
            initial_aum: dec!(1000000),
        };
        let out = simulate_scheme(&input).unwrap().result;
        let p = &out.periods[0];

        assert!((p.mgmt_fee_revenue - dec!(1666.67)).abs() < dec!(0.01));
        assert_eq!(p.perf_fee_revenue, dec!(10000));
        assert!((p.aum_end - dec!(1038333.33)).abs() < dec!(0.01));
        assert!((p.net_return - dec!(0.038333)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_mgmt_only_net_return() {
        // perf_rate = 0, single period: net = -mgmt/12 regardless of gross
        let input = SimulationInput {
            observations: vec![obs(2024, 1, dec!(0.0))],
            scheme: flat_scheme(dec!(0.03), dec!(0), dec!(0), false),
            initial_aum: dec!(500000),
        };
        let out = simulate_scheme(&input).unwrap().result;
        let expected = -dec!(0.03) / dec!(12);
        assert_eq!(out.periods[0].net_return, expected);
    }

    #[test]
    fn test_high_water_mark_non_decreasing() {
        let returns = [
            dec!(0.04),
            dec!(-0.08),
            dec!(0.03),
            dec!(0.02),
            dec!(-0.01),
            dec!(0.06),
        ];
        let input = SimulationInput {
            observations: returns
                .iter()
                .enumerate()
                .map(|(i, r)| obs(2024, i as u32 + 1, *r))
                .collect(),
            scheme: flat_scheme(dec!(0.02), dec!(0.20), dec!(0), true),
            initial_aum: dec!(1000000),
        };

        // Replay the fold by hand to observe the internal mark.
        let mut state = SimulationState::new(input.initial_aum);
        let mut prev_hwm = state.high_water_mark;
        for o in &input.observations {
            state.step(o, &input.scheme).unwrap();
            assert!(state.high_water_mark >= prev_hwm);
            prev_hwm = state.high_water_mark;
        }
    }

    #[test]
    fn test_hwm_suppresses_perf_fee_after_loss() {
        // -10% then +5%: with HWM the fund is still below its peak, so
        // the second month charges no performance fee.
        let input = SimulationInput {
            observations: vec![obs(2024, 1, dec!(-0.10)), obs(2024, 2, dec!(0.05))],
            scheme: flat_scheme(dec!(0), dec!(0.20), dec!(0), true),
            initial_aum: dec!(1000000),
        };
        let out = simulate_scheme(&input).unwrap().result;
        assert_eq!(out.periods[0].perf_fee_revenue, Decimal::ZERO);
        assert_eq!(out.periods[1].perf_fee_revenue, Decimal::ZERO);

        // Without HWM the baseline resets and the +5% month is charged.
        let input = SimulationInput {
            observations: vec![obs(2024, 1, dec!(-0.10)), obs(2024, 2, dec!(0.05))],
            scheme: flat_scheme(dec!(0), dec!(0.20), dec!(0), false),
            initial_aum: dec!(1000000),
        };
        let out = simulate_scheme(&input).unwrap().result;
        assert!(out.periods[1].perf_fee_revenue > Decimal::ZERO);
    }

    #[test]
    fn test_hurdle_gates_flat_perf_fee() {
        // 6% annual hurdle = 0.5% monthly; a +0.4% month has positive
        // gain_excess but earns nothing above the hurdle.
        let input = SimulationInput {
            observations: vec![obs(2024, 1, dec!(0.004))],
            scheme: flat_scheme(dec!(0), dec!(0.20), dec!(0.06), false),
            initial_aum: dec!(1000000),
        };
        let out = simulate_scheme(&input).unwrap().result;
        assert_eq!(out.periods[0].perf_fee_revenue, Decimal::ZERO);

        // A +1% month is charged only on the 0.5% above the hurdle.
        let input = SimulationInput {
            observations: vec![obs(2024, 1, dec!(0.01))],
            scheme: flat_scheme(dec!(0), dec!(0.20), dec!(0.06), false),
            initial_aum: dec!(1000000),
        };
        let out = simulate_scheme(&input).unwrap().result;
        assert_eq!(out.periods[0].perf_fee_revenue, dec!(0.20) * dec!(0.005) * dec!(1000000));
    }

    #[test]
    fn test_tiered_scheme_charges_no_mgmt_fee() {
        let input = SimulationInput {
            observations: vec![obs(2024, 1, dec!(0.03)), obs(2024, 2, dec!(0.01))],
            scheme: tiered_scheme(false),
            initial_aum: dec!(1000000),
        };
        let out = simulate_scheme(&input).unwrap().result;
        for p in &out.periods {
            assert_eq!(p.mgmt_fee_revenue, Decimal::ZERO);
        }
        assert!(out.periods[0].perf_fee_revenue > Decimal::ZERO);
    }

    #[test]
    fn test_tiered_perf_fee_matches_waterfall() {
        // +3% on 1M with no HWM: 1% band at 10% + 2% band at 50%
        let input = SimulationInput {
            observations: vec![obs(2024, 1, dec!(0.03))],
            scheme: tiered_scheme(false),
            initial_aum: dec!(1000000),
        };
        let out = simulate_scheme(&input).unwrap().result;
        let expected = dec!(0.01) * dec!(0.10) * dec!(1000000)
            + dec!(0.02) * dec!(0.50) * dec!(1000000);
        assert_eq!(out.periods[0].perf_fee_revenue, expected);
    }

    #[test]
    fn test_annual_aggregation_round_trip() {
        let observations: Vec<ReturnObservation> = (1..=12)
            .map(|m| obs(2023, m, dec!(0.01)))
            .chain((1..=6).map(|m| obs(2024, m, dec!(0.02))))
            .collect();
        let input = SimulationInput {
            observations,
            scheme: flat_scheme(dec!(0.02), dec!(0.20), dec!(0), true),
            initial_aum: dec!(1000000),
        };
        let out = simulate_scheme(&input).unwrap().result;
        assert_eq!(out.annual.len(), 2);

        for (year, agg) in &out.annual {
            let sum: Decimal = out
                .periods
                .iter()
                .filter(|p| p.year() == *year)
                .map(|p| p.mgmt_fee_revenue + p.perf_fee_revenue)
                .sum();
            assert_eq!(agg.total_fee_revenue, sum);
            assert_eq!(
                agg.total_fee_revenue,
                agg.mgmt_fee_revenue + agg.perf_fee_revenue
            );
        }
    }

    #[test]
    fn test_aum_continuity() {
        let input = SimulationInput {
            observations: (1..=12).map(|m| obs(2024, m, dec!(0.01))).collect(),
            scheme: flat_scheme(dec!(0.02), dec!(0.20), dec!(0), true),
            initial_aum: dec!(1000000),
        };
        let out = simulate_scheme(&input).unwrap().result;
        let mut prev = dec!(1000000);
        for p in &out.periods {
            // aum_end follows from the prior period's aum_end
            let implied = prev * (Decimal::ONE + p.net_return);
            assert!((p.aum_end - implied).abs() < dec!(0.0001));
            prev = p.aum_end;
        }
    }

    #[test]
    fn test_large_loss_warns_but_continues() {
        let input = SimulationInput {
            observations: vec![obs(2024, 1, dec!(-1.5)), obs(2024, 2, dec!(0.01))],
            scheme: flat_scheme(dec!(0), dec!(0), dec!(0), false),
            initial_aum: dec!(1000000),
        };
        let out = simulate_scheme(&input).unwrap();
        assert!(!out.warnings.is_empty());
        assert_eq!(out.result.periods.len(), 2);
        assert!(out.result.periods[1].aum_end < Decimal::ZERO);
    }

    #[test]
    fn test_non_positive_initial_aum_rejected() {
        let input = SimulationInput {
            observations: vec![obs(2024, 1, dec!(0.01))],
            scheme: flat_scheme(dec!(0.02), dec!(0.20), dec!(0), true),
            initial_aum: dec!(0),
        };
        match simulate_scheme(&input).unwrap_err() {
            FeeSimError::InvalidConfiguration { field, .. } => assert_eq!(field, "initial_aum"),
            other => panic!("Expected InvalidConfiguration, got: {other:?}"),
        }
    }

    #[test]
    fn test_empty_observations_rejected() {
        let input = SimulationInput {
            observations: vec![],
            scheme: flat_scheme(dec!(0.02), dec!(0.20), dec!(0), true),
            initial_aum: dec!(1000000),
        };
        assert!(matches!(
            simulate_scheme(&input),
            Err(FeeSimError::InsufficientData(_))
        ));
    }
}
