use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FeeSimError;
use crate::types::Rate;
use crate::FeeSimResult;

/// A named fee schedule applied to a fund's monthly gross returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeSchemeConfig {
    /// Human-readable scheme name, e.g. "2-and-20"
    pub name: String,
    /// When true, performance fees accrue only on value above the
    /// historical peak AUM; otherwise the baseline resets each period.
    pub uses_high_water_mark: bool,
    /// Flat fee or tiered profit-sharing waterfall
    pub terms: FeeTerms,
}

/// Fee mechanics for a scheme.
///
/// Flat parameters exist only on the flat variant; a tiered scheme
/// carries no management fee, performance rate, or hurdle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeeTerms {
    /// Management fee plus a performance fee above an optional hurdle
    Flat {
        /// Annual management fee as a fraction of AUM (0.02 = 2%)
        mgmt_rate: Rate,
        /// Performance fee as a fraction of gain (0.20 = 20%)
        perf_rate: Rate,
        /// Annual hurdle rate; prorated to a monthly hurdle
        hurdle_rate: Rate,
    },
    /// Tiered waterfall: the manager's share varies across successive
    /// bands of gain, each band expressed as a fraction of starting AUM
    Tiered { tiers: Vec<WaterfallTier> },
}

/// One band of a tiered waterfall.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterfallTier {
    /// Upper bound of the band as a fraction-of-AUM gain;
    /// `None` marks the final, unbounded tier
    pub upper_threshold: Option<Rate>,
    /// Manager's share of gain falling inside this band, in [0, 1]
    pub manager_share: Rate,
}

impl FeeSchemeConfig {
    /// Validate the scheme eagerly, before any simulation step runs.
    ///
    /// Tiers must partition the non-negative gain axis: strictly
    /// increasing positive thresholds, exactly one unbounded final tier.
    pub fn validate(&self) -> FeeSimResult<()> {
        match &self.terms {
            FeeTerms::Flat {
                mgmt_rate,
                perf_rate,
                hurdle_rate,
            } => {
                if *mgmt_rate < Decimal::ZERO {
                    return Err(invalid("mgmt_rate", "Management rate cannot be negative"));
                }
                if *perf_rate < Decimal::ZERO || *perf_rate > Decimal::ONE {
                    return Err(invalid("perf_rate", "Performance rate must be between 0 and 1"));
                }
                if *hurdle_rate < Decimal::ZERO {
                    return Err(invalid("hurdle_rate", "Hurdle rate cannot be negative"));
                }
            }
            FeeTerms::Tiered { tiers } => {
                if tiers.is_empty() {
                    return Err(invalid("tiers", "At least one waterfall tier is required"));
                }
                let mut lower = Decimal::ZERO;
                let last = tiers.len() - 1;
                for (i, tier) in tiers.iter().enumerate() {
                    if tier.manager_share < Decimal::ZERO || tier.manager_share > Decimal::ONE {
                        return Err(invalid(
                            "manager_share",
                            &format!("Tier {} manager share must be between 0 and 1", i + 1),
                        ));
                    }
                    match tier.upper_threshold {
                        Some(threshold) if i == last => {
                            return Err(invalid(
                                "upper_threshold",
                                &format!(
                                    "Final tier must be unbounded, found threshold {threshold}"
                                ),
                            ));
                        }
                        Some(threshold) => {
                            if threshold <= lower {
                                return Err(invalid(
                                    "upper_threshold",
                                    &format!(
                                        "Tier {} threshold {} must exceed the previous bound {}",
                                        i + 1,
                                        threshold,
                                        lower
                                    ),
                                ));
                            }
                            lower = threshold;
                        }
                        None => {
                            if i != last {
                                return Err(invalid(
                                    "upper_threshold",
                                    &format!("Tier {} is not final and needs a threshold", i + 1),
                                ));
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub fn is_tiered(&self) -> bool {
        matches!(self.terms, FeeTerms::Tiered { .. })
    }
}

fn invalid(field: &str, reason: &str) -> FeeSimError {
    FeeSimError::InvalidConfiguration {
        field: field.into(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tiered(tiers: Vec<WaterfallTier>) -> FeeSchemeConfig {
        FeeSchemeConfig {
            name: "Waterfall".into(),
            uses_high_water_mark: false,
            terms: FeeTerms::Tiered { tiers },
        }
    }

    #[test]
    fn test_flat_scheme_valid() {
        let scheme = FeeSchemeConfig {
            name: "2-and-20".into(),
            uses_high_water_mark: true,
            terms: FeeTerms::Flat {
                mgmt_rate: dec!(0.02),
                perf_rate: dec!(0.20),
                hurdle_rate: dec!(0.0),
            },
        };
        assert!(scheme.validate().is_ok());
        assert!(!scheme.is_tiered());
    }

    #[test]
    fn test_flat_perf_rate_above_one_rejected() {
        let scheme = FeeSchemeConfig {
            name: "Greedy".into(),
            uses_high_water_mark: false,
            terms: FeeTerms::Flat {
                mgmt_rate: dec!(0.02),
                perf_rate: dec!(1.5),
                hurdle_rate: dec!(0.0),
            },
        };
        match scheme.validate().unwrap_err() {
            FeeSimError::InvalidConfiguration { field, .. } => assert_eq!(field, "perf_rate"),
            other => panic!("Expected InvalidConfiguration, got: {other:?}"),
        }
    }

    #[test]
    fn test_tiered_scheme_valid() {
        let scheme = tiered(vec![
            WaterfallTier {
                upper_threshold: Some(dec!(0.01)),
                manager_share: dec!(0.10),
            },
            WaterfallTier {
                upper_threshold: Some(dec!(0.02)),
                manager_share: dec!(0.25),
            },
            WaterfallTier {
                upper_threshold: None,
                manager_share: dec!(0.50),
            },
        ]);
        assert!(scheme.validate().is_ok());
        assert!(scheme.is_tiered());
    }

    #[test]
    fn test_empty_tiers_rejected() {
        assert!(tiered(vec![]).validate().is_err());
    }

    #[test]
    fn test_non_monotonic_thresholds_rejected() {
        let scheme = tiered(vec![
            WaterfallTier {
                upper_threshold: Some(dec!(0.02)),
                manager_share: dec!(0.10),
            },
            WaterfallTier {
                upper_threshold: Some(dec!(0.01)),
                manager_share: dec!(0.25),
            },
            WaterfallTier {
                upper_threshold: None,
                manager_share: dec!(0.50),
            },
        ]);
        assert!(scheme.validate().is_err());
    }

    #[test]
    fn test_interior_unbounded_tier_rejected() {
        let scheme = tiered(vec![
            WaterfallTier {
                upper_threshold: None,
                manager_share: dec!(0.10),
            },
            WaterfallTier {
                upper_threshold: None,
                manager_share: dec!(0.25),
            },
        ]);
        assert!(scheme.validate().is_err());
    }

    #[test]
    fn test_bounded_final_tier_rejected() {
        let scheme = tiered(vec![WaterfallTier {
            upper_threshold: Some(dec!(0.05)),
            manager_share: dec!(0.30),
        }]);
        match scheme.validate().unwrap_err() {
            FeeSimError::InvalidConfiguration { field, .. } => {
                assert_eq!(field, "upper_threshold");
            }
            other => panic!("Expected InvalidConfiguration, got: {other:?}"),
        }
    }

    #[test]
    fn test_manager_share_out_of_range_rejected() {
        let scheme = tiered(vec![WaterfallTier {
            upper_threshold: None,
            manager_share: dec!(1.2),
        }]);
        assert!(scheme.validate().is_err());
    }

    #[test]
    fn test_terms_serde_round_trip() {
        let scheme = tiered(vec![WaterfallTier {
            upper_threshold: None,
            manager_share: dec!(0.5),
        }]);
        let json = serde_json::to_string(&scheme).unwrap();
        assert!(json.contains("\"type\":\"tiered\""));
        let back: FeeSchemeConfig = serde_json::from_str(&json).unwrap();
        assert!(back.is_tiered());
    }
}
