use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::scheme::WaterfallTier;
use crate::types::{Money, Rate};

/// Full apportionment of a gain across waterfall tiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterfallBreakdown {
    /// Per-tier slices, in ascending tier order; tiers the gain never
    /// reaches are omitted
    pub slices: Vec<WaterfallSlice>,
    /// Total performance fee; always the sum of the slice fees
    pub fee: Money,
}

/// The portion of a gain falling inside a single tier band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterfallSlice {
    /// Lower bound of the band (fraction of starting AUM)
    pub lower: Rate,
    /// Upper bound of the band; `None` for the unbounded final tier
    pub upper: Option<Rate>,
    /// Gain captured by this band, in money terms
    pub gain_in_tier: Money,
    pub manager_share: Rate,
    /// Manager's take from this band
    pub fee: Money,
}

/// Apportion `gain_excess` into tiered manager-share slices.
///
/// The gain is converted to a proportion of `aum_start` and walked
/// through the tier bands in ascending order; each band takes its
/// `manager_share` of whatever gain falls inside it. The result is zero
/// at zero gain, monotonic non-decreasing in the gain, and continuous
/// across tier boundaries.
///
/// Assumes a validated tier list (see [`FeeSchemeConfig::validate`])
/// and a positive `aum_start`.
///
/// [`FeeSchemeConfig::validate`]: crate::scheme::FeeSchemeConfig::validate
pub fn calculate_waterfall(
    gain_excess: Money,
    aum_start: Money,
    tiers: &[WaterfallTier],
) -> WaterfallBreakdown {
    let mut breakdown = WaterfallBreakdown {
        slices: Vec::new(),
        fee: Decimal::ZERO,
    };
    if gain_excess <= Decimal::ZERO || aum_start.is_zero() {
        return breakdown;
    }

    let mut remaining = gain_excess / aum_start;
    let mut lower = Decimal::ZERO;

    for tier in tiers {
        let slice_width = match tier.upper_threshold {
            Some(upper) => (upper - lower).min(remaining),
            None => remaining,
        };
        if slice_width <= Decimal::ZERO {
            break;
        }

        let slice_fee = slice_width * tier.manager_share * aum_start;
        breakdown.slices.push(WaterfallSlice {
            lower,
            upper: tier.upper_threshold,
            gain_in_tier: slice_width * aum_start,
            manager_share: tier.manager_share,
            fee: slice_fee,
        });
        breakdown.fee += slice_fee;

        remaining -= slice_width;
        if let Some(upper) = tier.upper_threshold {
            lower = upper;
        }
    }

    breakdown
}
