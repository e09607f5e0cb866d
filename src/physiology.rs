//! Heart rate and threshold estimation
//!
//! Age-predicted max HR, heart-rate-reserve threshold HR, and the
//! athlete-level fraction of threshold effort.
//!
//! Multipliers are kept as `Decimal`; whole-number targets are rounded from
//! the `f64` product (`165 * 0.70` is 115.49999... and gives 115).

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{AthleteLevel, Gender};

/// Fraction used when no athlete level is known
pub const DEFAULT_THRESHOLD_FRACTION: Decimal = dec!(0.85);

/// Heart rate reserve fraction for the Karvonen threshold estimate
const HRR_THRESHOLD_FRACTION: f64 = 0.80;

/// Physiological estimation utilities
pub struct PhysiologyEstimator;

impl PhysiologyEstimator {
    /// Estimate max heart rate from age
    ///
    /// - Over 40: Tanaka, `208 - 0.7 * age` (gender independent)
    /// - Male: `211 - 0.64 * age`
    /// - Female: `206 - 0.88 * age`
    pub fn estimate_max_heart_rate(age: u32, gender: Gender, is_over_40: bool) -> f64 {
        let age = Decimal::from(age);
        let max_hr = if is_over_40 {
            dec!(208) - dec!(0.7) * age
        } else {
            match gender {
                Gender::Male => dec!(211) - dec!(0.64) * age,
                Gender::Female => dec!(206) - dec!(0.88) * age,
            }
        };
        max_hr.to_f64().unwrap_or_default()
    }

    /// Estimate threshold heart rate
    ///
    /// With a resting HR this is `resting + 0.80 * (max - resting)`, otherwise
    /// `max * fraction(level)`. Both are rounded half-up to whole bpm.
    pub fn estimate_threshold_heart_rate(
        max_hr: f64,
        resting_hr: Option<u16>,
        level: Option<AthleteLevel>,
    ) -> u16 {
        match resting_hr {
            Some(resting) => {
                let resting = f64::from(resting);
                round_half_up(resting + HRR_THRESHOLD_FRACTION * (max_hr - resting))
            }
            None => percentage_of(max_hr, Self::athlete_level_threshold_fraction(level)),
        }
    }

    /// Sustainable fraction of threshold by experience tier
    pub fn athlete_level_threshold_fraction(level: Option<AthleteLevel>) -> Decimal {
        match level {
            Some(AthleteLevel::Recreational) => dec!(0.80),
            Some(AthleteLevel::Intermediate) => dec!(0.85),
            Some(AthleteLevel::Competitive) => dec!(0.90),
            Some(AthleteLevel::Elite) => dec!(0.95),
            None => DEFAULT_THRESHOLD_FRACTION,
        }
    }
}

/// `value * fraction`, rounded half-up to a whole number
pub fn percentage_of(value: f64, fraction: Decimal) -> u16 {
    round_half_up(value * fraction.to_f64().unwrap_or_default())
}

/// `floor(value + 0.5)`, saturating into `u16` (NaN and negatives give 0)
pub fn round_half_up(value: f64) -> u16 {
    (value + 0.5).floor() as u16
}
