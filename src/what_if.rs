//! What-if finish time recalculation
//!
//! Re-totals a triathlon fitness plan with any subset of its swim pace,
//! transitions, bike speed or run pace replaced by athlete-chosen values.

use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::conversion::{seconds_to_time, YARDS_PER_MILE};
use crate::models::{FitnessSegments, PacingPlan};

/// Athlete-chosen replacements for plan values
///
/// `None`, zero, negative or NaN values keep the plan's value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WhatIfOverrides {
    /// Seconds per 100 yd
    pub swim_pace_seconds: Option<f64>,
    pub t1_seconds: Option<f64>,
    pub bike_speed_mph: Option<f64>,
    pub t2_seconds: Option<f64>,
    /// Seconds per mile
    pub run_pace_seconds: Option<f64>,
}

impl WhatIfOverrides {
    /// True when no field would replace a plan value
    pub fn is_empty(&self) -> bool {
        [
            self.swim_pace_seconds,
            self.t1_seconds,
            self.bike_speed_mph,
            self.t2_seconds,
            self.run_pace_seconds,
        ]
        .into_iter()
        .all(|value| positive(value).is_none())
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

/// Segment times after overrides are applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WhatIfBreakdown {
    pub swim_seconds: f64,
    pub t1_seconds: f64,
    pub bike_seconds: f64,
    pub t2_seconds: f64,
    pub run_seconds: f64,
}

impl WhatIfBreakdown {
    pub fn total_seconds(&self) -> f64 {
        self.swim_seconds + self.t1_seconds + self.bike_seconds + self.t2_seconds + self.run_seconds
    }

    pub fn total_time(&self) -> String {
        seconds_to_time(self.total_seconds())
    }
}

pub struct WhatIfRecalculator;

impl WhatIfRecalculator {
    /// Finish time in seconds with the overrides applied
    ///
    /// Plans other than triathlon fitness plans report their own total.
    pub fn total_time_seconds(plan: &PacingPlan, overrides: &WhatIfOverrides) -> f64 {
        Self::breakdown(plan, overrides)
            .map(|breakdown| breakdown.total_seconds())
            .unwrap_or_else(|| plan.total_time_seconds())
    }

    /// Per-segment times; `None` unless the plan is a triathlon fitness plan
    ///
    /// Baselines are the values an athlete would read off the plan: swim and
    /// run paces in whole seconds, bike speed to one decimal, and the race's
    /// default transitions.
    pub fn breakdown(plan: &PacingPlan, overrides: &WhatIfOverrides) -> Option<WhatIfBreakdown> {
        let PacingPlan::Fitness(plan) = plan else {
            return None;
        };
        let FitnessSegments::Triathlon(segments) = &plan.segments else {
            return None;
        };

        let transitions = plan.context.race_type.default_transitions();

        let swim_pace = positive(overrides.swim_pace_seconds)
            .unwrap_or_else(|| segments.swim.target_pace_seconds.round());
        let bike_speed = positive(overrides.bike_speed_mph)
            .unwrap_or_else(|| segments.bike.estimated_speed_mph.to_f64().unwrap_or_default());
        let run_pace = positive(overrides.run_pace_seconds)
            .unwrap_or_else(|| segments.run.target_pace_seconds.round());

        let breakdown = WhatIfBreakdown {
            swim_seconds: segments.swim.distance_miles * YARDS_PER_MILE / 100.0 * swim_pace,
            t1_seconds: positive(overrides.t1_seconds).unwrap_or(transitions.t1_seconds),
            bike_seconds: segments.bike.distance_miles / bike_speed * 3600.0,
            t2_seconds: positive(overrides.t2_seconds).unwrap_or(transitions.t2_seconds),
            run_seconds: segments.run.distance_miles * run_pace,
        };

        tracing::debug!(
            race = %plan.context.race_type,
            total = %breakdown.total_time(),
            "What-if recalculated"
        );

        Some(breakdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AthleteLevel, AthleteProfile, BikeFitness, FitnessInputs, Gender, PacingApproach,
        PacingRequest, RunFitness, SwimFitness, TargetInputs,
    };
    use crate::pacing::PacingCalculator;

    fn olympic_request(approach: PacingApproach) -> PacingRequest {
        PacingRequest {
            athlete: AthleteProfile {
                age: 35,
                gender: Gender::Male,
                current_weight_lbs: 170.0,
                race_weight_lbs: 165.0,
                athlete_level: Some(AthleteLevel::Competitive),
                max_hr: None,
                resting_hr: None,
                threshold_hr: None,
            },
            race_type: "Olympic Triathlon".to_string(),
            custom_distances: Default::default(),
            approach,
        }
    }

    fn olympic_fitness_plan() -> PacingPlan {
        PacingCalculator::calculate(&olympic_request(PacingApproach::Fitness(FitnessInputs {
            swim: Some(SwimFitness::KnownCss("1:40".to_string())),
            bike: Some(BikeFitness::KnownFtp(250)),
            run: RunFitness::KnownThresholdPace("7:00".to_string()),
            run_threshold_power: None,
        })))
        .unwrap()
    }

    #[test]
    fn test_no_overrides_uses_displayed_plan_values() {
        let plan = olympic_fitness_plan();
        let breakdown = WhatIfRecalculator::breakdown(&plan, &WhatIfOverrides::default()).unwrap();

        // 16.368 hundreds at 1:48
        assert!((breakdown.swim_seconds - 16.368 * 108.0).abs() < 1e-6);
        // 24.8 mi at 23.2 mph
        assert!((breakdown.bike_seconds - 24.8 / 23.2 * 3600.0).abs() < 1e-6);
        // 6.2 mi at 7:32
        assert!((breakdown.run_seconds - 6.2 * 452.0).abs() < 1e-6);
        assert_eq!(breakdown.t1_seconds, 210.0);
        assert_eq!(breakdown.t2_seconds, 120.0);

        // Rounded display values differ slightly from the exact plan total
        let total = WhatIfRecalculator::total_time_seconds(&plan, &WhatIfOverrides::default());
        assert!((total - plan.total_time_seconds()).abs() < 30.0);
    }

    #[test]
    fn test_overrides_replace_segments() {
        let plan = olympic_fitness_plan();
        let overrides = WhatIfOverrides {
            swim_pace_seconds: Some(100.0),
            t1_seconds: Some(60.0),
            bike_speed_mph: Some(24.8),
            t2_seconds: Some(60.0),
            run_pace_seconds: Some(420.0),
        };
        let breakdown = WhatIfRecalculator::breakdown(&plan, &overrides).unwrap();

        assert!((breakdown.swim_seconds - 1636.8).abs() < 1e-6);
        assert!((breakdown.bike_seconds - 3600.0).abs() < 1e-6);
        assert!((breakdown.run_seconds - 2604.0).abs() < 1e-6);
        assert!((breakdown.total_seconds() - 7960.8).abs() < 1e-6);
        assert_eq!(breakdown.total_time(), "2:12:41");
    }

    #[test]
    fn test_recalculation_is_idempotent() {
        let plan = olympic_fitness_plan();
        let overrides = WhatIfOverrides {
            bike_speed_mph: Some(22.0),
            ..Default::default()
        };
        let first = WhatIfRecalculator::total_time_seconds(&plan, &overrides);
        let second = WhatIfRecalculator::total_time_seconds(&plan, &overrides);
        assert_eq!(first, second);
    }

    #[test]
    fn test_faster_overrides_never_slow_the_race() {
        let plan = olympic_fitness_plan();
        let baseline = WhatIfRecalculator::total_time_seconds(&plan, &WhatIfOverrides::default());
        let faster = WhatIfRecalculator::total_time_seconds(
            &plan,
            &WhatIfOverrides {
                run_pace_seconds: Some(400.0),
                ..Default::default()
            },
        );
        assert!(faster < baseline);
    }

    #[test]
    fn test_target_plan_total_is_unchanged() {
        let plan = PacingCalculator::calculate(&olympic_request(PacingApproach::Target(
            TargetInputs {
                target_time: "2:30:00".to_string(),
            },
        )))
        .unwrap();

        let overrides = WhatIfOverrides {
            run_pace_seconds: Some(300.0),
            ..Default::default()
        };
        assert!(WhatIfRecalculator::breakdown(&plan, &overrides).is_none());
        assert_eq!(WhatIfRecalculator::total_time_seconds(&plan, &overrides), 9000.0);
    }

    #[test]
    fn test_cleared_overrides_fall_back_to_plan_values() {
        let plan = olympic_fitness_plan();
        let baseline = WhatIfRecalculator::total_time_seconds(&plan, &WhatIfOverrides::default());

        let zeroed = WhatIfOverrides {
            swim_pace_seconds: Some(0.0),
            t1_seconds: Some(0.0),
            bike_speed_mph: Some(0.0),
            t2_seconds: Some(-30.0),
            run_pace_seconds: Some(f64::NAN),
        };
        let total = WhatIfRecalculator::total_time_seconds(&plan, &zeroed);
        assert!(total.is_finite());
        assert_eq!(total, baseline);

        let bike_only = WhatIfOverrides {
            bike_speed_mph: Some(0.0),
            ..Default::default()
        };
        assert_eq!(WhatIfRecalculator::total_time_seconds(&plan, &bike_only), baseline);
    }

    #[test]
    fn test_overrides_emptiness() {
        assert!(WhatIfOverrides::default().is_empty());
        assert!(WhatIfOverrides {
            bike_speed_mph: Some(0.0),
            ..Default::default()
        }
        .is_empty());
        assert!(!WhatIfOverrides {
            t1_seconds: Some(90.0),
            ..Default::default()
        }
        .is_empty());
    }
}
