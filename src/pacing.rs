//! Pacing plan calculator
//!
//! Turns one [`PacingRequest`] into a [`PacingPlan`] using either the
//! athlete's current fitness (thresholds scaled by race zones, bike speed from
//! the physics solver) or a desired finish time (fixed discipline splits).

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::bike_speed::BikeSpeedSolver;
use crate::catalog::{PacingZones, RaceDefinition, RaceType};
use crate::conversion::{pace_to_seconds, time_to_seconds, YARDS_PER_MILE};
use crate::error::{RacePaceError, Result};
use crate::models::{
    AthleteLevel, AthleteProfile, BikeFitness, BikeFitnessTarget, BikeTimeTarget, Effort, FitnessInputs,
    FitnessPlan, FitnessSegments, HeartRateMetrics, PacingApproach, PacingPlan, PacingRequest,
    PlanContext, RunFitness, RunFitnessTarget, RunTimeTarget, SwimFitness, SwimFitnessTarget,
    SwimTimeTarget, TargetInputs, TargetPlan, TargetRange, TargetSegments, ThresholdMetrics,
    TransitionTarget, TriathlonFitnessSegments, TriathlonTimeSegments,
};
use crate::physiology::{percentage_of, round_half_up, PhysiologyEstimator};

/// Distance of a 5K in miles, as used for threshold pace estimates
pub const FIVE_K_MILES: f64 = 3.1;

/// Half-width of the power and heart rate bands, as a fraction of threshold
const ZONE_BAND: f64 = 0.02;

/// Half-width of the run pace band in seconds per mile
const PACE_BAND_SECONDS: f64 = 5.0;

/// Effort cutoffs on the run HR multiplier: (very hard, hard)
const TRIATHLON_RUN_EFFORT: (Decimal, Decimal) = (dec!(0.90), dec!(0.82));
const STANDALONE_RUN_EFFORT: (Decimal, Decimal) = (dec!(0.95), dec!(0.88));

/// Pacing plan calculation entry points
pub struct PacingCalculator;

impl PacingCalculator {
    /// Compute a full pacing plan for one input snapshot
    ///
    /// The race name is resolved before anything else; an unrecognized name
    /// fails with [`RacePaceError::UnknownRaceType`].
    pub fn calculate(request: &PacingRequest) -> Result<PacingPlan> {
        let race_type: RaceType = request.race_type.parse()?;
        let race = RaceDefinition::resolve(race_type, &request.custom_distances)?;
        let athlete = &request.athlete;

        // Target plans ignore the athlete level and use the default fraction
        let level = match request.approach {
            PacingApproach::Fitness(_) => athlete.athlete_level,
            PacingApproach::Target(_) => None,
        };
        let fraction = PhysiologyEstimator::athlete_level_threshold_fraction(level);
        let heart_rate = Self::heart_rate_metrics(athlete, level);

        tracing::debug!(
            race = %race_type,
            max_hr = heart_rate.max_hr,
            threshold_hr = heart_rate.threshold_hr,
            %fraction,
            "Resolved heart rate anchors"
        );

        let context = PlanContext {
            race_type,
            category: race.category,
            age: athlete.age,
            gender: athlete.gender,
            race_weight_lbs: athlete.race_weight_lbs,
            athlete_level: athlete.athlete_level,
            heart_rate,
            zones: race_type.zones(),
            strategy: race_type.strategy(),
        };

        let plan = match &request.approach {
            PacingApproach::Fitness(inputs) => {
                PacingPlan::Fitness(Self::fitness_plan(context, &race, inputs, fraction)?)
            }
            PacingApproach::Target(inputs) => {
                PacingPlan::Target(Self::target_plan(context, &race, inputs)?)
            }
        };

        tracing::info!(
            race = %race_type,
            total_time = %plan.total_time(),
            "Pacing plan computed"
        );

        Ok(plan)
    }

    /// Max HR (known or age-predicted) and threshold HR (known or estimated)
    pub fn heart_rate_metrics(
        athlete: &AthleteProfile,
        level: Option<AthleteLevel>,
    ) -> HeartRateMetrics {
        let max_hr = athlete.max_hr.map(f64::from).unwrap_or_else(|| {
            PhysiologyEstimator::estimate_max_heart_rate(athlete.age, athlete.gender, athlete.age >= 40)
        });

        let threshold_hr = athlete.threshold_hr.unwrap_or_else(|| {
            PhysiologyEstimator::estimate_threshold_heart_rate(max_hr, athlete.resting_hr, level)
        });

        HeartRateMetrics {
            max_hr,
            resting_hr: athlete.resting_hr,
            threshold_hr,
        }
    }

    /// Derive CSS, FTP and run threshold pace from known values or test efforts
    pub fn threshold_metrics(
        race: &RaceDefinition,
        inputs: &FitnessInputs,
        heart_rate: &HeartRateMetrics,
        fraction: Decimal,
    ) -> Result<ThresholdMetrics> {
        let fraction_f64 = fraction.to_f64().unwrap_or_default();

        let (css_seconds, ftp_watts) = if race.race_type.is_triathlon() {
            let css = match missing(inputs.swim.as_ref(), "swim fitness (CSS or fastest 100)")? {
                SwimFitness::KnownCss(pace) => pace_to_seconds(pace)? as f64,
                SwimFitness::Fastest100(pace) => pace_to_seconds(pace)? as f64 * fraction_f64,
            };
            let ftp = match missing(inputs.bike.as_ref(), "bike fitness (FTP or 20 minute power)")? {
                BikeFitness::KnownFtp(watts) => *watts,
                BikeFitness::Max20MinWatts(watts) => percentage_of(f64::from(*watts), fraction),
            };
            (Some(css), Some(ftp))
        } else {
            (None, None)
        };

        // Threshold pace is slower than 5K pace, hence the division
        let run_threshold_pace_seconds = match &inputs.run {
            RunFitness::KnownThresholdPace(pace) => pace_to_seconds(pace)? as f64,
            RunFitness::Fastest5k(time) => {
                time_to_seconds(time)? as f64 / FIVE_K_MILES / fraction_f64
            }
        };

        Ok(ThresholdMetrics {
            max_hr: heart_rate.max_hr,
            threshold_hr: heart_rate.threshold_hr,
            css_seconds,
            ftp_watts,
            run_threshold_pace_seconds,
        })
    }

    fn fitness_plan(
        context: PlanContext,
        race: &RaceDefinition,
        inputs: &FitnessInputs,
        fraction: Decimal,
    ) -> Result<FitnessPlan> {
        let thresholds = Self::threshold_metrics(race, inputs, &context.heart_rate, fraction)?;
        let zones = context.zones;
        let max_hr = context.heart_rate.max_hr;

        tracing::debug!(
            css = ?thresholds.css(),
            ftp = ?thresholds.ftp_watts,
            run_threshold = %thresholds.run_threshold_pace(),
            "Derived threshold metrics"
        );

        let (segments, total_time_seconds) = if race.race_type.is_triathlon() {
            let (Some(swim_css), Some(bike_power), Some(bike_hr), Some(css), Some(ftp)) = (
                zones.swim_css,
                zones.bike_power,
                zones.bike_hr,
                thresholds.css_seconds,
                thresholds.ftp_watts,
            ) else {
                return Err(RacePaceError::UnknownRaceType {
                    name: race.race_type.name().to_string(),
                });
            };

            let swim = Self::swim_fitness_target(race.distances.swim_miles, css, swim_css);
            let bike = Self::bike_fitness_target(
                race,
                context.race_weight_lbs,
                ftp,
                max_hr,
                bike_power,
                bike_hr,
            );
            let run = Self::run_fitness_target(
                race.distances.run_miles,
                max_hr,
                thresholds.run_threshold_pace_seconds,
                &zones,
                inputs.run_threshold_power,
                TRIATHLON_RUN_EFFORT,
            );

            let transitions = race.race_type.default_transitions();
            let t1 = TransitionTarget {
                time_seconds: transitions.t1_seconds,
            };
            let t2 = TransitionTarget {
                time_seconds: transitions.t2_seconds,
            };

            let total = swim.estimated_time_seconds
                + t1.time_seconds
                + bike.estimated_time_seconds
                + t2.time_seconds
                + run.estimated_time_seconds;

            (
                FitnessSegments::Triathlon(TriathlonFitnessSegments {
                    swim,
                    t1,
                    bike,
                    t2,
                    run,
                }),
                total,
            )
        } else {
            let run = Self::run_fitness_target(
                race.distances.run_miles,
                max_hr,
                thresholds.run_threshold_pace_seconds,
                &zones,
                inputs.run_threshold_power,
                STANDALONE_RUN_EFFORT,
            );
            let total = run.estimated_time_seconds;
            (FitnessSegments::Run(run), total)
        };

        Ok(FitnessPlan {
            context,
            thresholds,
            segments,
            total_time_seconds,
        })
    }

    fn swim_fitness_target(distance_miles: f64, css: f64, swim_css: Decimal) -> SwimFitnessTarget {
        let target_pace_seconds = css / swim_css.to_f64().unwrap_or(1.0);
        let hundreds = distance_miles * YARDS_PER_MILE / 100.0;

        let effort = if swim_css >= dec!(0.95) {
            Effort::Hard
        } else if swim_css >= dec!(0.85) {
            Effort::ModerateHard
        } else {
            Effort::Moderate
        };

        SwimFitnessTarget {
            distance_miles,
            target_pace_seconds,
            estimated_time_seconds: hundreds * target_pace_seconds,
            effort,
        }
    }

    fn bike_fitness_target(
        race: &RaceDefinition,
        race_weight_lbs: f64,
        ftp: u16,
        max_hr: f64,
        bike_power: Decimal,
        bike_hr: Decimal,
    ) -> BikeFitnessTarget {
        let ftp = f64::from(ftp);
        let power_watts = ftp * bike_power.to_f64().unwrap_or_default();

        let solver = BikeSpeedSolver::for_race(race_weight_lbs, race.race_type);
        let speed_mph = solver.speed_mph(power_watts);
        let distance_miles = race.distances.bike_miles;

        let effort = if bike_power >= dec!(0.90) {
            Effort::Hard
        } else if bike_power >= dec!(0.75) {
            Effort::ModerateHard
        } else {
            Effort::Moderate
        };

        BikeFitnessTarget {
            distance_miles,
            target_power: percentage_of(ftp, bike_power),
            power_range: band(ftp, bike_power),
            target_hr: percentage_of(max_hr, bike_hr),
            hr_range: band(max_hr, bike_hr),
            cda: solver.cda,
            estimated_speed_mph: round_speed(speed_mph),
            estimated_time_seconds: distance_miles / speed_mph * 3600.0,
            effort,
        }
    }

    fn run_fitness_target(
        distance_miles: f64,
        max_hr: f64,
        threshold_pace_seconds: f64,
        zones: &PacingZones,
        run_threshold_power: Option<u16>,
        (very_hard, hard): (Decimal, Decimal),
    ) -> RunFitnessTarget {
        let target_pace_seconds = threshold_pace_seconds / zones.run_pace.to_f64().unwrap_or(1.0);

        let effort = if zones.run_hr >= very_hard {
            Effort::VeryHard
        } else if zones.run_hr >= hard {
            Effort::Hard
        } else {
            Effort::ModerateHard
        };

        RunFitnessTarget {
            distance_miles,
            target_hr: percentage_of(max_hr, zones.run_hr),
            hr_range: band(max_hr, zones.run_hr),
            target_power: run_threshold_power
                .map(|watts| percentage_of(f64::from(watts), zones.run_power)),
            target_pace_seconds,
            pace_range: TargetRange::new(
                target_pace_seconds - PACE_BAND_SECONDS,
                target_pace_seconds + PACE_BAND_SECONDS,
            ),
            estimated_time_seconds: target_pace_seconds * distance_miles,
            effort,
        }
    }

    fn target_plan(
        context: PlanContext,
        race: &RaceDefinition,
        inputs: &TargetInputs,
    ) -> Result<TargetPlan> {
        let target_time_seconds = time_to_seconds(&inputs.target_time)?;
        let distances = race.distances;

        let segments = if race.race_type.is_triathlon() {
            let splits = race.race_type.target_splits().ok_or_else(|| {
                RacePaceError::UnknownRaceType {
                    name: race.race_type.name().to_string(),
                }
            })?;

            let transition = race.race_type.target_transition_estimate();
            let race_time = Decimal::from(target_time_seconds) - Decimal::from(transition);
            let share = |split: Decimal| (race_time * split).to_f64().unwrap_or_default();

            let swim_time = share(splits.swim);
            let bike_time = share(splits.bike);
            let run_time = share(splits.run);
            let half_transition = f64::from(transition) / 2.0;

            tracing::debug!(
                race = %race.race_type,
                transition,
                swim_time,
                bike_time,
                run_time,
                "Split target time"
            );

            TargetSegments::Triathlon(TriathlonTimeSegments {
                swim: SwimTimeTarget {
                    distance_miles: distances.swim_miles,
                    target_time_seconds: swim_time,
                    required_pace_seconds: swim_time / (distances.swim_miles * YARDS_PER_MILE)
                        * 100.0,
                },
                t1: TransitionTarget {
                    time_seconds: half_transition,
                },
                bike: BikeTimeTarget {
                    distance_miles: distances.bike_miles,
                    target_time_seconds: bike_time,
                    required_speed_mph: round_speed(distances.bike_miles / (bike_time / 3600.0)),
                },
                t2: TransitionTarget {
                    time_seconds: half_transition,
                },
                run: RunTimeTarget {
                    distance_miles: distances.run_miles,
                    target_time_seconds: run_time,
                    required_pace_seconds: run_time / distances.run_miles,
                },
            })
        } else {
            let total = f64::from(target_time_seconds);
            TargetSegments::Run(RunTimeTarget {
                distance_miles: distances.run_miles,
                target_time_seconds: total,
                required_pace_seconds: total / distances.run_miles,
            })
        };

        Ok(TargetPlan {
            context,
            target_time_seconds,
            segments,
        })
    }
}

fn missing<'a, T>(value: Option<&'a T>, field: &str) -> Result<&'a T> {
    value.ok_or_else(|| RacePaceError::MissingInput {
        field: field.to_string(),
    })
}

/// Whole-number band of `value * (fraction ± ZONE_BAND)`
fn band(value: f64, fraction: Decimal) -> TargetRange<u16> {
    let fraction = fraction.to_f64().unwrap_or_default();
    TargetRange::new(
        round_half_up(value * (fraction - ZONE_BAND)),
        round_half_up(value * (fraction + ZONE_BAND)),
    )
}

/// Speed to one decimal place, half-up
fn round_speed(mph: f64) -> Decimal {
    Decimal::from_f64(mph)
        .unwrap_or_default()
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RaceCategory;
    use crate::models::{CustomDistance, CustomDistances, Gender};

    fn create_test_athlete() -> AthleteProfile {
        AthleteProfile {
            age: 35,
            gender: Gender::Male,
            current_weight_lbs: 170.0,
            race_weight_lbs: 165.0,
            athlete_level: Some(AthleteLevel::Competitive),
            max_hr: None,
            resting_hr: None,
            threshold_hr: None,
        }
    }

    fn known_fitness() -> FitnessInputs {
        FitnessInputs {
            swim: Some(SwimFitness::KnownCss("1:40".to_string())),
            bike: Some(BikeFitness::KnownFtp(250)),
            run: RunFitness::KnownThresholdPace("7:00".to_string()),
            run_threshold_power: Some(300),
        }
    }

    fn request(race: &str, approach: PacingApproach) -> PacingRequest {
        PacingRequest {
            athlete: create_test_athlete(),
            race_type: race.to_string(),
            custom_distances: CustomDistances::default(),
            approach,
        }
    }

    fn fitness_plan(plan: PacingPlan) -> FitnessPlan {
        match plan {
            PacingPlan::Fitness(plan) => plan,
            PacingPlan::Target(_) => panic!("expected a fitness plan"),
        }
    }

    fn target_plan(plan: PacingPlan) -> TargetPlan {
        match plan {
            PacingPlan::Target(plan) => plan,
            PacingPlan::Fitness(_) => panic!("expected a target plan"),
        }
    }

    #[test]
    fn test_olympic_fitness_plan() {
        let plan = PacingCalculator::calculate(&request(
            "Olympic Triathlon",
            PacingApproach::Fitness(known_fitness()),
        ))
        .unwrap();
        let plan = fitness_plan(plan);

        // 211 - 0.64 * 35 = 188.6, threshold 188.6 * 0.90 = 169.74
        assert!((plan.thresholds.max_hr - 188.6).abs() < 1e-9);
        assert_eq!(plan.thresholds.threshold_hr, 170);

        let FitnessSegments::Triathlon(segments) = &plan.segments else {
            panic!("expected triathlon segments");
        };

        // 100 / 0.93 = 107.5 s per 100 yd over 1636.8 yd
        assert_eq!(segments.swim.target_pace(), "1:48");
        assert!((segments.swim.estimated_time_seconds - 1760.0).abs() < 1e-6);
        assert_eq!(segments.swim.effort, Effort::ModerateHard);

        assert_eq!(segments.bike.target_power, 230);
        assert_eq!(segments.bike.power_range, TargetRange::new(225, 235));
        assert_eq!(segments.bike.target_hr, 160);
        assert_eq!(segments.bike.hr_range, TargetRange::new(157, 164));
        assert_eq!(segments.bike.estimated_speed_mph, dec!(23.2));
        assert_eq!(segments.bike.effort, Effort::Hard);

        // 420 / 0.93 = 451.6 s/mile
        assert_eq!(segments.run.target_pace(), "7:32");
        assert_eq!(segments.run.pace_range(), "7:27-7:37");
        assert!((segments.run.estimated_time_seconds - 2800.0).abs() < 1e-6);
        assert_eq!(segments.run.target_power, Some(315));
        assert_eq!(segments.run.effort, Effort::Hard);

        assert_eq!(segments.t1.time_seconds, 210.0);
        assert_eq!(segments.t2.time_seconds, 120.0);

        let expected = segments.swim.estimated_time_seconds
            + 210.0
            + segments.bike.estimated_time_seconds
            + 120.0
            + segments.run.estimated_time_seconds;
        assert!((plan.total_time_seconds - expected).abs() < 1e-9);
    }

    #[test]
    fn test_fitness_thresholds_from_test_efforts() {
        let inputs = FitnessInputs {
            swim: Some(SwimFitness::Fastest100("1:30".to_string())),
            bike: Some(BikeFitness::Max20MinWatts(280)),
            run: RunFitness::Fastest5k("22:30".to_string()),
            run_threshold_power: None,
        };
        let plan = fitness_plan(
            PacingCalculator::calculate(&request("Sprint Triathlon", PacingApproach::Fitness(inputs)))
                .unwrap(),
        );

        // Competitive athlete: 0.90 fraction
        assert!((plan.thresholds.css_seconds.unwrap() - 81.0).abs() < 1e-9);
        assert_eq!(plan.thresholds.ftp_watts, Some(252));
        // (1350 / 3.1) / 0.9 = 483.9 s/mile, slower than 5K pace
        let five_k_pace = 1350.0 / FIVE_K_MILES;
        assert!(plan.thresholds.run_threshold_pace_seconds > five_k_pace);
        assert_eq!(plan.thresholds.run_threshold_pace(), "8:04");
    }

    #[test]
    fn test_running_fitness_plan() {
        let mut req = request(
            "10K Run",
            PacingApproach::Fitness(FitnessInputs {
                swim: None,
                bike: None,
                run: RunFitness::Fastest5k("22:30".to_string()),
                run_threshold_power: None,
            }),
        );
        req.athlete.athlete_level = Some(AthleteLevel::Recreational);

        let plan = fitness_plan(PacingCalculator::calculate(&req).unwrap());
        assert_eq!(plan.context.category, RaceCategory::Run);
        assert!(plan.thresholds.css_seconds.is_none());
        assert!(plan.thresholds.ftp_watts.is_none());

        let FitnessSegments::Run(run) = &plan.segments else {
            panic!("expected a run segment");
        };
        // (1350 / 3.1 / 0.8) / 0.98 = 555.5 s/mile
        assert_eq!(run.target_pace(), "9:15");
        assert!((run.estimated_time_seconds - 555.464121132324 * 6.2).abs() < 1e-6);
        assert_eq!(run.target_power, None);
        assert_eq!(run.effort, Effort::Hard);
        assert_eq!(plan.total_time_seconds, run.estimated_time_seconds);
    }

    #[test]
    fn test_half_ironman_target_splits_sum_to_target() {
        let plan = target_plan(
            PacingCalculator::calculate(&request(
                "Half Ironman (70.3)",
                PacingApproach::Target(TargetInputs {
                    target_time: "5:30:00".to_string(),
                }),
            ))
            .unwrap(),
        );

        let TargetSegments::Triathlon(segments) = &plan.segments else {
            panic!("expected triathlon segments");
        };

        assert!((segments.swim.target_time_seconds - 1950.0).abs() < 1e-9);
        assert!((segments.bike.target_time_seconds - 10725.0).abs() < 1e-9);
        assert!((segments.run.target_time_seconds - 6825.0).abs() < 1e-9);
        assert_eq!(segments.t1.time_seconds, 150.0);
        assert_eq!(segments.t2.time_seconds, 150.0);

        let sum = segments.swim.target_time_seconds
            + segments.t1.time_seconds
            + segments.bike.target_time_seconds
            + segments.t2.time_seconds
            + segments.run.target_time_seconds;
        assert!((sum - 19800.0).abs() <= 3.0);
        assert_eq!(PacingPlan::Target(plan.clone()).total_time(), "5:30:00");

        // 56 mi in 10725 s
        assert_eq!(segments.bike.required_speed_mph, dec!(18.8));
        assert_eq!(segments.run.required_pace(), "8:41");
    }

    #[test]
    fn test_target_plan_ignores_athlete_level() {
        let mut req = request(
            "Full Marathon",
            PacingApproach::Target(TargetInputs {
                target_time: "3:30:00".to_string(),
            }),
        );
        req.athlete.max_hr = Some(190);
        req.athlete.athlete_level = Some(AthleteLevel::Elite);

        let plan = target_plan(PacingCalculator::calculate(&req).unwrap());
        // 190 * 0.85 = 161.5 -> 162, never the elite 0.95
        assert_eq!(plan.context.heart_rate.threshold_hr, 162);

        let TargetSegments::Run(run) = &plan.segments else {
            panic!("expected a run segment");
        };
        assert_eq!(run.required_pace(), "8:01");
    }

    #[test]
    fn test_known_heart_rates_are_used_verbatim() {
        let mut athlete = create_test_athlete();
        athlete.max_hr = Some(185);
        athlete.threshold_hr = Some(171);
        let hr = PacingCalculator::heart_rate_metrics(&athlete, athlete.athlete_level);
        assert_eq!(hr.max_hr, 185.0);
        assert_eq!(hr.threshold_hr, 171);

        athlete.threshold_hr = None;
        athlete.resting_hr = Some(55);
        let hr = PacingCalculator::heart_rate_metrics(&athlete, athlete.athlete_level);
        // 55 + 0.8 * 130 = 159
        assert_eq!(hr.threshold_hr, 159);
    }

    #[test]
    fn test_over_40_uses_tanaka() {
        let mut athlete = create_test_athlete();
        athlete.age = 40;
        let hr = PacingCalculator::heart_rate_metrics(&athlete, None);
        assert_eq!(hr.max_hr, 180.0);
    }

    #[test]
    fn test_unknown_race_type_fails() {
        let result = PacingCalculator::calculate(&request(
            "Aquathlon",
            PacingApproach::Fitness(known_fitness()),
        ));
        assert!(matches!(result, Err(RacePaceError::UnknownRaceType { name }) if name == "Aquathlon"));
    }

    #[test]
    fn test_triathlon_requires_swim_and_bike_inputs() {
        let mut inputs = known_fitness();
        inputs.bike = None;
        let result = PacingCalculator::calculate(&request(
            "Sprint Triathlon",
            PacingApproach::Fitness(inputs),
        ));
        assert!(matches!(result, Err(RacePaceError::MissingInput { .. })));
    }

    #[test]
    fn test_malformed_pace_surfaces_format_error() {
        let mut inputs = known_fitness();
        inputs.swim = Some(SwimFitness::KnownCss("fast".to_string()));
        let result = PacingCalculator::calculate(&request(
            "Olympic Triathlon",
            PacingApproach::Fitness(inputs),
        ));
        assert!(matches!(result, Err(RacePaceError::Format(_))));
    }

    #[test]
    fn test_custom_triathlon_uses_converted_distances() {
        let mut req = request("Custom Triathlon", PacingApproach::Fitness(known_fitness()));
        req.custom_distances = CustomDistances {
            swim: Some(CustomDistance::new(1500.0, "m")),
            bike: Some(CustomDistance::new(40.0, "km")),
            run: Some(CustomDistance::new(10.0, "km")),
        };

        let plan = fitness_plan(PacingCalculator::calculate(&req).unwrap());
        let FitnessSegments::Triathlon(segments) = &plan.segments else {
            panic!("expected triathlon segments");
        };
        assert!((segments.bike.distance_miles - 24.85484).abs() < 1e-6);
        assert!((segments.run.distance_miles - 6.21371).abs() < 1e-6);
        // Custom Triathlon falls back to the generic transitions
        assert_eq!(segments.t1.time_seconds, 180.0);
        assert_eq!(segments.t2.time_seconds, 120.0);
    }

    #[test]
    fn test_power_targets_round_the_float_product() {
        let mut inputs = known_fitness();
        inputs.bike = Some(BikeFitness::KnownFtp(165));
        let plan = fitness_plan(
            PacingCalculator::calculate(&request("Full Ironman (140.6)", PacingApproach::Fitness(inputs)))
                .unwrap(),
        );
        let FitnessSegments::Triathlon(segments) = &plan.segments else {
            panic!("expected triathlon segments");
        };
        // 165 * 0.70 is 115.49999... in f64
        assert_eq!(segments.bike.target_power, 115);
        assert_eq!(segments.bike.power_range, TargetRange::new(112, 119));

        let plan = fitness_plan(
            PacingCalculator::calculate(&request("Sprint Triathlon", PacingApproach::Fitness(known_fitness())))
                .unwrap(),
        );
        let FitnessSegments::Triathlon(segments) = &plan.segments else {
            panic!("expected triathlon segments");
        };
        // 250 * (0.95 - 0.02) is 232.49999... in f64
        assert_eq!(segments.bike.power_range, TargetRange::new(232, 243));
        assert_eq!(segments.bike.target_power, 238);
    }

    #[test]
    fn test_oversized_target_time_is_format_error() {
        let result = PacingCalculator::calculate(&request(
            "5K Run",
            PacingApproach::Target(TargetInputs {
                target_time: "1193047:00:00".to_string(),
            }),
        ));
        assert!(matches!(result, Err(RacePaceError::Format(_))));
    }

    #[test]
    fn test_custom_run_target_plan() {
        let mut req = request(
            "Custom Run",
            PacingApproach::Target(TargetInputs {
                target_time: "1:30:00".to_string(),
            }),
        );
        req.custom_distances.run = Some(CustomDistance::new(15.0, "km"));

        let plan = target_plan(PacingCalculator::calculate(&req).unwrap());
        let TargetSegments::Run(run) = &plan.segments else {
            panic!("expected a run segment");
        };
        // 5400 s over 9.320565 mi
        assert!((run.distance_miles - 9.320565).abs() < 1e-9);
        assert!((run.required_pace_seconds - 5400.0 / 9.320565).abs() < 1e-9);
        assert_eq!(run.required_pace(), "9:39");
        assert_eq!(PacingPlan::Target(plan.clone()).total_time(), "1:30:00");

        req.custom_distances.run = None;
        assert!(matches!(
            PacingCalculator::calculate(&req),
            Err(RacePaceError::MissingInput { .. })
        ));
    }

    #[test]
    fn test_custom_run_uses_fallback_zones() {
        let mut req = request(
            "Custom Run",
            PacingApproach::Fitness(FitnessInputs {
                swim: None,
                bike: None,
                run: RunFitness::KnownThresholdPace("8:00".to_string()),
                run_threshold_power: None,
            }),
        );
        req.custom_distances.run = Some(CustomDistance::new(15.0, "km"));

        let plan = fitness_plan(PacingCalculator::calculate(&req).unwrap());
        assert_eq!(plan.context.zones, PacingZones::for_race(RaceType::OlympicTriathlon));
        assert_eq!(plan.context.category, RaceCategory::Run);
    }
}
