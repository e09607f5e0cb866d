//! Race and zone catalog
//!
//! Static, read-only data keyed by the closed [`RaceType`] enumeration:
//! nominal distances, pacing zone multipliers, transition defaults,
//! target-time split tables, drag areas and strategy narratives.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::conversion::convert_to_miles;
use crate::error::{RacePaceError, Result};
use crate::models::{CustomDistance, CustomDistances};

/// Triathlon or single-discipline running race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RaceCategory {
    Triathlon,
    Run,
}

/// Every race the engine knows how to pace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RaceType {
    #[serde(rename = "Sprint Triathlon")]
    SprintTriathlon,
    #[serde(rename = "Olympic Triathlon")]
    OlympicTriathlon,
    #[serde(rename = "Half Ironman (70.3)")]
    HalfIronman,
    #[serde(rename = "Full Ironman (140.6)")]
    FullIronman,
    #[serde(rename = "Custom Triathlon")]
    CustomTriathlon,
    #[serde(rename = "5K Run")]
    FiveK,
    #[serde(rename = "10K Run")]
    TenK,
    #[serde(rename = "Half Marathon")]
    HalfMarathon,
    #[serde(rename = "Full Marathon")]
    FullMarathon,
    #[serde(rename = "Custom Run")]
    CustomRun,
}

impl RaceType {
    pub const ALL: [RaceType; 10] = [
        RaceType::SprintTriathlon,
        RaceType::OlympicTriathlon,
        RaceType::HalfIronman,
        RaceType::FullIronman,
        RaceType::CustomTriathlon,
        RaceType::FiveK,
        RaceType::TenK,
        RaceType::HalfMarathon,
        RaceType::FullMarathon,
        RaceType::CustomRun,
    ];

    /// Display name, also the key accepted by [`FromStr`]
    pub fn name(&self) -> &'static str {
        match self {
            RaceType::SprintTriathlon => "Sprint Triathlon",
            RaceType::OlympicTriathlon => "Olympic Triathlon",
            RaceType::HalfIronman => "Half Ironman (70.3)",
            RaceType::FullIronman => "Full Ironman (140.6)",
            RaceType::CustomTriathlon => "Custom Triathlon",
            RaceType::FiveK => "5K Run",
            RaceType::TenK => "10K Run",
            RaceType::HalfMarathon => "Half Marathon",
            RaceType::FullMarathon => "Full Marathon",
            RaceType::CustomRun => "Custom Run",
        }
    }

    pub fn category(&self) -> RaceCategory {
        match self {
            RaceType::SprintTriathlon
            | RaceType::OlympicTriathlon
            | RaceType::HalfIronman
            | RaceType::FullIronman
            | RaceType::CustomTriathlon => RaceCategory::Triathlon,
            RaceType::FiveK
            | RaceType::TenK
            | RaceType::HalfMarathon
            | RaceType::FullMarathon
            | RaceType::CustomRun => RaceCategory::Run,
        }
    }

    pub fn is_triathlon(&self) -> bool {
        self.category() == RaceCategory::Triathlon
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, RaceType::CustomTriathlon | RaceType::CustomRun)
    }

    /// Nominal segment distances in miles; `None` for custom races
    pub fn nominal_distances(&self) -> Option<SegmentDistances> {
        let (swim, bike, run) = match self {
            RaceType::SprintTriathlon => (0.5, 12.4, 3.1),
            RaceType::OlympicTriathlon => (0.93, 24.8, 6.2),
            RaceType::HalfIronman => (1.2, 56.0, 13.1),
            RaceType::FullIronman => (2.4, 112.0, 26.2),
            RaceType::FiveK => (0.0, 0.0, 3.1),
            RaceType::TenK => (0.0, 0.0, 6.2),
            RaceType::HalfMarathon => (0.0, 0.0, 13.1),
            RaceType::FullMarathon => (0.0, 0.0, 26.2),
            RaceType::CustomTriathlon | RaceType::CustomRun => return None,
        };
        Some(SegmentDistances {
            swim_miles: swim,
            bike_miles: bike,
            run_miles: run,
        })
    }

    /// Transition defaults used by fitness-based plans
    pub fn default_transitions(&self) -> TransitionTimes {
        let (t1, t2) = match self {
            RaceType::SprintTriathlon => (180.0, 100.0),
            RaceType::OlympicTriathlon => (210.0, 120.0),
            RaceType::HalfIronman => (300.0, 180.0),
            RaceType::FullIronman => (600.0, 360.0),
            _ => (180.0, 120.0),
        };
        TransitionTimes {
            t1_seconds: t1,
            t2_seconds: t2,
        }
    }

    /// Combined T1 + T2 allowance, in seconds, used by target-time plans
    pub fn target_transition_estimate(&self) -> u32 {
        match self {
            RaceType::SprintTriathlon => 120,
            RaceType::OlympicTriathlon => 180,
            RaceType::CustomTriathlon => 240,
            _ => 300,
        }
    }

    /// Share of racing time per discipline; `None` for running races
    pub fn target_splits(&self) -> Option<SplitPercentages> {
        let (swim, bike, run) = match self {
            RaceType::SprintTriathlon => (dec!(0.15), dec!(0.50), dec!(0.35)),
            RaceType::OlympicTriathlon => (dec!(0.13), dec!(0.52), dec!(0.35)),
            RaceType::HalfIronman => (dec!(0.10), dec!(0.55), dec!(0.35)),
            RaceType::FullIronman => (dec!(0.09), dec!(0.55), dec!(0.36)),
            RaceType::CustomTriathlon => (dec!(0.12), dec!(0.53), dec!(0.35)),
            _ => return None,
        };
        Some(SplitPercentages { swim, bike, run })
    }

    /// Race-day drag area (m²) assumed by the bike speed solver
    pub fn cda(&self) -> f64 {
        match self {
            RaceType::SprintTriathlon => 0.29,
            RaceType::OlympicTriathlon
            | RaceType::HalfIronman
            | RaceType::FullIronman
            | RaceType::CustomTriathlon => 0.28,
            _ => 0.25,
        }
    }

    pub fn zones(&self) -> PacingZones {
        PacingZones::for_race(*self)
    }

    pub fn strategy(&self) -> RaceStrategy {
        RaceStrategy::for_race(*self)
    }
}

impl fmt::Display for RaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RaceType {
    type Err = RacePaceError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let name = s.trim();
        RaceType::ALL
            .iter()
            .copied()
            .find(|race| race.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| RacePaceError::UnknownRaceType {
                name: s.to_string(),
            })
    }
}

/// Swim/bike/run distances in miles
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentDistances {
    pub swim_miles: f64,
    pub bike_miles: f64,
    pub run_miles: f64,
}

/// A race type with its resolved distances
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RaceDefinition {
    pub race_type: RaceType,
    pub category: RaceCategory,
    pub distances: SegmentDistances,
}

impl RaceDefinition {
    /// Resolve distances, converting caller-supplied ones for custom races
    ///
    /// Custom races need a positive distance for every segment they race:
    /// swim, bike and run for a triathlon, run for a running race.
    pub fn resolve(race_type: RaceType, custom: &CustomDistances) -> Result<Self> {
        let distances = match race_type.nominal_distances() {
            Some(distances) => distances,
            None if race_type.is_triathlon() => SegmentDistances {
                swim_miles: custom_miles(custom.swim.as_ref(), "custom swim distance")?,
                bike_miles: custom_miles(custom.bike.as_ref(), "custom bike distance")?,
                run_miles: custom_miles(custom.run.as_ref(), "custom run distance")?,
            },
            None => SegmentDistances {
                swim_miles: 0.0,
                bike_miles: 0.0,
                run_miles: custom_miles(custom.run.as_ref(), "custom run distance")?,
            },
        };

        Ok(Self {
            race_type,
            category: race_type.category(),
            distances,
        })
    }
}

fn custom_miles(distance: Option<&CustomDistance>, field: &str) -> Result<f64> {
    let miles = distance
        .map(|d| convert_to_miles(d.value, &d.unit))
        .unwrap_or(0.0);

    if miles > 0.0 {
        Ok(miles)
    } else {
        Err(RacePaceError::MissingInput {
            field: field.to_string(),
        })
    }
}

/// Transition allowances in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransitionTimes {
    pub t1_seconds: f64,
    pub t2_seconds: f64,
}

/// Fractions of net racing time per discipline
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SplitPercentages {
    pub swim: Decimal,
    pub bike: Decimal,
    pub run: Decimal,
}

/// Race intensity as fractions of threshold
///
/// Running races carry only the run multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PacingZones {
    pub swim_css: Option<Decimal>,
    pub bike_power: Option<Decimal>,
    pub bike_hr: Option<Decimal>,
    pub run_hr: Decimal,
    pub run_power: Decimal,
    pub run_pace: Decimal,
    /// Rate of perceived exertion
    pub rpe: &'static str,
}

impl PacingZones {
    /// Zones for a race type, falling back to Olympic Triathlon when the
    /// race has no dedicated record
    pub fn for_race(race: RaceType) -> Self {
        Self::registered(race).unwrap_or_else(|| {
            tracing::warn!(race = %race, "No pacing zones registered, using Olympic Triathlon zones");
            Self::olympic()
        })
    }

    /// Zones looked up by race name, falling back to Olympic Triathlon for
    /// unregistered names
    pub fn for_name(name: &str) -> Self {
        match name.parse::<RaceType>() {
            Ok(race) => Self::for_race(race),
            Err(_) => {
                tracing::warn!(name, "Unregistered race name, using Olympic Triathlon zones");
                Self::olympic()
            }
        }
    }

    fn registered(race: RaceType) -> Option<Self> {
        let zones = match race {
            RaceType::SprintTriathlon => Self::triathlon(
                dec!(0.97), dec!(0.95), dec!(0.88), dec!(0.93), dec!(1.10), dec!(0.97), "8-9/10",
            ),
            RaceType::OlympicTriathlon | RaceType::CustomTriathlon => Self::olympic(),
            RaceType::HalfIronman => Self::triathlon(
                dec!(0.88), dec!(0.77), dec!(0.75), dec!(0.83), dec!(0.90), dec!(0.83), "6-7/10",
            ),
            RaceType::FullIronman => Self::triathlon(
                dec!(0.83), dec!(0.70), dec!(0.70), dec!(0.76), dec!(0.85), dec!(0.77), "6/10",
            ),
            RaceType::FiveK => Self::run(dec!(0.96), dec!(1.12), dec!(1.03), "9/10"),
            RaceType::TenK => Self::run(dec!(0.93), dec!(1.07), dec!(0.98), "8/10"),
            RaceType::HalfMarathon => Self::run(dec!(0.89), dec!(0.97), dec!(0.90), "7/10"),
            RaceType::FullMarathon => Self::run(dec!(0.86), dec!(0.92), dec!(0.87), "7/10"),
            RaceType::CustomRun => return None,
        };
        Some(zones)
    }

    fn olympic() -> Self {
        Self::triathlon(
            dec!(0.93), dec!(0.92), dec!(0.85), dec!(0.89), dec!(1.05), dec!(0.93), "7-8/10",
        )
    }

    fn triathlon(
        swim_css: Decimal,
        bike_power: Decimal,
        bike_hr: Decimal,
        run_hr: Decimal,
        run_power: Decimal,
        run_pace: Decimal,
        rpe: &'static str,
    ) -> Self {
        Self {
            swim_css: Some(swim_css),
            bike_power: Some(bike_power),
            bike_hr: Some(bike_hr),
            run_hr,
            run_power,
            run_pace,
            rpe,
        }
    }

    fn run(run_hr: Decimal, run_power: Decimal, run_pace: Decimal, rpe: &'static str) -> Self {
        Self {
            swim_css: None,
            bike_power: None,
            bike_hr: None,
            run_hr,
            run_power,
            run_pace,
            rpe,
        }
    }
}

/// Per-discipline coaching advice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyAdvice {
    Triathlon {
        swim: &'static str,
        bike: &'static str,
        run: &'static str,
    },
    Run {
        strategy: &'static str,
    },
}

/// Race-day narrative: the classic mistake, the plan, the mindset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RaceStrategy {
    pub mistake: &'static str,
    pub advice: StrategyAdvice,
    pub mindset: &'static str,
}

impl RaceStrategy {
    pub fn for_race(race: RaceType) -> Self {
        match race {
            RaceType::SprintTriathlon => Self {
                mistake: "Racing like it's a 45-60 minute suffer-fest from the gun.",
                advice: StrategyAdvice::Triathlon {
                    swim: "Calm and controlled. You should exit slightly under redline, not gasping.",
                    bike: "Hard but smooth. Avoid surging out of turns or chasing faster riders.",
                    run: "First half = control on target. Second half = let it all out and race.",
                },
                mindset: "Sprint rewards fitness, but still punishes stupidity. You can't win it on the bike if you destroy the run.",
            },
            RaceType::OlympicTriathlon => Self {
                mistake: "Treating it like a long sprint.",
                advice: StrategyAdvice::Triathlon {
                    swim: "First 400m controlled breathing. Build effort gradually, don't surge.",
                    bike: "Settle the first 10 minutes, then apply steady pressure to the wattage target. Increase cadence the final 5-10 minutes.",
                    run: "First 2K easy. Lock in rhythm. Final 2K empty the tank.",
                },
                mindset: "Olympic races are decided by bike discipline and run patience, not bravery.",
            },
            RaceType::HalfIronman => Self {
                mistake: "Riding \"just a little too hard\" because it feels easy early.",
                advice: StrategyAdvice::Triathlon {
                    swim: "Very controlled. Find breath rhythm and feet early if possible.",
                    bike: "Conservative first 20-30 minutes. Steady middle. Aim for a negative split. Increase cadence the final 5-10 minutes. Remember your fueling plan!",
                    run: "First 3-4 miles easy. Build to race pace by mile 6.",
                },
                mindset: "If the bike feels impressive, the run will often be disappointing.",
            },
            RaceType::FullIronman => Self {
                mistake: "Racing the first half instead of preparing for the second.",
                advice: StrategyAdvice::Triathlon {
                    swim: "Extremely controlled. Rhythm over position.",
                    bike: "The number 1 key is your hydro/fueling plan! Conservative effort the first hour. Stay within your planned target wattage zones until special needs. Self-evaluation on modifying target wattage up or down in the back half. Increase cadence the final 5-10 minutes.",
                    run: "First 6-8 miles conservative. Hold steady through the middle. Walk the aid stations to maximize hydro/nutrition, and cooling. The back half will be painful; embrace it and finish strong.",
                },
                mindset: "Ironman is an execution event. You don't win it with heroics; you earn it with restraint.",
            },
            RaceType::CustomTriathlon => Self {
                mistake: "Not adjusting strategy for your specific custom distance.",
                advice: StrategyAdvice::Triathlon {
                    swim: "Controlled breathing and rhythm. Find your pace based on the distance.",
                    bike: "Start conservative, build into your target power. Adjust fueling based on total bike duration.",
                    run: "Ease into your pace. Let your heart rate guide your effort level.",
                },
                mindset: "Execute your custom race with the same discipline as any standard distance.",
            },
            RaceType::FiveK => Self {
                mistake: "Starting faster than goal pace because it feels \"easy.\"",
                advice: StrategyAdvice::Run {
                    strategy: "Start at goal pace. Hold miles 1-2. Push the final mile.",
                },
                mindset: "You don't race the first mile; you survive it well enough to race the last.",
            },
            RaceType::TenK => Self {
                mistake: "Overreaching at mile 2-3 and paying for it late.",
                advice: StrategyAdvice::Run {
                    strategy: "Controlled start. Hold steady through miles 3-5. Push the final mile.",
                },
                mindset: "The 10K rewards patience and punishes impatience quietly.",
            },
            RaceType::HalfMarathon => Self {
                mistake: "Banking time early.",
                advice: StrategyAdvice::Run {
                    strategy: "Conservative first 3 miles. Lock into rhythm mid-race. Negative split miles 10-13.",
                },
                mindset: "The best half marathons feel boring early and powerful late.",
            },
            RaceType::FullMarathon => Self {
                mistake: "Letting excitement dictate the first 10 miles.",
                advice: StrategyAdvice::Run {
                    strategy: "Very conservative first 10 miles. Manage miles 10-20. Grit miles 20-26 only if earned.",
                },
                mindset: "Marathons aren't finished with courage; they're managed with discipline.",
            },
            RaceType::CustomRun => Self {
                mistake: "Pacing a custom distance off the nearest standard race instead of its real length.",
                advice: StrategyAdvice::Run {
                    strategy: "Controlled first quarter. Settle into target pace through the middle. Push only over the final stretch.",
                },
                mindset: "Run the distance in front of you, not the one you usually race.",
            },
        }
    }
}
