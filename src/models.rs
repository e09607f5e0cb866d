use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::catalog::{PacingZones, RaceCategory, RaceStrategy, RaceType};
use crate::conversion::{seconds_to_pace, seconds_to_time};

/// Athlete gender, used only by the max heart rate formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Training volume/experience tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AthleteLevel {
    Recreational,
    Intermediate,
    Competitive,
    Elite,
}

impl AthleteLevel {
    /// Parse a level label case-insensitively. Unrecognized labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "recreational" => Some(AthleteLevel::Recreational),
            "intermediate" => Some(AthleteLevel::Intermediate),
            "competitive" => Some(AthleteLevel::Competitive),
            "elite" => Some(AthleteLevel::Elite),
            _ => None,
        }
    }
}

impl fmt::Display for AthleteLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AthleteLevel::Recreational => "Recreational",
            AthleteLevel::Intermediate => "Intermediate",
            AthleteLevel::Competitive => "Competitive",
            AthleteLevel::Elite => "Elite",
        };
        f.write_str(label)
    }
}

/// Athlete snapshot supplied with every pacing request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteProfile {
    /// Age in years
    pub age: u32,

    pub gender: Gender,

    /// Current body weight in pounds
    pub current_weight_lbs: f64,

    /// Expected race-day weight in pounds (drives the bike physics)
    pub race_weight_lbs: f64,

    /// Experience tier; unrecognized labels deserialize to `None`
    #[serde(default, deserialize_with = "lenient_athlete_level")]
    pub athlete_level: Option<AthleteLevel>,

    /// Tested maximum heart rate in bpm
    pub max_hr: Option<u16>,

    /// Resting heart rate in bpm
    pub resting_hr: Option<u16>,

    /// Tested threshold heart rate in bpm
    pub threshold_hr: Option<u16>,
}

fn lenient_athlete_level<'de, D>(deserializer: D) -> Result<Option<AthleteLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let label = Option::<String>::deserialize(deserializer)?;
    Ok(label.as_deref().and_then(AthleteLevel::from_label))
}

/// A caller-supplied segment distance for custom races
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomDistance {
    pub value: f64,
    /// Unit label (`mi`, `km`, `m`, `yd`); unknown labels are taken as miles
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_unit() -> String {
    "mi".to_string()
}

impl CustomDistance {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }
}

/// Segment distances for Custom Triathlon / Custom Run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomDistances {
    pub swim: Option<CustomDistance>,
    pub bike: Option<CustomDistance>,
    pub run: Option<CustomDistance>,
}

/// Swim fitness input: a known CSS pace or a fastest 100 yd time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwimFitness {
    #[serde(rename = "known_css")]
    KnownCss(String),
    #[serde(rename = "fastest_100")]
    Fastest100(String),
}

/// Bike fitness input: a known FTP or best 20 minute power
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BikeFitness {
    #[serde(rename = "known_ftp")]
    KnownFtp(u16),
    #[serde(rename = "max_20_min_watts")]
    Max20MinWatts(u16),
}

/// Run fitness input: a known threshold pace or a fastest 5K time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunFitness {
    #[serde(rename = "known_threshold_pace")]
    KnownThresholdPace(String),
    #[serde(rename = "fastest_5k")]
    Fastest5k(String),
}

/// Inputs for the fitness-based approach
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessInputs {
    /// Required for triathlons
    pub swim: Option<SwimFitness>,
    /// Required for triathlons
    pub bike: Option<BikeFitness>,
    pub run: RunFitness,
    /// Running threshold power in watts, if the athlete runs with power
    pub run_threshold_power: Option<u16>,
}

/// Inputs for the target-time approach
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetInputs {
    /// Desired finish time, `H:MM:SS` or `M:SS`
    pub target_time: String,
}

/// Pacing strategy selector with its strategy-specific fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PacingApproach {
    Fitness(FitnessInputs),
    Target(TargetInputs),
}

/// One fully-formed input snapshot for the pacing engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacingRequest {
    pub athlete: AthleteProfile,
    /// Race display name, e.g. `Half Ironman (70.3)`
    pub race_type: String,
    #[serde(default)]
    pub custom_distances: CustomDistances,
    pub approach: PacingApproach,
}

/// Heart rate anchors used throughout a plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeartRateMetrics {
    pub max_hr: f64,
    pub resting_hr: Option<u16>,
    pub threshold_hr: u16,
}

/// Derived thresholds for a fitness-based plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdMetrics {
    pub max_hr: f64,
    pub threshold_hr: u16,
    /// Critical swim speed, seconds per 100 yd (triathlon only)
    pub css_seconds: Option<f64>,
    /// Functional threshold power in watts (triathlon only)
    pub ftp_watts: Option<u16>,
    /// Running threshold pace, seconds per mile
    pub run_threshold_pace_seconds: f64,
}

impl ThresholdMetrics {
    pub fn css(&self) -> Option<String> {
        self.css_seconds.map(seconds_to_pace)
    }

    pub fn run_threshold_pace(&self) -> String {
        seconds_to_pace(self.run_threshold_pace_seconds)
    }
}

/// Qualitative effort label attached to fitness-based segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effort {
    Moderate,
    ModerateHard,
    Hard,
    VeryHard,
}

impl fmt::Display for Effort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Effort::Moderate => "Moderate",
            Effort::ModerateHard => "Moderate-Hard",
            Effort::Hard => "Hard",
            Effort::VeryHard => "Very Hard",
        };
        f.write_str(label)
    }
}

/// Inclusive target band around a target value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetRange<T> {
    pub low: T,
    pub high: T,
}

impl<T> TargetRange<T> {
    pub fn new(low: T, high: T) -> Self {
        Self { low, high }
    }
}

/// Swim targets derived from CSS
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwimFitnessTarget {
    pub distance_miles: f64,
    /// Seconds per 100 yd
    pub target_pace_seconds: f64,
    pub estimated_time_seconds: f64,
    pub effort: Effort,
}

impl SwimFitnessTarget {
    pub fn target_pace(&self) -> String {
        seconds_to_pace(self.target_pace_seconds)
    }
}

/// Bike targets derived from FTP and the speed solver
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BikeFitnessTarget {
    pub distance_miles: f64,
    pub target_power: u16,
    pub power_range: TargetRange<u16>,
    pub target_hr: u16,
    pub hr_range: TargetRange<u16>,
    /// Drag area used by the speed solver
    pub cda: f64,
    /// Solved speed, one decimal place
    pub estimated_speed_mph: Decimal,
    pub estimated_time_seconds: f64,
    pub effort: Effort,
}

/// Run targets derived from threshold pace and heart rate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunFitnessTarget {
    pub distance_miles: f64,
    pub target_hr: u16,
    pub hr_range: TargetRange<u16>,
    /// Only present when a running threshold power was supplied
    pub target_power: Option<u16>,
    /// Seconds per mile
    pub target_pace_seconds: f64,
    pub pace_range: TargetRange<f64>,
    pub estimated_time_seconds: f64,
    pub effort: Effort,
}

impl RunFitnessTarget {
    pub fn target_pace(&self) -> String {
        seconds_to_pace(self.target_pace_seconds)
    }

    pub fn pace_range(&self) -> String {
        format!(
            "{}-{}",
            seconds_to_pace(self.pace_range.low),
            seconds_to_pace(self.pace_range.high)
        )
    }
}

/// Transition allotment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransitionTarget {
    pub time_seconds: f64,
}

/// Full triathlon layout for a fitness-based plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriathlonFitnessSegments {
    pub swim: SwimFitnessTarget,
    pub t1: TransitionTarget,
    pub bike: BikeFitnessTarget,
    pub t2: TransitionTarget,
    pub run: RunFitnessTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessSegments {
    Triathlon(TriathlonFitnessSegments),
    Run(RunFitnessTarget),
}

/// Swim allotment for a target-time plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwimTimeTarget {
    pub distance_miles: f64,
    pub target_time_seconds: f64,
    /// Seconds per 100 yd
    pub required_pace_seconds: f64,
}

/// Bike allotment for a target-time plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BikeTimeTarget {
    pub distance_miles: f64,
    pub target_time_seconds: f64,
    /// One decimal place
    pub required_speed_mph: Decimal,
}

/// Run allotment for a target-time plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunTimeTarget {
    pub distance_miles: f64,
    pub target_time_seconds: f64,
    /// Seconds per mile
    pub required_pace_seconds: f64,
}

impl RunTimeTarget {
    pub fn required_pace(&self) -> String {
        seconds_to_pace(self.required_pace_seconds)
    }
}

/// Full triathlon layout for a target-time plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriathlonTimeSegments {
    pub swim: SwimTimeTarget,
    pub t1: TransitionTarget,
    pub bike: BikeTimeTarget,
    pub t2: TransitionTarget,
    pub run: RunTimeTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSegments {
    Triathlon(TriathlonTimeSegments),
    Run(RunTimeTarget),
}

/// Race, athlete and narrative context shared by both plan kinds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanContext {
    pub race_type: RaceType,
    pub category: RaceCategory,
    pub age: u32,
    pub gender: Gender,
    pub race_weight_lbs: f64,
    pub athlete_level: Option<AthleteLevel>,
    pub heart_rate: HeartRateMetrics,
    pub zones: PacingZones,
    pub strategy: RaceStrategy,
}

/// Plan produced from current fitness metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitnessPlan {
    pub context: PlanContext,
    pub thresholds: ThresholdMetrics,
    pub segments: FitnessSegments,
    pub total_time_seconds: f64,
}

/// Plan produced from a desired finish time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetPlan {
    pub context: PlanContext,
    pub target_time_seconds: u32,
    pub segments: TargetSegments,
}

/// Output aggregate of the pacing engine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "approach", rename_all = "snake_case")]
pub enum PacingPlan {
    Fitness(FitnessPlan),
    Target(TargetPlan),
}

impl PacingPlan {
    pub fn context(&self) -> &PlanContext {
        match self {
            PacingPlan::Fitness(plan) => &plan.context,
            PacingPlan::Target(plan) => &plan.context,
        }
    }

    /// Total race time in seconds, transitions included
    pub fn total_time_seconds(&self) -> f64 {
        match self {
            PacingPlan::Fitness(plan) => plan.total_time_seconds,
            PacingPlan::Target(plan) => plan.target_time_seconds as f64,
        }
    }

    pub fn total_time(&self) -> String {
        seconds_to_time(self.total_time_seconds())
    }
}
