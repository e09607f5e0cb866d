//! Pace, time and distance conversion utilities
//!
//! Paces are strings like `7:05` (minutes:seconds per unit), times are
//! `H:MM:SS` or `M:SS`. All distances inside the engine are in miles.

use crate::error::{FormatError, Result};
use serde::{Deserialize, Serialize};

/// Yards in one statute mile
pub const YARDS_PER_MILE: f64 = 1760.0;

/// Supported distance units for caller-supplied segment distances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceUnit {
    #[serde(rename = "mi")]
    Miles,
    #[serde(rename = "km")]
    Kilometers,
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "yd")]
    Yards,
}

impl DistanceUnit {
    /// Parse a unit label (`mi`, `km`, `m`, `yd`). Returns `None` for anything else.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "mi" => Some(DistanceUnit::Miles),
            "km" => Some(DistanceUnit::Kilometers),
            "m" => Some(DistanceUnit::Meters),
            "yd" => Some(DistanceUnit::Yards),
            _ => None,
        }
    }

    /// Miles per one of this unit
    pub fn miles_factor(&self) -> f64 {
        match self {
            DistanceUnit::Miles => 1.0,
            DistanceUnit::Kilometers => 0.621371,
            DistanceUnit::Meters => 0.000621371,
            DistanceUnit::Yards => 0.000568182,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DistanceUnit::Miles => "mi",
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Meters => "m",
            DistanceUnit::Yards => "yd",
        }
    }
}

/// Parse a `M:SS` pace into total seconds
pub fn pace_to_seconds(pace: &str) -> Result<u32> {
    let parts: Vec<&str> = pace.trim().split(':').collect();
    let invalid = || FormatError::InvalidPace {
        input: pace.to_string(),
    };

    if parts.len() != 2 {
        return Err(invalid().into());
    }

    let minutes = parse_component(parts[0]).ok_or_else(invalid)?;
    let seconds = parse_component(parts[1]).ok_or_else(invalid)?;

    Ok(sum_components(&[minutes, seconds]).ok_or_else(invalid)?)
}

/// Format seconds as `M:SS`, carrying a rounded 60 into the minutes
pub fn seconds_to_pace(seconds: f64) -> String {
    let mut minutes = (seconds / 60.0).floor() as i64;
    let mut secs = seconds.rem_euclid(60.0).round() as i64;

    if secs == 60 {
        minutes += 1;
        secs = 0;
    }

    format!("{}:{:02}", minutes, secs)
}

/// Parse a `H:MM:SS` or `M:SS` time into total seconds
pub fn time_to_seconds(time: &str) -> Result<u32> {
    let invalid = || FormatError::InvalidTime {
        input: time.to_string(),
    };

    let components = time
        .trim()
        .split(':')
        .map(parse_component)
        .collect::<Option<Vec<u32>>>()
        .ok_or_else(invalid)?;

    match components.len() {
        2 | 3 => Ok(sum_components(&components).ok_or_else(invalid)?),
        _ => Err(invalid().into()),
    }
}

/// Format seconds as `H:MM:SS`, or `M:SS` when under an hour
pub fn seconds_to_time(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Convert a distance to miles. Unknown unit labels pass the value through.
pub fn convert_to_miles(value: f64, unit: &str) -> f64 {
    match DistanceUnit::from_label(unit) {
        Some(unit) => value * unit.miles_factor(),
        None => value,
    }
}

/// Fold base-60 components (most significant first) into seconds,
/// `None` on overflow
fn sum_components(components: &[u32]) -> Option<u32> {
    components
        .iter()
        .try_fold(0u32, |total, &part| total.checked_mul(60)?.checked_add(part))
}

fn parse_component(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}
