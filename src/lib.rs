// Library interface for racepace modules
// This allows integration tests and benches to access the core functionality

pub mod bike_speed;
pub mod catalog;
pub mod config;
pub mod conversion;
pub mod error;
pub mod logging;
pub mod models;
pub mod pacing;
pub mod physiology;
pub mod what_if;

// Re-export commonly used types for convenience
pub use models::*;
pub use bike_speed::BikeSpeedSolver;
pub use catalog::{PacingZones, RaceCategory, RaceDefinition, RaceStrategy, RaceType};
pub use pacing::PacingCalculator;
pub use physiology::PhysiologyEstimator;
pub use what_if::{WhatIfBreakdown, WhatIfOverrides, WhatIfRecalculator};
pub use error::{FormatError, RacePaceError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
