//! Steady-state bike speed from power
//!
//! Flat, windless road model: power at the wheel balances rolling
//! resistance, gravity and aerodynamic drag,
//!
//! `P * (1 - loss) = (F_roll + F_grav + 0.5 * CdA * rho * v²) * v`
//!
//! which is a cubic in `v` solved in closed form with Cardano's method.

use crate::catalog::RaceType;

/// Air density at sea level, 20°C (kg/m³)
pub const AIR_DENSITY: f64 = 1.225;
/// Standard gravity (m/s²)
pub const GRAVITY: f64 = 9.8067;
/// Rolling resistance coefficient for good road tires
pub const DEFAULT_CRR: f64 = 0.004;
/// Tri bike plus race gear (kg)
pub const EQUIPMENT_MASS_KG: f64 = 9.0;
/// Fraction of power lost in the drivetrain
pub const DRIVETRAIN_LOSS: f64 = 0.02;
/// Pounds per kilogram
pub const LBS_PER_KG: f64 = 2.205;
/// Miles per hour per metre per second
pub const MS_TO_MPH: f64 = 2.237;

/// Physics model for converting sustained power into road speed
#[derive(Debug, Clone, PartialEq)]
pub struct BikeSpeedSolver {
    /// Rider mass in kilograms
    pub rider_mass_kg: f64,
    /// Bike and gear mass in kilograms
    pub equipment_mass_kg: f64,
    /// Drag coefficient times frontal area (m²)
    pub cda: f64,
    pub crr: f64,
    /// Road grade in percent
    pub grade_percent: f64,
    /// Headwind in m/s
    pub headwind_ms: f64,
}

impl BikeSpeedSolver {
    /// Race-day model for a rider weight in pounds and the race's drag area
    pub fn for_race(rider_weight_lbs: f64, race: RaceType) -> Self {
        Self {
            rider_mass_kg: rider_weight_lbs / LBS_PER_KG,
            equipment_mass_kg: EQUIPMENT_MASS_KG,
            cda: race.cda(),
            crr: DEFAULT_CRR,
            grade_percent: 0.0,
            headwind_ms: 0.0,
        }
    }

    /// Total system mass (rider + equipment)
    pub fn total_mass_kg(&self) -> f64 {
        self.rider_mass_kg + self.equipment_mass_kg
    }

    /// Cubic coefficients `(a, b, c, d)` of `a v³ + b v² + c v + d = 0`
    pub fn coefficients(&self, power_watts: f64) -> (f64, f64, f64, f64) {
        let effective_power = power_watts * (1.0 - DRIVETRAIN_LOSS);
        let grade = (self.grade_percent / 100.0).atan();

        let a = 0.5 * self.cda * AIR_DENSITY;
        let b = self.headwind_ms * self.cda * AIR_DENSITY;
        let c = GRAVITY * self.total_mass_kg() * (grade.sin() + self.crr * grade.cos());
        let d = -effective_power;

        (a, b, c, d)
    }

    /// Solve for speed in m/s, clamped to be non-negative
    pub fn speed_ms(&self, power_watts: f64) -> f64 {
        let (a, b, c, d) = self.coefficients(power_watts);
        solve_cubic(a, b, c, d).max(0.0)
    }

    /// Solve for speed in mph, clamped to be non-negative
    pub fn speed_mph(&self, power_watts: f64) -> f64 {
        (self.speed_ms(power_watts) * MS_TO_MPH).max(0.0)
    }
}

/// Real root of `a v³ + b v² + c v + d = 0` by Cardano's method
///
/// With a non-negative discriminant the single real root comes from the cube
/// roots of `R ± √D`. With three real roots the trigonometric form returns
/// the largest one.
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> f64 {
    let q = (3.0 * a * c - b * b) / (9.0 * a * a);
    let r = (9.0 * a * b * c - 27.0 * a * a * d - 2.0 * b * b * b) / (54.0 * a * a * a);
    let discriminant = q * q * q + r * r;
    let shift = b / (3.0 * a);

    if discriminant >= 0.0 {
        let sqrt_d = discriminant.sqrt();
        let s = (r + sqrt_d).cbrt();
        let t = (r - sqrt_d).cbrt();
        s + t - shift
    } else {
        let theta = (r / (-q * q * q).sqrt()).acos();
        2.0 * (-q).sqrt() * (theta / 3.0).cos() - shift
    }
}
