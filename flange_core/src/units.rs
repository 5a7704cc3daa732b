//! # Units
//!
//! Unit normalization for design inputs plus lightweight newtype wrappers for
//! the conversions the engine performs internally.
//!
//! ## Internal Base Units
//!
//! All calculations run in a consistent SI-ish set:
//! - Pressure and stress: MPa (N/mm²)
//! - Temperature: °C
//! - Length: mm
//! - Force: N
//!
//! Bolt table dimensions (R, B_min, E) are published in inches and gasket
//! seating stresses (y) in psi; [`Inches`] and [`Psi`] convert those at the
//! point of use.
//!
//! ## Example
//!
//! ```rust
//! use flange_core::units::{pressure_to_mpa, temperature_to_celsius, PressureUnit, TemperatureUnit};
//!
//! assert!((pressure_to_mpa(10.0, PressureUnit::Bar) - 1.0).abs() < 1e-12);
//! assert!((temperature_to_celsius(212.0, TemperatureUnit::Fahrenheit) - 100.0).abs() < 1e-12);
//!
//! // Unknown labels are treated as already-SI
//! assert_eq!(PressureUnit::from_label("atm"), PressureUnit::Mpa);
//! ```

use serde::{Deserialize, Serialize};

/// MPa per bar
pub const MPA_PER_BAR: f64 = 0.1;
/// MPa per psi
pub const MPA_PER_PSI: f64 = 0.00689476;
/// MPa per kg/cm²
pub const MPA_PER_KG_CM2: f64 = 0.0980665;
/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

// ============================================================================
// Input Units
// ============================================================================

/// Pressure unit of the design pressure input.
///
/// Serializes as its label (`"MPa"`, `"Bar"`, `"PSI"`, `"kg/cm2"`). Parsing is
/// lenient: any label that is not recognized becomes [`PressureUnit::Mpa`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PressureUnit {
    #[default]
    Mpa,
    Bar,
    Psi,
    KgCm2,
}

impl PressureUnit {
    /// Parse a unit label, falling back to MPa
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "bar" => PressureUnit::Bar,
            "psi" | "psig" => PressureUnit::Psi,
            "kg/cm2" | "kg/cm²" | "kgf/cm2" | "kgcm2" => PressureUnit::KgCm2,
            _ => PressureUnit::Mpa,
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            PressureUnit::Mpa => "MPa",
            PressureUnit::Bar => "Bar",
            PressureUnit::Psi => "PSI",
            PressureUnit::KgCm2 => "kg/cm2",
        }
    }

    /// Multiplier that converts a value in this unit to MPa
    pub fn to_mpa_factor(&self) -> f64 {
        match self {
            PressureUnit::Mpa => 1.0,
            PressureUnit::Bar => MPA_PER_BAR,
            PressureUnit::Psi => MPA_PER_PSI,
            PressureUnit::KgCm2 => MPA_PER_KG_CM2,
        }
    }
}

impl From<String> for PressureUnit {
    fn from(label: String) -> Self {
        PressureUnit::from_label(&label)
    }
}

impl From<PressureUnit> for String {
    fn from(unit: PressureUnit) -> Self {
        unit.label().to_string()
    }
}

impl std::fmt::Display for PressureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Temperature unit of the design temperature input.
///
/// Serializes as `"C"`, `"F"` or `"K"`; unknown labels become Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    /// Parse a unit label, falling back to Celsius
    pub fn from_label(label: &str) -> Self {
        match label.trim().trim_start_matches('°').to_ascii_lowercase().as_str() {
            "f" | "fahrenheit" => TemperatureUnit::Fahrenheit,
            "k" | "kelvin" => TemperatureUnit::Kelvin,
            _ => TemperatureUnit::Celsius,
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "C",
            TemperatureUnit::Fahrenheit => "F",
            TemperatureUnit::Kelvin => "K",
        }
    }
}

impl From<String> for TemperatureUnit {
    fn from(label: String) -> Self {
        TemperatureUnit::from_label(&label)
    }
}

impl From<TemperatureUnit> for String {
    fn from(unit: TemperatureUnit) -> Self {
        unit.label().to_string()
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "°{}", self.label())
    }
}

/// Convert a pressure value to MPa.
pub fn pressure_to_mpa(value: f64, unit: PressureUnit) -> f64 {
    value * unit.to_mpa_factor()
}

/// Convert a temperature value to °C.
pub fn temperature_to_celsius(value: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Celsius => value,
        TemperatureUnit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
        TemperatureUnit::Kelvin => value - 273.15,
    }
}

// ============================================================================
// Length Units
// ============================================================================

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Inches> for Millimeters {
    fn from(inches: Inches) -> Self {
        Millimeters(inches.0 * MM_PER_INCH)
    }
}

impl Inches {
    /// Shorthand for the millimeter value
    pub fn mm(self) -> f64 {
        Millimeters::from(self).0
    }
}

// ============================================================================
// Stress Units
// ============================================================================

/// Stress in pounds per square inch (psi)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Psi(pub f64);

/// Stress in megapascals (N/mm²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mpa(pub f64);

impl From<Psi> for Mpa {
    fn from(psi: Psi) -> Self {
        Mpa(psi.0 * MPA_PER_PSI)
    }
}

impl Psi {
    /// Shorthand for the MPa value
    pub fn mpa(self) -> f64 {
        Mpa::from(self).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_pressure_conversions() {
        assert!(close(pressure_to_mpa(2.5, PressureUnit::Mpa), 2.5));
        assert!(close(pressure_to_mpa(15.0, PressureUnit::Bar), 1.5));
        assert!(close(pressure_to_mpa(100.0, PressureUnit::Psi), 0.689476));
        assert!(close(pressure_to_mpa(10.0, PressureUnit::KgCm2), 0.980665));
    }

    #[test]
    fn test_temperature_conversions() {
        assert!(close(temperature_to_celsius(37.5, TemperatureUnit::Celsius), 37.5));
        assert!(close(temperature_to_celsius(32.0, TemperatureUnit::Fahrenheit), 0.0));
        assert!(close(temperature_to_celsius(-40.0, TemperatureUnit::Fahrenheit), -40.0));
        assert!(close(temperature_to_celsius(373.15, TemperatureUnit::Kelvin), 100.0));
    }

    #[test]
    fn test_unknown_labels_fall_back_to_si() {
        assert_eq!(PressureUnit::from_label("atm"), PressureUnit::Mpa);
        assert_eq!(PressureUnit::from_label(""), PressureUnit::Mpa);
        assert_eq!(TemperatureUnit::from_label("Rankine"), TemperatureUnit::Celsius);
        assert!(close(pressure_to_mpa(3.0, PressureUnit::from_label("torr")), 3.0));
    }

    #[test]
    fn test_label_parsing() {
        assert_eq!(PressureUnit::from_label("BAR"), PressureUnit::Bar);
        assert_eq!(PressureUnit::from_label("psi"), PressureUnit::Psi);
        assert_eq!(PressureUnit::from_label("kg/cm2"), PressureUnit::KgCm2);
        assert_eq!(TemperatureUnit::from_label("°F"), TemperatureUnit::Fahrenheit);
        assert_eq!(TemperatureUnit::from_label("K"), TemperatureUnit::Kelvin);
    }

    #[test]
    fn test_unit_serialization() {
        let json = serde_json::to_string(&PressureUnit::KgCm2).unwrap();
        assert_eq!(json, "\"kg/cm2\"");
        let unit: PressureUnit = serde_json::from_str("\"whatever\"").unwrap();
        assert_eq!(unit, PressureUnit::Mpa);
        let unit: TemperatureUnit = serde_json::from_str("\"F\"").unwrap();
        assert_eq!(unit, TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn test_length_and_stress_newtypes() {
        assert!(close(Inches(0.75).mm(), 19.05));
        assert_eq!(Millimeters::from(Inches(2.0)), Millimeters(50.8));
        assert!(close(Psi(10_000.0).mpa(), 68.9476));
        assert_eq!(Mpa::from(Psi(0.0)), Mpa(0.0));
    }
}
