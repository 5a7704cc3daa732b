//! # Shell Sizing
//!
//! Required shell wall under internal pressure (circumferential stress,
//! ASME VIII-1 UG-27(c)(1)), the nominal thickness g0 it rounds up to, the hub
//! thickness g1 used by the radial BCD method, and the hoop stress in the
//! corroded nominal wall.

use serde::{Deserialize, Serialize};

use super::positive_or_one;

/// Shell wall results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellSizing {
    /// Shell allowable stress at design temperature (MPa)
    pub allowable_stress_mpa: f64,

    /// Pressure thickness t = P·R / (S·E − 0.6P) (mm)
    pub required_thickness_mm: f64,

    /// Nominal thickness g0 = ceil(t + CA) (mm)
    pub nominal_thickness_mm: f64,

    /// Hub thickness g1 at the flange (mm)
    pub hub_thickness_mm: f64,

    /// Hoop stress in the corroded nominal wall (MPa)
    pub hoop_stress_mpa: f64,
}

/// Size the shell wall.
///
/// `manual_hub_mm` replaces g1 when present; otherwise g1 = g0.
pub fn size_shell(
    pressure_mpa: f64,
    inside_diameter_mm: f64,
    corrosion_allowance_mm: f64,
    joint_efficiency: f64,
    allowable_stress_mpa: f64,
    manual_hub_mm: Option<f64>,
) -> ShellSizing {
    let radius = inside_diameter_mm / 2.0;

    let denominator = positive_or_one(allowable_stress_mpa * joint_efficiency - 0.6 * pressure_mpa);
    let required_thickness_mm = pressure_mpa * radius / denominator;
    let nominal_thickness_mm = (required_thickness_mm + corrosion_allowance_mm).ceil();
    let hub_thickness_mm = manual_hub_mm.unwrap_or(nominal_thickness_mm);

    let corroded_wall = nominal_thickness_mm - corrosion_allowance_mm;
    let corroded_radius = radius + corrosion_allowance_mm;
    let hoop_stress_mpa = pressure_mpa * (corroded_radius + 0.6 * corroded_wall)
        / positive_or_one(joint_efficiency * corroded_wall);

    ShellSizing {
        allowable_stress_mpa,
        required_thickness_mm,
        nominal_thickness_mm,
        hub_thickness_mm,
        hoop_stress_mpa,
    }
}
