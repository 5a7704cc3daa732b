//! # Bolt Load Balance
//!
//! Required bolt loads per ASME VIII-1 Appendix 2 and the available bolt
//! capacity they are compared against.
//!
//! - **Operating**: Wm1 = H + Hp, hydrostatic end force plus the gasket
//!   reaction needed to keep the joint tight (m·P on the effective area)
//! - **Seating**: Wm2 = π·b·G·y, the load that seats the gasket at ambient
//!
//! Pass-partition ribs add their own m and y terms over `width × length`.
//!
//! Forces are in N, areas in mm², stresses in MPa.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::inputs::FacingSketch;
use super::positive_or_one;
use crate::units::{Psi, MM_PER_INCH};

/// b₀ above which the effective width narrows with √b₀ (mm)
pub const NARROWING_THRESHOLD_MM: f64 = 6.0;

/// Gasket factors feeding the load balance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasketLoading {
    /// Main gasket m
    pub m: f64,
    /// Main gasket y (psi)
    pub y_psi: f64,
    /// Pass-partition gasket m
    pub pass_m: f64,
    /// Pass-partition gasket y (psi)
    pub pass_y_psi: f64,
    /// Pass-partition rib width (mm)
    pub pass_width_mm: f64,
    /// Total pass-partition rib length (mm)
    pub pass_length_mm: f64,
}

impl GasketLoading {
    /// Pass-partition rib contact area (mm²)
    pub fn pass_area_mm2(&self) -> f64 {
        self.pass_width_mm * self.pass_length_mm
    }
}

/// Bolting capacity inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoltCapacity {
    /// Tensile stress area of one bolt (mm²)
    pub single_area_mm2: f64,
    /// Number of bolts
    pub count: u32,
    /// Bolt allowable at ambient (MPa)
    pub ambient_stress_mpa: f64,
    /// Bolt allowable at design temperature (MPa)
    pub design_stress_mpa: f64,
}

/// Bolt load balance results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadBalance {
    /// Gasket contact width N (mm)
    pub contact_width_mm: f64,
    /// Basic seating width b₀ (mm)
    pub basic_width_mm: f64,
    /// Effective seating width b (mm)
    pub effective_width_mm: f64,
    /// Diameter of gasket load reaction G (mm)
    pub gasket_diameter_mm: f64,

    /// Hydrostatic end force H (N)
    pub hydrostatic_end_force_n: f64,
    /// Gasket reaction Hp (N)
    pub gasket_reaction_n: f64,
    /// Operating bolt load Wm1 = H + Hp (N)
    pub wm1_n: f64,
    /// Seating bolt load Wm2 (N)
    pub wm2_n: f64,

    /// Bolt allowable at ambient (MPa)
    pub ambient_stress_mpa: f64,
    /// Bolt allowable at design temperature (MPa)
    pub design_stress_mpa: f64,

    /// Tensile area of one bolt (mm²)
    pub single_bolt_area_mm2: f64,
    /// Total bolt area Ab (mm²)
    pub total_bolt_area_mm2: f64,
    /// Wm1 / design allowable (mm²)
    pub required_area_operating_mm2: f64,
    /// Wm2 / ambient allowable (mm²)
    pub required_area_seating_mm2: f64,
    /// Governing required bolt area Am (mm²)
    pub required_area_mm2: f64,

    /// max(Wm1, Wm2) (N)
    pub required_load_n: f64,
    /// Ab × design allowable (N)
    pub available_load_n: f64,
    /// (available − required) / required × 100
    pub margin_pct: f64,
    /// available ≥ required
    pub is_safe: bool,
}

/// Effective seating width b and gasket load diameter G for a seating
/// element spanning `seating_id_mm`..`seating_od_mm`.
///
/// Returns `(N, b₀, b, G)`.
pub fn effective_gasket(
    seating_id_mm: f64,
    seating_od_mm: f64,
    facing: FacingSketch,
) -> (f64, f64, f64, f64) {
    let contact_width = (seating_od_mm - seating_id_mm) / 2.0;
    let basic_width = contact_width / facing.seating_width_divisor();

    if basic_width <= NARROWING_THRESHOLD_MM {
        let g = (seating_id_mm + seating_od_mm) / 2.0;
        (contact_width, basic_width, basic_width, g)
    } else {
        let b = 0.5 * MM_PER_INCH * (basic_width / MM_PER_INCH).sqrt();
        (contact_width, basic_width, b, seating_od_mm - 2.0 * b)
    }
}

/// Compute the operating/seating load balance.
pub fn balance(
    pressure_mpa: f64,
    seating_id_mm: f64,
    seating_od_mm: f64,
    facing: FacingSketch,
    gasket: &GasketLoading,
    bolts: &BoltCapacity,
) -> LoadBalance {
    let (contact_width_mm, basic_width_mm, b, g) =
        effective_gasket(seating_id_mm, seating_od_mm, facing);
    let pass_area = gasket.pass_area_mm2();

    let hydrostatic_end_force_n = 0.785 * g * g * pressure_mpa;
    let gasket_reaction_n = 2.0 * pressure_mpa * (b * PI * g * gasket.m + pass_area * gasket.pass_m);
    let wm1_n = hydrostatic_end_force_n + gasket_reaction_n;
    let wm2_n = PI * b * g * Psi(gasket.y_psi).mpa() + pass_area * Psi(gasket.pass_y_psi).mpa();

    let total_bolt_area_mm2 = bolts.single_area_mm2 * f64::from(bolts.count);
    let required_area_operating_mm2 = wm1_n / positive_or_one(bolts.design_stress_mpa);
    let required_area_seating_mm2 = wm2_n / positive_or_one(bolts.ambient_stress_mpa);
    let required_area_mm2 = required_area_operating_mm2.max(required_area_seating_mm2);

    let required_load_n = wm1_n.max(wm2_n);
    let available_load_n = total_bolt_area_mm2 * bolts.design_stress_mpa;
    let margin_pct = (available_load_n - required_load_n) / positive_or_one(required_load_n) * 100.0;

    LoadBalance {
        contact_width_mm,
        basic_width_mm,
        effective_width_mm: b,
        gasket_diameter_mm: g,
        hydrostatic_end_force_n,
        gasket_reaction_n,
        wm1_n,
        wm2_n,
        ambient_stress_mpa: bolts.ambient_stress_mpa,
        design_stress_mpa: bolts.design_stress_mpa,
        single_bolt_area_mm2: bolts.single_area_mm2,
        total_bolt_area_mm2,
        required_area_operating_mm2,
        required_area_seating_mm2,
        required_area_mm2,
        required_load_n,
        available_load_n,
        margin_pct,
        is_safe: available_load_n >= required_load_n,
    }
}
