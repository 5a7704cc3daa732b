//! # Flange Geometry
//!
//! Resolves the bolt circle diameter, gasket geometry and flange OD.
//!
//! ## Bolt Circle Methods
//!
//! Three independent lower bounds on the BCD are computed and the largest one
//! governs, so the chosen BCD satisfies all three rules at once:
//!
//! 1. **Pitch**: enough circumference for `n` bolts at minimum spacing,
//!    `ceil(B·n / π)`
//! 2. **Radial**: clears the hub, `ceil(ID + 2·g1 + 2·R)`
//! 3. **Gasket clearance**: bolt holes clear the gasket OD,
//!    `gasketOD + 2·1.5 + 2·clearance + hole`
//!
//! Method 3 depends on the gasket OD, which itself depends on methods 1 and 2
//! through the BCD-driven seating bound, so the steps run in a fixed order.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::inputs::FlangeDesignInputs;
use super::positive_or_one;
use crate::tables::{BoltSpec, RingStandardSpec, TensioningSpec};
use crate::units::Inches;

/// Fixed allowance between gasket edge and bolt hole edge (mm)
pub const GASKET_EDGE_ALLOWANCE_MM: f64 = 1.5;

/// Which rule set the final bolt circle diameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BcdMethod {
    /// Method 1: minimum bolt spacing
    Pitch,
    /// Method 2: hub and radial distance
    Radial,
    /// Method 3: gasket OD plus clearances
    GasketClearance,
    /// Manually entered BCD
    Manual,
}

impl BcdMethod {
    pub fn display_name(&self) -> &'static str {
        match self {
            BcdMethod::Pitch => "Method 1 (bolt spacing)",
            BcdMethod::Radial => "Method 2 (hub + R)",
            BcdMethod::GasketClearance => "Method 3 (gasket + clearance)",
            BcdMethod::Manual => "Manual",
        }
    }
}

/// Resolved flange and gasket geometry (all lengths in mm)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlangeGeometry {
    /// Minimum bolt spacing actually applied
    pub effective_spacing_mm: f64,

    /// Tensioning spacing was available and considered
    pub tensioning_applied: bool,

    /// Bolt hole diameter, rounded up
    pub bolt_hole_mm: f64,

    pub bcd_method1_mm: f64,
    pub bcd_method2_mm: f64,
    pub bcd_method3_mm: f64,

    /// max(method 1, 2, 3)
    pub bcd_tema_mm: f64,

    /// Rule that produced `final_bcd_mm`
    pub bcd_source: BcdMethod,

    /// BCD used downstream (TEMA value or manual override)
    pub final_bcd_mm: f64,

    /// Flange outside diameter
    pub flange_od_mm: f64,

    pub inner_ring_mm: f64,
    pub outer_ring_mm: f64,

    /// Gasket seating (sealing element) diameters
    pub seating_id_mm: f64,
    pub seating_od_mm: f64,

    /// Overall gasket diameters including rings
    pub gasket_id_mm: f64,
    pub gasket_od_mm: f64,

    /// Bolt pitch on the final BCD
    pub pitch_mm: f64,

    /// Upper pitch bound for this bolt size
    pub max_pitch_mm: f64,

    /// effective spacing ≤ pitch ≤ max pitch
    pub pitch_ok: bool,
}

/// Resolve the flange geometry for one bolting arrangement.
///
/// `hub_thickness_mm` is g1 from the shell sizing step.
pub fn resolve(
    inputs: &FlangeDesignInputs,
    bolt: &BoltSpec,
    tensioning: Option<&TensioningSpec>,
    ring: &RingStandardSpec,
    hub_thickness_mm: f64,
) -> FlangeGeometry {
    let manual = &inputs.manual;
    let count = f64::from(inputs.bolt_count);

    let tensioning_applied = inputs.hydraulic_tensioning && tensioning.is_some();
    let spacing_in = match tensioning {
        Some(t) if inputs.hydraulic_tensioning => bolt.min_spacing_in.max(t.min_spacing_in),
        _ => bolt.min_spacing_in,
    };
    let effective_spacing_mm = Inches(spacing_in).mm();
    let bolt_hole_mm = bolt.hole_size_mm.ceil();

    let bcd_method1_mm = (effective_spacing_mm * count / PI).ceil();
    let bcd_method2_mm = (inputs.inside_diameter_mm
        + 2.0 * hub_thickness_mm
        + 2.0 * bolt.radial_distance_mm())
    .ceil();

    let inner_ring_mm = ring_width(inputs.inner_ring, inputs.inner_ring_width_mm, ring.inner_ring_min_mm);
    let outer_ring_mm = ring_width(inputs.outer_ring, inputs.outer_ring_width_mm, ring.outer_ring_min_mm);

    let seating_width = inputs.gasket_seating_width_mm;
    let bcd_bound = bcd_method1_mm.max(bcd_method2_mm)
        - bolt_hole_mm
        - 2.0 * inputs.bolt_clearance_mm
        - 2.0 * GASKET_EDGE_ALLOWANCE_MM
        - 2.0 * outer_ring_mm;
    let shell_bound = inputs.inside_diameter_mm
        + 2.0 * inputs.shell_gap_mm
        + 2.0 * inner_ring_mm
        + 2.0 * seating_width;
    let auto_seating_od = bcd_bound.max(shell_bound);
    let auto_seating_id = auto_seating_od - 2.0 * seating_width;

    let seating_od_mm = manual.pick(manual.seating_od_mm).unwrap_or(auto_seating_od);
    let seating_id_mm = manual.pick(manual.seating_id_mm).unwrap_or(auto_seating_id);

    let gasket_od_mm = seating_od_mm + 2.0 * outer_ring_mm;
    let gasket_id_mm = seating_id_mm - 2.0 * inner_ring_mm;

    let bcd_method3_mm = gasket_od_mm
        + 2.0 * GASKET_EDGE_ALLOWANCE_MM
        + 2.0 * inputs.bolt_clearance_mm
        + bolt_hole_mm;

    let (bcd_tema_mm, tema_source) = governing_bcd(bcd_method1_mm, bcd_method2_mm, bcd_method3_mm);
    let (final_bcd_mm, bcd_source) = match manual.pick(manual.bcd_mm) {
        Some(bcd) => (bcd, BcdMethod::Manual),
        None => (bcd_tema_mm, tema_source),
    };

    let flange_od_mm = manual
        .pick(manual.flange_od_mm)
        .unwrap_or_else(|| (final_bcd_mm + 2.0 * bolt.edge_distance_mm()).ceil());

    let pitch_mm = PI * final_bcd_mm / positive_or_one(count);
    let max_pitch_mm = bolt.max_pitch_mm();
    let pitch_ok = pitch_mm >= effective_spacing_mm && pitch_mm <= max_pitch_mm;

    FlangeGeometry {
        effective_spacing_mm,
        tensioning_applied,
        bolt_hole_mm,
        bcd_method1_mm,
        bcd_method2_mm,
        bcd_method3_mm,
        bcd_tema_mm,
        bcd_source,
        final_bcd_mm,
        flange_od_mm,
        inner_ring_mm,
        outer_ring_mm,
        seating_id_mm,
        seating_od_mm,
        gasket_id_mm,
        gasket_od_mm,
        pitch_mm,
        max_pitch_mm,
        pitch_ok,
    }
}

/// Ring width: 0 without a ring, the entered width if any, else the standard.
fn ring_width(present: bool, entered_mm: f64, standard_mm: f64) -> f64 {
    if !present {
        0.0
    } else if entered_mm != 0.0 {
        entered_mm
    } else {
        standard_mm
    }
}

/// Largest of the three methods; ties go to the lowest method number.
fn governing_bcd(m1: f64, m2: f64, m3: f64) -> (f64, BcdMethod) {
    let max = m1.max(m2).max(m3);
    let source = if m1 == max {
        BcdMethod::Pitch
    } else if m2 == max {
        BcdMethod::Radial
    } else {
        BcdMethod::GasketClearance
    };
    (max, source)
}
