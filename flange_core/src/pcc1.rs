//! # PCC-1 Assembly Bolt Stress Check
//!
//! Selects an assembly bolt stress Sb_sel and verifies it against four
//! limits (ASME PCC-1 Appendix O, steps 5 through 8):
//!
//! | Step | Limit | Passes when |
//! |------|-------|-------------|
//! | 5 | gasket seating, SgMinS·Ag/Ab | Sb_sel ≥ limit |
//! | 6 | operating gasket stress after relaxation | Sb_sel ≥ limit |
//! | 7 | gasket crush, SgMax·Ag/Ab | Sb_sel ≤ limit |
//! | 8 | flange rotation, SfMax·φG/φF | Sb_sel ≤ limit |
//!
//! Sb_sel starts at SgT·Ag/Ab and is clamped, in order, to ≤ SbMax, ≥ SbMin
//! and ≤ SfMax. The order is kept even when SbMin > SbMax; such inputs are
//! not rejected.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::{positive_or_one, CalculationResult, FlangeDesignInputs};

/// Slack applied to every threshold comparison (MPa)
pub const STRESS_TOLERANCE_MPA: f64 = 0.001;

/// One threshold comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pcc1Step {
    /// Threshold bolt stress (MPa)
    pub threshold_mpa: f64,
    pub pass: bool,
}

impl Pcc1Step {
    fn at_least(selected: f64, threshold_mpa: f64) -> Self {
        Pcc1Step {
            threshold_mpa,
            pass: selected >= threshold_mpa - STRESS_TOLERANCE_MPA,
        }
    }

    fn at_most(selected: f64, threshold_mpa: f64) -> Self {
        Pcc1Step {
            threshold_mpa,
            pass: selected <= threshold_mpa + STRESS_TOLERANCE_MPA,
        }
    }

    fn unbounded(threshold_mpa: f64) -> Self {
        Pcc1Step {
            threshold_mpa,
            pass: true,
        }
    }
}

/// PCC-1 verdict with the intermediate values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pcc1Check {
    /// Total bolt root area Ab (mm²)
    pub root_area_mm2: f64,

    /// Gasket area Ag incl. the counted share of pass-partition ribs (mm²)
    pub gasket_area_mm2: f64,

    /// SgT·Ag/Ab before clamping (MPa)
    pub initial_bolt_stress_mpa: f64,

    /// Selected assembly bolt stress Sb_sel (MPa)
    pub selected_bolt_stress_mpa: f64,

    pub step5_seating: Pcc1Step,
    pub step6_operating: Pcc1Step,
    pub step7_gasket_crush: Pcc1Step,
    pub step8_flange_rotation: Pcc1Step,

    /// All four steps pass
    pub pass: bool,
}

impl Pcc1Check {
    /// Steps in order with their labels, for reporting
    pub fn steps(&self) -> [(&'static str, &Pcc1Step); 4] {
        [
            ("Step 5 (gasket seating)", &self.step5_seating),
            ("Step 6 (operating gasket stress)", &self.step6_operating),
            ("Step 7 (gasket crush)", &self.step7_gasket_crush),
            ("Step 8 (flange rotation)", &self.step8_flange_rotation),
        ]
    }
}

/// Apply the three one-sided clamps in their fixed order.
pub fn select_bolt_stress(initial_mpa: f64, sb_max: f64, sb_min: f64, sf_max: f64) -> f64 {
    initial_mpa.min(sb_max).max(sb_min).min(sf_max)
}

/// Run the PCC-1 check against an evaluated design.
pub fn check_pcc1(inputs: &FlangeDesignInputs, result: &CalculationResult) -> Pcc1Check {
    let p = &inputs.pcc1;
    let geo = &result.geometry;

    let root_area_mm2 = result.loads.single_bolt_area_mm2 * f64::from(result.bolt_count);
    let ring_area = PI / 4.0 * (geo.seating_od_mm.powi(2) - geo.seating_id_mm.powi(2));
    let pass_area = p.pass_partition_reduction_pct / 100.0
        * inputs.pass_partition_width_mm
        * inputs.pass_partition_length_mm;
    let gasket_area_mm2 = ring_area + pass_area;

    let area_ratio = gasket_area_mm2 / positive_or_one(root_area_mm2);
    let initial_bolt_stress_mpa = p.target_gasket_stress_mpa * area_ratio;
    let selected = select_bolt_stress(
        initial_bolt_stress_mpa,
        p.max_bolt_stress_mpa,
        p.min_bolt_stress_mpa,
        p.max_flange_stress_mpa,
    );

    let step5_seating = Pcc1Step::at_least(selected, p.min_seating_stress_mpa * area_ratio);

    let pressure_load = PI / 4.0 * result.pressure_mpa * geo.seating_id_mm.powi(2);
    let step6_operating = Pcc1Step::at_least(
        selected,
        (p.min_operating_stress_mpa * gasket_area_mm2 + pressure_load)
            / positive_or_one(p.gasket_load_fraction * root_area_mm2),
    );

    let crush = p.max_gasket_stress_mpa * area_ratio;
    let step7_gasket_crush = if p.max_gasket_stress_mpa == 0.0 {
        Pcc1Step::unbounded(crush)
    } else {
        Pcc1Step::at_most(selected, crush)
    };

    let step8_flange_rotation = if p.max_flange_rotation_deg == 0.0 {
        Pcc1Step::unbounded(0.0)
    } else {
        Pcc1Step::at_most(
            selected,
            p.max_flange_stress_mpa * (p.max_gasket_rotation_deg / p.max_flange_rotation_deg),
        )
    };

    let pass = step5_seating.pass
        && step6_operating.pass
        && step7_gasket_crush.pass
        && step8_flange_rotation.pass;

    debug!(
        selected_mpa = selected,
        step5 = step5_seating.pass,
        step6 = step6_operating.pass,
        step7 = step7_gasket_crush.pass,
        step8 = step8_flange_rotation.pass,
        "PCC-1 check"
    );

    Pcc1Check {
        root_area_mm2,
        gasket_area_mm2,
        initial_bolt_stress_mpa,
        selected_bolt_stress_mpa: selected,
        step5_seating,
        step6_operating,
        step7_gasket_crush,
        step8_flange_rotation,
        pass,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn selected_stress_within_limits(
            initial in 0.0f64..5000.0,
            sb_min in 0.0f64..600.0,
            span in 0.0f64..600.0,
            headroom in 0.0f64..600.0,
        ) {
            let sb_max = sb_min + span;
            let sf_max = sb_max + headroom;
            let selected = select_bolt_stress(initial, sb_max, sb_min, sf_max);
            prop_assert!(selected >= sb_min);
            prop_assert!(selected <= sb_max);
            prop_assert!(selected <= sf_max);
        }
    }
}
