//! # Allowable Stress Interpolation
//!
//! Allowable stress curves are published as one value per fixed temperature
//! step. Bolting and plate materials use different step tables; a curve is
//! aligned to the table of its [`MaterialFamily`].
//!
//! Absent entries ("no published value at that step") are read as follows:
//!
//! - below the first step the first entry is used, with an absent entry read as 0
//! - above the last step the last *defined* entry is used
//! - between steps the lower bracket reads absent as 0 and the upper bracket
//!   carries the lower value forward
//!
//! A curve with leading absences therefore interpolates from 0 at the lowest
//! step.

use serde::{Deserialize, Serialize};

/// Temperature steps (°C) for bolting material curves
pub const BOLT_TEMP_STEPS_C: [f64; 14] = [
    40.0, 100.0, 150.0, 200.0, 250.0, 300.0, 325.0, 350.0, 375.0, 400.0, 425.0, 450.0, 475.0, 500.0,
];

/// Temperature steps (°C) for plate/forging material curves
pub const PLATE_TEMP_STEPS_C: [f64; 18] = [
    40.0, 65.0, 100.0, 125.0, 150.0, 200.0, 250.0, 300.0, 325.0, 350.0, 375.0, 400.0, 425.0, 450.0,
    475.0, 500.0, 525.0, 550.0,
];

/// Step at which the ambient (gasket seating) allowable is read
pub const AMBIENT_STEP_C: f64 = 40.0;

/// Ambient allowable used when a curve has no value at the ambient step (MPa)
pub const DEFAULT_AMBIENT_STRESS_MPA: f64 = 138.0;

/// Material family, selecting the temperature step table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MaterialFamily {
    #[default]
    Bolt,
    Plate,
}

impl MaterialFamily {
    /// Temperature step table for this family
    pub fn temperature_steps(&self) -> &'static [f64] {
        match self {
            MaterialFamily::Bolt => &BOLT_TEMP_STEPS_C,
            MaterialFamily::Plate => &PLATE_TEMP_STEPS_C,
        }
    }
}

/// Interpolate an allowable stress curve at `temp_c`.
///
/// `values` and `steps` are matched index by index; if their lengths differ
/// only the common prefix is used. Returns 0 for an empty curve.
pub fn interpolate(temp_c: f64, values: &[Option<f64>], steps: &[f64]) -> f64 {
    let len = values.len().min(steps.len());
    if len == 0 {
        return 0.0;
    }
    let values = &values[..len];
    let steps = &steps[..len];

    if temp_c <= steps[0] {
        return values[0].unwrap_or(0.0);
    }
    if temp_c >= steps[len - 1] {
        return values.iter().rev().find_map(|v| *v).unwrap_or(0.0);
    }

    for i in 0..len - 1 {
        let (t1, t2) = (steps[i], steps[i + 1]);
        if temp_c >= t1 && temp_c <= t2 {
            let s1 = values[i].unwrap_or(0.0);
            let s2 = values[i + 1].unwrap_or(s1);
            if t2 <= t1 {
                return s1;
            }
            return s1 + (s2 - s1) * (temp_c - t1) / (t2 - t1);
        }
    }

    // Unreachable for a strictly increasing step table
    values[len - 1].unwrap_or(0.0)
}

/// Allowable stress at the ambient step, or [`DEFAULT_AMBIENT_STRESS_MPA`]
/// when the curve has no value there.
pub fn ambient_stress(values: &[Option<f64>], steps: &[f64]) -> f64 {
    steps
        .iter()
        .position(|&t| t == AMBIENT_STEP_C)
        .and_then(|i| values.get(i).copied().flatten())
        .unwrap_or(DEFAULT_AMBIENT_STRESS_MPA)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn increasing_curve_is_monotone(
            base in 50.0_f64..200.0,
            deltas in prop::collection::vec(0.1_f64..20.0, BOLT_TEMP_STEPS_C.len() - 1),
            t_a in 0.0_f64..600.0,
            t_b in 0.0_f64..600.0,
        ) {
            let mut curve = vec![Some(base)];
            let mut acc = base;
            for d in deltas {
                acc += d;
                curve.push(Some(acc));
            }
            let (lo, hi) = if t_a <= t_b { (t_a, t_b) } else { (t_b, t_a) };
            let s_lo = interpolate(lo, &curve, &BOLT_TEMP_STEPS_C);
            let s_hi = interpolate(hi, &curve, &BOLT_TEMP_STEPS_C);
            prop_assert!(s_lo <= s_hi + 1e-9);

            let first = curve[0].unwrap();
            let last = curve[curve.len() - 1].unwrap();
            prop_assert!(s_lo >= first - 1e-9 && s_hi <= last + 1e-9);
            if lo <= BOLT_TEMP_STEPS_C[0] {
                prop_assert_eq!(s_lo, first);
            }
            if hi >= BOLT_TEMP_STEPS_C[BOLT_TEMP_STEPS_C.len() - 1] {
                prop_assert_eq!(s_hi, last);
            }
        }
    }
}
