//! # Flange Calculations
//!
//! One evaluation runs, in order:
//!
//! - [`shell`] - shell/hub thickness feeding the radial BCD method
//! - [`geometry`] - three BCD methods, gasket geometry, flange OD, pitch
//! - [`load_balance`] - Wm1/Wm2, bolt areas, available load and margin
//!
//! [`evaluate`] is a pure function of the inputs and a table snapshot. It
//! never fails: unknown table keys fall back to the first entry (recorded in
//! [`CalculationResult::fallbacks`]) and degenerate denominators read as 1.
//!
//! ## Example
//!
//! ```rust
//! use flange_core::calculations::{evaluate, FlangeDesignInputs};
//! use flange_core::tables::ReferenceTables;
//!
//! let inputs = FlangeDesignInputs::default();
//! let result = evaluate(&inputs, ReferenceTables::standard());
//!
//! assert_eq!(result.geometry.final_bcd_mm, 1103.0);
//! assert!(result.loads.is_safe);
//! ```

pub mod geometry;
pub mod inputs;
pub mod load_balance;
pub mod shell;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use geometry::{BcdMethod, FlangeGeometry};
pub use inputs::{FacingSketch, FlangeDesignInputs, ManualOverrides, Pcc1Inputs};
pub use load_balance::{BoltCapacity, GasketLoading, LoadBalance};
pub use shell::ShellSizing;

use crate::pcc1::{self, Pcc1Check};
use crate::tables::{Lookup, ReferenceTables, TableFallback, TableKind};

/// Replace a zero or negative denominator with 1.
pub(crate) fn positive_or_one(value: f64) -> f64 {
    if value > 0.0 {
        value
    } else {
        1.0
    }
}

/// Full result of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Design pressure (MPa)
    pub pressure_mpa: f64,

    /// Design temperature (°C)
    pub temperature_c: f64,

    /// Bolt size actually evaluated (after any table fallback)
    pub bolt_size: String,

    /// Number of bolts
    pub bolt_count: u32,

    pub shell: ShellSizing,
    pub geometry: FlangeGeometry,
    pub loads: LoadBalance,

    /// Table lookups that fell back to the first entry
    pub fallbacks: Vec<TableFallback>,
}

impl CalculationResult {
    /// Bolting carries the required load and the pitch is within bounds
    pub fn passes(&self) -> bool {
        self.loads.is_safe && self.geometry.pitch_ok
    }

    /// Whether a lookup against `table` fell back to the default entry
    pub fn used_default(&self, table: TableKind) -> bool {
        self.fallbacks.iter().any(|f| f.table == table)
    }
}

/// Evaluation result with the PCC-1 verdict attached when enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignReport {
    pub result: CalculationResult,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcc1: Option<Pcc1Check>,
}

impl DesignReport {
    /// Bolting passes and, when requested, so does PCC-1
    pub fn passes(&self) -> bool {
        self.result.passes() && self.pcc1.as_ref().map_or(true, |c| c.pass)
    }
}

/// Evaluate one flange design against a reference table snapshot.
pub fn evaluate(inputs: &FlangeDesignInputs, tables: &ReferenceTables) -> CalculationResult {
    let pressure_mpa = inputs.pressure_mpa();
    let temperature_c = inputs.temperature_c();
    let manual = &inputs.manual;
    let mut fallbacks = Vec::new();

    let shell_material = resolve(
        &mut fallbacks,
        TableKind::Material,
        &inputs.shell_material,
        tables.material(&inputs.shell_material),
        |m| &m.id,
    );
    let bolt_material = resolve(
        &mut fallbacks,
        TableKind::Material,
        &inputs.bolt_material,
        tables.material(&inputs.bolt_material),
        |m| &m.id,
    );
    let bolt = resolve(
        &mut fallbacks,
        TableKind::BoltSpec,
        &inputs.bolt_size,
        tables.bolt_spec(&inputs.bolt_size),
        |b| &b.size,
    );
    let gasket = resolve(
        &mut fallbacks,
        TableKind::Gasket,
        &inputs.gasket,
        tables.gasket(&inputs.gasket),
        |g| &g.id,
    );
    let pass_gasket = resolve(
        &mut fallbacks,
        TableKind::Gasket,
        &inputs.pass_partition_gasket,
        tables.gasket(&inputs.pass_partition_gasket),
        |g| &g.id,
    );
    let tensioning = tables.tensioning(&bolt.size);
    let ring = tables.ring_standard(inputs.inside_diameter_mm);

    let shell = shell::size_shell(
        pressure_mpa,
        inputs.inside_diameter_mm,
        inputs.corrosion_allowance_mm,
        inputs.joint_efficiency,
        shell_material.allowable_at(temperature_c),
        manual.pick(manual.hub_thickness_mm),
    );

    let geometry = geometry::resolve(inputs, bolt, tensioning, ring, shell.hub_thickness_mm);

    let loading = GasketLoading {
        m: manual.pick(manual.gasket_m).unwrap_or(gasket.m),
        y_psi: manual.pick(manual.gasket_y_psi).unwrap_or(gasket.y_psi),
        pass_m: pass_gasket.m,
        pass_y_psi: pass_gasket.y_psi,
        pass_width_mm: inputs.pass_partition_width_mm,
        pass_length_mm: inputs.pass_partition_length_mm,
    };
    let capacity = BoltCapacity {
        single_area_mm2: bolt.tensile_area_mm2,
        count: inputs.bolt_count,
        ambient_stress_mpa: bolt_material.ambient_allowable(),
        design_stress_mpa: bolt_material.allowable_at(temperature_c),
    };
    let loads = load_balance::balance(
        pressure_mpa,
        geometry.seating_id_mm,
        geometry.seating_od_mm,
        inputs.facing_sketch,
        &loading,
        &capacity,
    );

    debug!(
        bolt_size = %bolt.size,
        bolt_count = inputs.bolt_count,
        bcd = geometry.final_bcd_mm,
        source = ?geometry.bcd_source,
        wm1 = loads.wm1_n,
        wm2 = loads.wm2_n,
        margin_pct = loads.margin_pct,
        pitch_ok = geometry.pitch_ok,
        "evaluated flange"
    );

    CalculationResult {
        pressure_mpa,
        temperature_c,
        bolt_size: bolt.size.clone(),
        bolt_count: inputs.bolt_count,
        shell,
        geometry,
        loads,
        fallbacks,
    }
}

/// Evaluate and, if `inputs.pcc1.enabled`, run the PCC-1 check.
pub fn analyze(inputs: &FlangeDesignInputs, tables: &ReferenceTables) -> DesignReport {
    let result = evaluate(inputs, tables);
    let pcc1 = inputs
        .pcc1
        .enabled
        .then(|| pcc1::check_pcc1(inputs, &result));
    DesignReport { result, pcc1 }
}

fn resolve<'a, T>(
    fallbacks: &mut Vec<TableFallback>,
    table: TableKind,
    requested: &str,
    lookup: Lookup<'a, T>,
    key_of: impl Fn(&T) -> &String,
) -> &'a T {
    if lookup.used_default {
        fallbacks.push(TableFallback {
            table,
            requested: requested.to_string(),
            substituted: key_of(lookup.value).clone(),
        });
    }
    lookup.value
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn standard() -> &'static ReferenceTables {
        ReferenceTables::standard()
    }

    #[test]
    fn test_reference_scenario() {
        let result = evaluate(&FlangeDesignInputs::default(), standard());
        let geo = &result.geometry;

        assert_eq!(result.shell.hub_thickness_mm, 7.0);
        assert_eq!(geo.bcd_method1_mm, 680.0);
        assert_eq!(geo.bcd_method2_mm, 1072.0);
        assert_eq!(geo.bcd_method3_mm, 1103.0);
        assert_eq!(geo.final_bcd_mm, 1103.0);
        assert_eq!(geo.bcd_source, BcdMethod::GasketClearance);
        assert_eq!(geo.flange_od_mm, 1145.0);

        let loads = &result.loads;
        assert_eq!(loads.ambient_stress_mpa, 172.0);
        assert_eq!(loads.design_stress_mpa, 172.0);
        assert!((loads.gasket_diameter_mm - 1031.1978).abs() < 1e-4);
        assert!((loads.wm1_n - 968_885.34).abs() < 0.01);
        assert!((loads.wm2_n - 1_541_446.69).abs() < 0.01);
        assert!((loads.total_bolt_area_mm2 - 9350.4).abs() < 1e-9);
        assert!(loads.is_safe);
        assert!((loads.margin_pct - 4.335).abs() < 1e-3);

        // Pitch exceeds the 3/4" maximum at 48 bolts
        assert!(!geo.pitch_ok);
        assert!(!result.passes());
        assert!(result.fallbacks.is_empty());
    }

    #[test]
    fn test_bcd_dominance_without_override() {
        for (size, count) in [("5/8", 16), ("3/4", 48), ("1", 24), ("1-1/2", 64), ("2", 80)] {
            let inputs = FlangeDesignInputs {
                bolt_size: size.to_string(),
                bolt_count: count,
                ..Default::default()
            };
            let geo = evaluate(&inputs, standard()).geometry;
            let max = geo.bcd_method1_mm.max(geo.bcd_method2_mm).max(geo.bcd_method3_mm);
            assert_eq!(geo.final_bcd_mm, max);
            let expected = match geo.bcd_source {
                BcdMethod::Pitch => geo.bcd_method1_mm,
                BcdMethod::Radial => geo.bcd_method2_mm,
                BcdMethod::GasketClearance => geo.bcd_method3_mm,
                BcdMethod::Manual => panic!("no override set"),
            };
            assert_eq!(expected, max);
        }
    }

    #[test]
    fn test_load_balance_identities() {
        let result = evaluate(&FlangeDesignInputs::default(), standard());
        let l = &result.loads;
        let area = (l.wm1_n / l.design_stress_mpa).max(l.wm2_n / l.ambient_stress_mpa);
        assert!((l.required_area_mm2 - area).abs() < 1e-9);
        assert_eq!(l.is_safe, l.total_bolt_area_mm2 * l.design_stress_mpa >= l.wm1_n.max(l.wm2_n));
    }

    #[test]
    fn test_pitch_identity() {
        let result = evaluate(&FlangeDesignInputs::default(), standard());
        let geo = &result.geometry;
        assert!((geo.pitch_mm - PI * geo.final_bcd_mm / 48.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_keys_recorded_as_fallbacks() {
        let inputs = FlangeDesignInputs {
            bolt_material: "Unknown Bolt".to_string(),
            gasket: "Unknown Gasket".to_string(),
            bolt_size: "9/16".to_string(),
            ..Default::default()
        };
        let result = evaluate(&inputs, standard());
        assert!(result.used_default(TableKind::Material));
        assert!(result.used_default(TableKind::BoltSpec));
        assert!(result.used_default(TableKind::Gasket));
        assert_eq!(result.fallbacks.len(), 3);
        assert_eq!(result.bolt_size, standard().bolt_specs()[0].size);

        let bolt_fallback = result
            .fallbacks
            .iter()
            .find(|f| f.table == TableKind::BoltSpec)
            .unwrap();
        assert_eq!(bolt_fallback.requested, "9/16");
    }

    #[test]
    fn test_unknown_pass_partition_gasket_falls_back_to_first_gasket() {
        let mut known = FlangeDesignInputs::default();
        known.pass_partition_length_mm = 1000.0;
        let unknown = FlangeDesignInputs {
            pass_partition_gasket: "Unknown Pass Gasket".to_string(),
            ..known.clone()
        };

        let base = evaluate(&known, standard());
        assert!(base.fallbacks.is_empty());

        let result = evaluate(&unknown, standard());
        assert_eq!(result.fallbacks.len(), 1);
        let fallback = &result.fallbacks[0];
        assert_eq!(fallback.table, TableKind::Gasket);
        assert_eq!(fallback.requested, "Unknown Pass Gasket");
        assert_eq!(fallback.substituted, standard().gaskets()[0].id);

        // 10 x 1000 mm of rib now uses spiral wound m = 3.0, y = 10 000 psi
        // instead of double jacketed m = 3.75, y = 9 000 psi
        assert!((result.loads.wm1_n - base.loads.wm1_n + 15_000.0).abs() < 1e-3);
        assert!((result.loads.wm2_n - base.loads.wm2_n - 68_947.57).abs() < 1.0);
    }

    #[test]
    fn test_unknown_shell_material_falls_back_to_first_curve() {
        let inputs = FlangeDesignInputs {
            shell_material: "Unobtainium".to_string(),
            ..Default::default()
        };
        let result = evaluate(&inputs, standard());
        assert!(result.used_default(TableKind::Material));
        // First curve is SA-193 B7 (172 MPa at 100 °C)
        assert_eq!(result.shell.allowable_stress_mpa, 172.0);
    }

    #[test]
    fn test_manual_gasket_factors() {
        let base = evaluate(&FlangeDesignInputs::default(), standard());

        let mut inputs = FlangeDesignInputs::default();
        inputs.manual.enabled = true;
        inputs.manual.gasket_y_psi = 5_000.0;
        let manual = evaluate(&inputs, standard());
        assert!((manual.loads.wm2_n - base.loads.wm2_n / 2.0).abs() < 1e-6);
        assert_eq!(manual.loads.wm1_n, base.loads.wm1_n);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let inputs = FlangeDesignInputs::default();
        assert_eq!(evaluate(&inputs, standard()), evaluate(&inputs, standard()));
    }

    #[test]
    fn test_analyze_attaches_pcc1_only_when_enabled() {
        let mut inputs = FlangeDesignInputs::default();
        assert!(analyze(&inputs, standard()).pcc1.is_none());

        inputs.pcc1.enabled = true;
        let report = analyze(&inputs, standard());
        assert!(report.pcc1.is_some());
    }

    #[test]
    fn test_higher_temperature_lowers_design_stress() {
        let inputs = FlangeDesignInputs {
            design_temperature: 450.0,
            ..Default::default()
        };
        let result = evaluate(&inputs, standard());
        assert_eq!(result.loads.design_stress_mpa, 147.0);
        assert_eq!(result.loads.ambient_stress_mpa, 172.0);
    }

    #[test]
    fn test_result_serialization() {
        let result = evaluate(&FlangeDesignInputs::default(), standard());
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"bcd_source\":\"GasketClearance\""));
        let roundtrip: CalculationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.geometry.final_bcd_mm, result.geometry.final_bcd_mm);
    }
}
