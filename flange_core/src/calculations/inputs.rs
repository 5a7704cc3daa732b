//! # Flange Design Inputs
//!
//! Everything the input-collecting layer hands to the engine for one design.
//! The engine only ever reads these values.
//!
//! ## JSON Example
//!
//! Every field has a default, so a partial document is accepted:
//!
//! ```json
//! {
//!   "label": "Channel flange E-101",
//!   "design_pressure": 15.0,
//!   "pressure_unit": "Bar",
//!   "design_temperature": 250.0,
//!   "temperature_unit": "C",
//!   "inside_diameter_mm": 1200.0,
//!   "bolt_size": "7/8",
//!   "bolt_count": 56
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::units::{pressure_to_mpa, temperature_to_celsius, PressureUnit, TemperatureUnit};

/// Gasket facing sketch category (ASME VIII-1 Table 2-5.2).
///
/// Selects the divisor applied to the contact width N to get the basic
/// gasket seating width b₀. Serialized as a short code; an unrecognized code
/// reads as flat face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FacingSketch {
    /// Flat face (sketch 1a/1b)
    #[default]
    FlatFace,
    /// Tongue and groove (sketch 1c/1d)
    TongueGroove,
    /// Raised face with serrations (sketch 2/3)
    RaisedFace,
    /// Nubbin (sketch 4/5)
    Nubbin,
    /// Ring joint (sketch 6)
    RingJoint,
}

impl FacingSketch {
    /// Parse a facing code, case-insensitively; unknown codes give `FlatFace`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "tongue-groove" | "tongue-and-groove" | "tongue-&-groove" => FacingSketch::TongueGroove,
            "raised" | "raised-face" => FacingSketch::RaisedFace,
            "nubbin" => FacingSketch::Nubbin,
            "ring-joint" | "rtj" => FacingSketch::RingJoint,
            _ => FacingSketch::FlatFace,
        }
    }

    /// Short code written to design files
    pub fn label(&self) -> &'static str {
        match self {
            FacingSketch::FlatFace => "flat",
            FacingSketch::TongueGroove => "tongue-groove",
            FacingSketch::RaisedFace => "raised",
            FacingSketch::Nubbin => "nubbin",
            FacingSketch::RingJoint => "ring-joint",
        }
    }

    /// b₀ = N / divisor
    pub fn seating_width_divisor(&self) -> f64 {
        match self {
            FacingSketch::FlatFace | FacingSketch::TongueGroove => 2.0,
            FacingSketch::RaisedFace | FacingSketch::Nubbin => 4.0,
            FacingSketch::RingJoint => 8.0,
        }
    }

    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            FacingSketch::FlatFace => "Flat Face",
            FacingSketch::TongueGroove => "Tongue & Groove",
            FacingSketch::RaisedFace => "Raised Face",
            FacingSketch::Nubbin => "Nubbin",
            FacingSketch::RingJoint => "Ring Joint",
        }
    }
}

impl From<String> for FacingSketch {
    fn from(label: String) -> Self {
        FacingSketch::from_label(&label)
    }
}

impl From<FacingSketch> for String {
    fn from(facing: FacingSketch) -> Self {
        facing.label().to_string()
    }
}

/// Manually entered values that replace computed ones.
///
/// Nothing here applies unless `enabled` is set, and a value of 0 always
/// means "not entered".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualOverrides {
    /// Master switch for all overrides below
    pub enabled: bool,

    /// Gasket seating ID (mm)
    pub seating_id_mm: f64,

    /// Gasket seating OD (mm)
    pub seating_od_mm: f64,

    /// Bolt circle diameter (mm)
    pub bcd_mm: f64,

    /// Flange outside diameter (mm)
    pub flange_od_mm: f64,

    /// Main gasket factor m
    pub gasket_m: f64,

    /// Main gasket seating stress y (psi)
    pub gasket_y_psi: f64,

    /// Hub thickness g1 (mm)
    pub hub_thickness_mm: f64,
}

impl ManualOverrides {
    /// `Some(value)` when overrides are enabled and `value` was entered
    pub fn pick(&self, value: f64) -> Option<f64> {
        (self.enabled && value != 0.0).then_some(value)
    }
}

/// Inputs for the PCC-1 assembly bolt stress check.
///
/// Stresses in MPa, rotations in degrees. `max_gasket_stress_mpa = 0` and
/// `max_flange_rotation_deg = 0` mean "not specified".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pcc1Inputs {
    /// Run the check and attach it to the report
    pub enabled: bool,

    /// Target assembly gasket stress SgT
    pub target_gasket_stress_mpa: f64,

    /// Minimum gasket seating stress SgMinS
    pub min_seating_stress_mpa: f64,

    /// Minimum operating gasket stress SgMinO
    pub min_operating_stress_mpa: f64,

    /// Maximum gasket stress SgMax (0 = not specified)
    pub max_gasket_stress_mpa: f64,

    /// Maximum bolt stress SbMax
    pub max_bolt_stress_mpa: f64,

    /// Minimum bolt stress SbMin
    pub min_bolt_stress_mpa: f64,

    /// Bolt stress at the flange stress limit SfMax
    pub max_flange_stress_mpa: f64,

    /// Flange rotation at SfMax, φFMax (0 = not specified)
    pub max_flange_rotation_deg: f64,

    /// Maximum permitted gasket rotation φGMax
    pub max_gasket_rotation_deg: f64,

    /// Fraction of assembly gasket load retained in operation, g
    pub gasket_load_fraction: f64,

    /// Pass-partition area counted towards the gasket area (%)
    pub pass_partition_reduction_pct: f64,
}

impl Default for Pcc1Inputs {
    fn default() -> Self {
        Pcc1Inputs {
            enabled: false,
            target_gasket_stress_mpa: 207.0,
            min_seating_stress_mpa: 69.0,
            min_operating_stress_mpa: 41.0,
            max_gasket_stress_mpa: 300.0,
            max_bolt_stress_mpa: 500.0,
            min_bolt_stress_mpa: 290.0,
            max_flange_stress_mpa: 550.0,
            max_flange_rotation_deg: 0.3,
            max_gasket_rotation_deg: 1.0,
            gasket_load_fraction: 0.7,
            pass_partition_reduction_pct: 50.0,
        }
    }
}

/// Complete input set for one flange evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlangeDesignInputs {
    /// User label (e.g., "E-101 Channel Flange")
    pub label: String,

    /// Design pressure in `pressure_unit`
    pub design_pressure: f64,
    pub pressure_unit: PressureUnit,

    /// Design temperature in `temperature_unit`
    pub design_temperature: f64,
    pub temperature_unit: TemperatureUnit,

    /// Channel/shell inside diameter (mm)
    pub inside_diameter_mm: f64,

    /// Corrosion allowance (mm)
    pub corrosion_allowance_mm: f64,

    /// Longitudinal weld joint efficiency E
    pub joint_efficiency: f64,

    /// Shell/flange material id (plate family)
    pub shell_material: String,

    /// Bolting material id (bolt family)
    pub bolt_material: String,

    /// Main gasket id
    pub gasket: String,

    /// Pass-partition gasket id
    pub pass_partition_gasket: String,

    /// Gasket facing sketch
    pub facing_sketch: FacingSketch,

    /// Spiral wound inner ring present
    pub inner_ring: bool,

    /// Spiral wound outer (centering) ring present
    pub outer_ring: bool,

    /// Inner ring width (mm), 0 = standard minimum
    pub inner_ring_width_mm: f64,

    /// Outer ring width (mm), 0 = standard minimum
    pub outer_ring_width_mm: f64,

    /// Clearance between outer ring and bolt hole (mm)
    pub bolt_clearance_mm: f64,

    /// Gap between shell bore and inner ring (mm)
    pub shell_gap_mm: f64,

    /// Radial gasket seating width (mm)
    pub gasket_seating_width_mm: f64,

    /// Pass-partition rib width (mm)
    pub pass_partition_width_mm: f64,

    /// Total pass-partition rib length (mm), 0 = no pass partitions
    pub pass_partition_length_mm: f64,

    /// Nominal bolt size key (e.g., "3/4")
    pub bolt_size: String,

    /// Number of bolts
    pub bolt_count: u32,

    /// Bolts are tightened with hydraulic tensioners
    pub hydraulic_tensioning: bool,

    /// Manual geometry/factor overrides
    pub manual: ManualOverrides,

    /// PCC-1 assembly bolt stress check
    pub pcc1: Pcc1Inputs,
}

impl Default for FlangeDesignInputs {
    fn default() -> Self {
        FlangeDesignInputs {
            label: "Channel Flange".to_string(),
            design_pressure: 1.0,
            pressure_unit: PressureUnit::Mpa,
            design_temperature: 100.0,
            temperature_unit: TemperatureUnit::Celsius,
            inside_diameter_mm: 1000.0,
            corrosion_allowance_mm: 3.0,
            joint_efficiency: 1.0,
            shell_material: "SA-516 70".to_string(),
            bolt_material: "SA-193 B7".to_string(),
            gasket: "Spiral Wound (SS/Graphite)".to_string(),
            pass_partition_gasket: "Double Jacketed (Soft Iron)".to_string(),
            facing_sketch: FacingSketch::FlatFace,
            inner_ring: true,
            outer_ring: true,
            inner_ring_width_mm: 0.0,
            outer_ring_width_mm: 0.0,
            bolt_clearance_mm: 3.0,
            shell_gap_mm: 3.0,
            gasket_seating_width_mm: 15.0,
            pass_partition_width_mm: 10.0,
            pass_partition_length_mm: 0.0,
            bolt_size: "3/4".to_string(),
            bolt_count: 48,
            hydraulic_tensioning: false,
            manual: ManualOverrides::default(),
            pcc1: Pcc1Inputs::default(),
        }
    }
}

impl FlangeDesignInputs {
    /// Design pressure in MPa
    pub fn pressure_mpa(&self) -> f64 {
        pressure_to_mpa(self.design_pressure, self.pressure_unit)
    }

    /// Design temperature in °C
    pub fn temperature_c(&self) -> f64 {
        temperature_to_celsius(self.design_temperature, self.temperature_unit)
    }

    /// Copy with a different bolting arrangement and no manual overrides
    pub fn candidate(&self, bolt_size: &str, bolt_count: u32) -> Self {
        let mut candidate = self.clone();
        candidate.bolt_size = bolt_size.to_string();
        candidate.bolt_count = bolt_count;
        candidate.manual = ManualOverrides::default();
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_reference_scenario() {
        let inputs = FlangeDesignInputs::default();
        assert_eq!(inputs.inside_diameter_mm, 1000.0);
        assert_eq!(inputs.pressure_mpa(), 1.0);
        assert_eq!(inputs.temperature_c(), 100.0);
        assert_eq!(inputs.bolt_size, "3/4");
        assert_eq!(inputs.bolt_count, 48);
        assert_eq!(inputs.bolt_material, "SA-193 B7");
    }

    #[test]
    fn test_unit_normalization() {
        let inputs = FlangeDesignInputs {
            design_pressure: 145.0,
            pressure_unit: PressureUnit::Psi,
            design_temperature: 482.0,
            temperature_unit: TemperatureUnit::Fahrenheit,
            ..Default::default()
        };
        assert!((inputs.pressure_mpa() - 0.9997402).abs() < 1e-6);
        assert!((inputs.temperature_c() - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_manual_pick() {
        let mut manual = ManualOverrides {
            bcd_mm: 1200.0,
            ..Default::default()
        };
        assert_eq!(manual.pick(manual.bcd_mm), None);
        manual.enabled = true;
        assert_eq!(manual.pick(manual.bcd_mm), Some(1200.0));
        assert_eq!(manual.pick(manual.flange_od_mm), None);
    }

    #[test]
    fn test_candidate_strips_overrides() {
        let mut inputs = FlangeDesignInputs::default();
        inputs.manual.enabled = true;
        inputs.manual.bcd_mm = 1500.0;
        let candidate = inputs.candidate("1", 32);
        assert_eq!(candidate.bolt_size, "1");
        assert_eq!(candidate.bolt_count, 32);
        assert!(!candidate.manual.enabled);
        assert_eq!(candidate.manual.bcd_mm, 0.0);
        // Original untouched
        assert!(inputs.manual.enabled);
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{ "label": "E-101", "design_pressure": 15.0, "pressure_unit": "Bar", "facing_sketch": "raised" }"#;
        let inputs: FlangeDesignInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.label, "E-101");
        assert!((inputs.pressure_mpa() - 1.5).abs() < 1e-12);
        assert_eq!(inputs.facing_sketch, FacingSketch::RaisedFace);
        assert_eq!(inputs.bolt_count, 48);
    }

    #[test]
    fn test_facing_divisors() {
        assert_eq!(FacingSketch::FlatFace.seating_width_divisor(), 2.0);
        assert_eq!(FacingSketch::TongueGroove.seating_width_divisor(), 2.0);
        assert_eq!(FacingSketch::RaisedFace.seating_width_divisor(), 4.0);
        assert_eq!(FacingSketch::Nubbin.seating_width_divisor(), 4.0);
        assert_eq!(FacingSketch::RingJoint.seating_width_divisor(), 8.0);
    }

    #[test]
    fn test_facing_codes_are_lenient() {
        assert_eq!(FacingSketch::from_label("Raised Face"), FacingSketch::RaisedFace);
        assert_eq!(FacingSketch::from_label("tongue_groove"), FacingSketch::TongueGroove);
        assert_eq!(FacingSketch::from_label(" RTJ "), FacingSketch::RingJoint);
        assert_eq!(FacingSketch::from_label("lap-joint"), FacingSketch::FlatFace);

        let json = serde_json::to_string(&FacingSketch::RingJoint).unwrap();
        assert_eq!(json, "\"ring-joint\"");

        let json = r#"{ "bolt_count": 52, "facing_sketch": "spiral" }"#;
        let inputs: FlangeDesignInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.facing_sketch, FacingSketch::FlatFace);
        assert_eq!(inputs.bolt_count, 52);
    }
}
