//! # Reference Tables
//!
//! Immutable snapshot of the reference data every evaluation reads:
//!
//! - **Material stress curves** keyed by material id
//! - **Bolt specs** (TEMA bolting data) keyed by nominal size
//! - **Tensioning specs** (hydraulic tensioning spacing) keyed by nominal size
//! - **Gasket factors** (ASME m and y) keyed by gasket id
//! - **Ring standards** (retaining ring widths) keyed by inside-diameter range
//!
//! A snapshot is only obtainable through [`ReferenceTables::new`] (or
//! deserialization, which runs the same checks), so every lookup can rely on
//! non-empty tables with unique keys, curves aligned to their step table and
//! sorted, non-overlapping ring ranges. Ring ranges are half-open,
//! `(id_min, id_max]`, so a diameter on a shared endpoint belongs to the range
//! that ends there; the first range also covers its own lower bound.
//!
//! ## Lookup Fallback
//!
//! Lookups never fail. An unknown material, bolt size or gasket id resolves to
//! the first entry of its table, and the returned [`Lookup`] says so through
//! `used_default`. Tensioning is the exception: a missing tensioning spec is a
//! meaningful absence and is returned as `None`.
//!
//! ## Example
//!
//! ```rust
//! use flange_core::tables::ReferenceTables;
//!
//! let tables = ReferenceTables::standard();
//! let bolt = tables.bolt_spec("3/4");
//! assert!(!bolt.used_default);
//! assert_eq!(bolt.value.size_in, 0.75);
//!
//! let unknown = tables.gasket("Unobtainium");
//! assert!(unknown.used_default);
//! ```

pub mod standard;

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{CalcError, CalcResult};
use crate::stress::{self, MaterialFamily};
use crate::units::{Inches, MM_PER_INCH};

/// Allowable stress curve of one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialStressCurve {
    /// Material id (e.g., "SA-193 B7")
    pub id: String,

    /// Bolt or plate; selects the temperature step table
    pub family: MaterialFamily,

    /// Specified minimum tensile strength (MPa)
    pub min_tensile_mpa: f64,

    /// Specified minimum yield strength (MPa)
    pub min_yield_mpa: f64,

    /// Allowable stress per temperature step (MPa), `None` where unpublished
    pub allowable_mpa: Vec<Option<f64>>,
}

impl MaterialStressCurve {
    /// Temperature steps this curve is aligned to
    pub fn temperature_steps(&self) -> &'static [f64] {
        self.family.temperature_steps()
    }

    /// Interpolated allowable stress at `temp_c` (MPa)
    pub fn allowable_at(&self, temp_c: f64) -> f64 {
        stress::interpolate(temp_c, &self.allowable_mpa, self.temperature_steps())
    }

    /// Allowable stress at the ambient step (MPa)
    pub fn ambient_allowable(&self) -> f64 {
        stress::ambient_stress(&self.allowable_mpa, self.temperature_steps())
    }
}

/// TEMA bolting data for one nominal bolt size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoltSpec {
    /// Nominal size label (e.g., "3/4", "1-1/8")
    pub size: String,

    /// Nominal diameter in inches
    pub size_in: f64,

    /// Radial distance R from bolt circle to hub (in)
    pub radial_distance_in: f64,

    /// Minimum bolt spacing B_min (in)
    pub min_spacing_in: f64,

    /// Edge distance E from bolt circle to flange OD (in)
    pub edge_distance_in: f64,

    /// Bolt hole diameter (mm)
    pub hole_size_mm: f64,

    /// Tensile stress (root) area of one bolt (mm²)
    pub tensile_area_mm2: f64,

    /// Alternate maximum pitch (mm) overriding the default rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pitch_mm: Option<f64>,
}

impl BoltSpec {
    /// Maximum allowed bolt pitch (mm).
    ///
    /// Uses the tabulated value when present, otherwise 2.5·d + 12 mm.
    pub fn max_pitch_mm(&self) -> f64 {
        self.max_pitch_mm
            .unwrap_or(2.5 * self.size_in * MM_PER_INCH + 12.0)
    }

    /// Radial distance R in mm
    pub fn radial_distance_mm(&self) -> f64 {
        Inches(self.radial_distance_in).mm()
    }

    /// Edge distance E in mm
    pub fn edge_distance_mm(&self) -> f64 {
        Inches(self.edge_distance_in).mm()
    }
}

/// Minimum bolt spacing when hydraulic tensioning is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensioningSpec {
    /// Nominal size label
    pub size: String,

    /// Minimum spacing B_ten (in)
    pub min_spacing_in: f64,
}

/// ASME gasket factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasketFactorSpec {
    /// Gasket id (e.g., "Spiral Wound (SS/Graphite)")
    pub id: String,

    /// Gasket factor m (dimensionless)
    pub m: f64,

    /// Minimum design seating stress y (psi)
    pub y_psi: f64,

    /// Applicable facing sketches
    #[serde(default)]
    pub facing_notes: String,
}

/// Minimum retaining ring widths for an inside-diameter range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingStandardSpec {
    /// Lower bound of the inside-diameter range (mm)
    pub id_min_mm: f64,

    /// Upper bound of the inside-diameter range (mm)
    pub id_max_mm: f64,

    /// Minimum inner ring width (mm)
    pub inner_ring_min_mm: f64,

    /// Minimum outer ring width (mm)
    pub outer_ring_min_mm: f64,
}

impl RingStandardSpec {
    /// Whether `inside_diameter_mm` falls in `(id_min_mm, id_max_mm]`
    pub fn contains(&self, inside_diameter_mm: f64) -> bool {
        inside_diameter_mm > self.id_min_mm && inside_diameter_mm <= self.id_max_mm
    }
}

/// Table a lookup was made against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
    Material,
    BoltSpec,
    Gasket,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TableKind::Material => "material",
            TableKind::BoltSpec => "bolt spec",
            TableKind::Gasket => "gasket",
        };
        write!(f, "{}", name)
    }
}

/// Result of a keyed table lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lookup<'a, T> {
    /// The resolved entry
    pub value: &'a T,

    /// True when the key was not found and the first entry was substituted
    pub used_default: bool,
}

/// Record of a lookup that fell back to the first table entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableFallback {
    /// Table that was searched
    pub table: TableKind,

    /// Key that was not found
    pub requested: String,

    /// Key of the substituted entry
    pub substituted: String,
}

/// Serialized form of a table snapshot, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawReferenceTables {
    pub materials: Vec<MaterialStressCurve>,
    pub bolt_specs: Vec<BoltSpec>,
    #[serde(default)]
    pub tensioning: Vec<TensioningSpec>,
    pub gaskets: Vec<GasketFactorSpec>,
    pub ring_standards: Vec<RingStandardSpec>,
}

/// Validated, immutable reference table snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawReferenceTables", into = "RawReferenceTables")]
pub struct ReferenceTables {
    materials: Vec<MaterialStressCurve>,
    bolt_specs: Vec<BoltSpec>,
    tensioning: Vec<TensioningSpec>,
    gaskets: Vec<GasketFactorSpec>,
    ring_standards: Vec<RingStandardSpec>,
}

static STANDARD_TABLES: Lazy<ReferenceTables> = Lazy::new(|| ReferenceTables {
    materials: standard::materials(),
    bolt_specs: standard::bolt_specs(),
    tensioning: standard::tensioning_specs(),
    gaskets: standard::gaskets(),
    ring_standards: standard::ring_standards(),
});

impl ReferenceTables {
    /// Build a snapshot, checking every table invariant.
    pub fn new(
        materials: Vec<MaterialStressCurve>,
        bolt_specs: Vec<BoltSpec>,
        tensioning: Vec<TensioningSpec>,
        gaskets: Vec<GasketFactorSpec>,
        ring_standards: Vec<RingStandardSpec>,
    ) -> CalcResult<Self> {
        require_non_empty("materials", materials.len())?;
        require_non_empty("bolt_specs", bolt_specs.len())?;
        require_non_empty("gaskets", gaskets.len())?;
        require_non_empty("ring_standards", ring_standards.len())?;

        require_unique("materials", materials.iter().map(|m| m.id.as_str()))?;
        require_unique("bolt_specs", bolt_specs.iter().map(|b| b.size.as_str()))?;
        require_unique("tensioning", tensioning.iter().map(|t| t.size.as_str()))?;
        require_unique("gaskets", gaskets.iter().map(|g| g.id.as_str()))?;

        for curve in &materials {
            let expected = curve.temperature_steps().len();
            if curve.allowable_mpa.len() != expected {
                return Err(CalcError::invalid_table(
                    "materials",
                    format!(
                        "'{}' has {} stress values, {:?} step table has {}",
                        curve.id,
                        curve.allowable_mpa.len(),
                        curve.family,
                        expected
                    ),
                ));
            }
        }

        for ring in &ring_standards {
            if ring.id_min_mm >= ring.id_max_mm {
                return Err(CalcError::invalid_table(
                    "ring_standards",
                    format!("range ({}, {}] is empty", ring.id_min_mm, ring.id_max_mm),
                ));
            }
        }
        for pair in ring_standards.windows(2) {
            if pair[1].id_min_mm < pair[0].id_max_mm {
                return Err(CalcError::invalid_table(
                    "ring_standards",
                    format!(
                        "range starting at {} overlaps or precedes range ending at {}",
                        pair[1].id_min_mm, pair[0].id_max_mm
                    ),
                ));
            }
        }

        Ok(ReferenceTables {
            materials,
            bolt_specs,
            tensioning,
            gaskets,
            ring_standards,
        })
    }

    /// Built-in standard snapshot (TEMA bolting, ASME gasket factors,
    /// common bolting and plate materials).
    pub fn standard() -> &'static ReferenceTables {
        &STANDARD_TABLES
    }

    pub fn materials(&self) -> &[MaterialStressCurve] {
        &self.materials
    }

    pub fn bolt_specs(&self) -> &[BoltSpec] {
        &self.bolt_specs
    }

    pub fn tensioning_specs(&self) -> &[TensioningSpec] {
        &self.tensioning
    }

    pub fn gaskets(&self) -> &[GasketFactorSpec] {
        &self.gaskets
    }

    pub fn ring_standards(&self) -> &[RingStandardSpec] {
        &self.ring_standards
    }

    /// Material curve by id, first curve when unknown
    pub fn material(&self, id: &str) -> Lookup<'_, MaterialStressCurve> {
        lookup_or_first(&self.materials, TableKind::Material, id, |m| &m.id)
    }

    /// Bolt spec by nominal size, first spec when unknown
    pub fn bolt_spec(&self, size: &str) -> Lookup<'_, BoltSpec> {
        lookup_or_first(&self.bolt_specs, TableKind::BoltSpec, size, |b| &b.size)
    }

    /// Gasket factors by id, first gasket when unknown
    pub fn gasket(&self, id: &str) -> Lookup<'_, GasketFactorSpec> {
        lookup_or_first(&self.gaskets, TableKind::Gasket, id, |g| &g.id)
    }

    /// Tensioning spacing for a bolt size, if one is published
    pub fn tensioning(&self, size: &str) -> Option<&TensioningSpec> {
        self.tensioning.iter().find(|t| t.size == size)
    }

    /// Ring standard covering `inside_diameter_mm`; the last (largest) range
    /// when no range covers it.
    pub fn ring_standard(&self, inside_diameter_mm: f64) -> &RingStandardSpec {
        let first = &self.ring_standards[0];
        if inside_diameter_mm == first.id_min_mm {
            return first;
        }
        self.ring_standards
            .iter()
            .find(|r| r.contains(inside_diameter_mm))
            .unwrap_or(&self.ring_standards[self.ring_standards.len() - 1])
    }

    /// Bolt specs eligible for a size search, ordered by ascending diameter.
    pub fn bolt_specs_at_least(&self, min_size_in: f64) -> Vec<&BoltSpec> {
        let mut specs: Vec<&BoltSpec> = self
            .bolt_specs
            .iter()
            .filter(|b| b.size_in >= min_size_in)
            .collect();
        specs.sort_by(|a, b| a.size_in.total_cmp(&b.size_in));
        specs
    }
}

impl TryFrom<RawReferenceTables> for ReferenceTables {
    type Error = CalcError;

    fn try_from(raw: RawReferenceTables) -> Result<Self, Self::Error> {
        ReferenceTables::new(
            raw.materials,
            raw.bolt_specs,
            raw.tensioning,
            raw.gaskets,
            raw.ring_standards,
        )
    }
}

impl From<ReferenceTables> for RawReferenceTables {
    fn from(tables: ReferenceTables) -> Self {
        RawReferenceTables {
            materials: tables.materials,
            bolt_specs: tables.bolt_specs,
            tensioning: tables.tensioning,
            gaskets: tables.gaskets,
            ring_standards: tables.ring_standards,
        }
    }
}

fn lookup_or_first<'a, T>(
    entries: &'a [T],
    table: TableKind,
    key: &str,
    key_of: impl Fn(&T) -> &String,
) -> Lookup<'a, T> {
    match entries.iter().find(|e| key_of(e) == key) {
        Some(value) => Lookup {
            value,
            used_default: false,
        },
        None => {
            let value = &entries[0];
            warn!(
                %table,
                requested = key,
                substituted = key_of(value).as_str(),
                "table key not found, using first entry"
            );
            Lookup {
                value,
                used_default: true,
            }
        }
    }
}

fn require_non_empty(table: &str, len: usize) -> CalcResult<()> {
    if len == 0 {
        return Err(CalcError::invalid_table(table, "table is empty"));
    }
    Ok(())
}

fn require_unique<'a>(table: &str, keys: impl Iterator<Item = &'a str>) -> CalcResult<()> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(CalcError::invalid_table(table, format!("duplicate key '{}'", key)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_standard() -> RawReferenceTables {
        ReferenceTables::standard().clone().into()
    }

    fn build(raw: RawReferenceTables) -> CalcResult<ReferenceTables> {
        ReferenceTables::try_from(raw)
    }

    #[test]
    fn test_standard_tables_validate() {
        let rebuilt = build(raw_standard()).unwrap();
        assert_eq!(&rebuilt, ReferenceTables::standard());
    }

    #[test]
    fn test_known_lookups() {
        let tables = ReferenceTables::standard();
        let b7 = tables.material("SA-193 B7");
        assert!(!b7.used_default);
        assert_eq!(b7.value.family, MaterialFamily::Bolt);

        let plate = tables.material("SA-516 70");
        assert!(!plate.used_default);
        assert_eq!(plate.value.family, MaterialFamily::Plate);
    }

    #[test]
    fn test_unknown_keys_fall_back_to_first_entry() {
        let tables = ReferenceTables::standard();

        let mat = tables.material("Adamantium");
        assert!(mat.used_default);
        assert_eq!(mat.value.id, tables.materials()[0].id);

        let bolt = tables.bolt_spec("9/16");
        assert!(bolt.used_default);
        assert_eq!(bolt.value.size, tables.bolt_specs()[0].size);

        let gasket = tables.gasket("");
        assert!(gasket.used_default);
        assert_eq!(gasket.value.id, tables.gaskets()[0].id);
    }

    #[test]
    fn test_tensioning_lookup_is_optional() {
        let tables = ReferenceTables::standard();
        assert!(tables.tensioning("3/4").is_none());
        assert!(tables.tensioning("1").is_some());
    }

    #[test]
    fn test_ring_standard_range_binding() {
        let tables = ReferenceTables::standard();
        let rings = tables.ring_standards();

        let r = tables.ring_standard(rings[0].id_min_mm);
        assert_eq!(r, &rings[0]);

        // Beyond the largest range binds to the last one
        let last = &rings[rings.len() - 1];
        assert_eq!(tables.ring_standard(last.id_max_mm + 1000.0), last);
        assert_eq!(tables.ring_standard(-5.0), last);
    }

    #[test]
    fn test_shared_endpoint_binds_to_one_range() {
        let tables = ReferenceTables::standard();
        let rings = tables.ring_standards();

        for (i, ring) in rings[..rings.len() - 1].iter().enumerate() {
            let boundary = ring.id_max_mm;
            assert_eq!(rings.iter().filter(|r| r.contains(boundary)).count(), 1);
            assert_eq!(tables.ring_standard(boundary), &rings[i]);
            assert_eq!(tables.ring_standard(boundary + 0.5), &rings[i + 1]);
        }

        // 1000 mm ends the 700..1000 range
        let r = tables.ring_standard(1000.0);
        assert_eq!((r.inner_ring_min_mm, r.outer_ring_min_mm), (4.5, 13.0));
    }

    #[test]
    fn test_custom_adjacent_ranges() {
        let mut raw = raw_standard();
        raw.ring_standards = vec![
            RingStandardSpec {
                id_min_mm: 0.0,
                id_max_mm: 1000.0,
                inner_ring_min_mm: 3.0,
                outer_ring_min_mm: 10.0,
            },
            RingStandardSpec {
                id_min_mm: 1000.0,
                id_max_mm: 2000.0,
                inner_ring_min_mm: 5.0,
                outer_ring_min_mm: 15.0,
            },
        ];
        let tables = build(raw).unwrap();
        let rings = tables.ring_standards();
        assert_eq!(tables.ring_standard(0.0), &rings[0]);
        assert_eq!(tables.ring_standard(1000.0), &rings[0]);
        assert_eq!(tables.ring_standard(1000.5), &rings[1]);
    }

    #[test]
    fn test_rejects_empty_ring_range() {
        let mut raw = raw_standard();
        raw.ring_standards[2].id_min_mm = raw.ring_standards[2].id_max_mm;
        let err = build(raw).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_max_pitch_rule() {
        let tables = ReferenceTables::standard();
        let three_quarter = tables.bolt_spec("3/4").value;
        assert!(three_quarter.max_pitch_mm.is_none());
        assert!((three_quarter.max_pitch_mm() - (2.5 * 0.75 * 25.4 + 12.0)).abs() < 1e-9);

        let mut custom = three_quarter.clone();
        custom.max_pitch_mm = Some(70.0);
        assert_eq!(custom.max_pitch_mm(), 70.0);
    }

    #[test]
    fn test_bolt_specs_at_least_sorted() {
        let tables = ReferenceTables::standard();
        let specs = tables.bolt_specs_at_least(0.75);
        assert!(!specs.is_empty());
        assert_eq!(specs[0].size, "3/4");
        assert!(specs.iter().all(|b| b.size_in >= 0.75));
        assert!(specs.windows(2).all(|w| w[0].size_in < w[1].size_in));
    }

    #[test]
    fn test_rejects_empty_table() {
        let mut raw = raw_standard();
        raw.gaskets.clear();
        let err = build(raw).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_TABLE");
    }

    #[test]
    fn test_rejects_duplicate_keys() {
        let mut raw = raw_standard();
        let dup = raw.bolt_specs[0].clone();
        raw.bolt_specs.push(dup);
        assert!(build(raw).is_err());
    }

    #[test]
    fn test_rejects_misaligned_curve() {
        let mut raw = raw_standard();
        raw.materials[0].allowable_mpa.pop();
        assert!(build(raw).is_err());
    }

    #[test]
    fn test_rejects_overlapping_ring_ranges() {
        let mut raw = raw_standard();
        raw.ring_standards[1].id_min_mm = raw.ring_standards[0].id_max_mm - 50.0;
        assert!(build(raw).is_err());

        let mut raw = raw_standard();
        raw.ring_standards.reverse();
        assert!(build(raw).is_err());
    }

    #[test]
    fn test_json_roundtrip_revalidates() {
        let tables = ReferenceTables::standard();
        let json = serde_json::to_string(tables).unwrap();
        let parsed: ReferenceTables = serde_json::from_str(&json).unwrap();
        assert_eq!(&parsed, tables);

        let mut raw = raw_standard();
        raw.materials.clear();
        let bad_json = serde_json::to_string(&raw).unwrap();
        assert!(serde_json::from_str::<ReferenceTables>(&bad_json).is_err());
    }
}
