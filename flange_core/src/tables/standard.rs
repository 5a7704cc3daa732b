//! Built-in standard reference data.
//!
//! Bolting dimensions follow TEMA Table D-5 (inch series), gasket factors
//! follow ASME VIII-1 Table 2-5.1, and allowable stresses are ASME II-D
//! values rounded to whole MPa. Ring widths are minimum retaining ring widths
//! for spiral wound gaskets by channel inside diameter.

use super::{BoltSpec, GasketFactorSpec, MaterialStressCurve, RingStandardSpec, TensioningSpec};
use crate::stress::MaterialFamily;

#[allow(clippy::too_many_arguments)]
fn bolt(
    size: &str,
    size_in: f64,
    radial_distance_in: f64,
    min_spacing_in: f64,
    edge_distance_in: f64,
    hole_size_mm: f64,
    tensile_area_mm2: f64,
    max_pitch_mm: Option<f64>,
) -> BoltSpec {
    BoltSpec {
        size: size.to_string(),
        size_in,
        radial_distance_in,
        min_spacing_in,
        edge_distance_in,
        hole_size_mm,
        tensile_area_mm2,
        max_pitch_mm,
    }
}

/// TEMA bolting data, ascending by size
pub fn bolt_specs() -> Vec<BoltSpec> {
    vec![
        bolt("1/2", 0.5, 0.8125, 1.25, 0.625, 15.9, 81.3, Some(41.0)),
        bolt("5/8", 0.625, 0.9375, 1.5, 0.75, 19.1, 130.3, Some(50.0)),
        bolt("3/4", 0.75, 1.125, 1.75, 0.8125, 22.2, 194.8, None),
        bolt("7/8", 0.875, 1.25, 2.0625, 0.9375, 25.4, 270.3, None),
        bolt("1", 1.0, 1.375, 2.25, 1.0625, 28.6, 355.5, None),
        bolt("1-1/8", 1.125, 1.5, 2.5, 1.125, 31.8, 469.7, None),
        bolt("1-1/4", 1.25, 1.75, 2.8125, 1.25, 35.0, 599.4, None),
        bolt("1-3/8", 1.375, 1.875, 3.0625, 1.375, 38.1, 745.2, None),
        bolt("1-1/2", 1.5, 2.0, 3.25, 1.5, 41.3, 906.5, None),
        bolt("1-5/8", 1.625, 2.125, 3.5, 1.625, 44.5, 1083.9, None),
        bolt("1-3/4", 1.75, 2.25, 3.75, 1.75, 47.6, 1277.4, None),
        bolt("1-7/8", 1.875, 2.375, 4.0, 1.875, 50.8, 1486.4, None),
        bolt("2", 2.0, 2.5, 4.25, 2.0, 54.0, 1711.0, None),
        bolt("2-1/4", 2.25, 2.75, 4.75, 2.25, 60.3, 2208.4, None),
        bolt("2-1/2", 2.5, 3.0625, 5.25, 2.375, 66.7, 2769.0, None),
        bolt("2-3/4", 2.75, 3.375, 5.75, 2.625, 73.0, 3392.9, None),
        bolt("3", 3.0, 3.625, 6.25, 2.875, 79.4, 4080.0, None),
    ]
}

/// Minimum spacing for hydraulic tensioning tools.
///
/// Sizes below 7/8 are not tensioned. The 7/8 entry is below that size's
/// B_min and never governs.
pub fn tensioning_specs() -> Vec<TensioningSpec> {
    [
        ("7/8", 2.0),
        ("1", 3.0),
        ("1-1/8", 3.25),
        ("1-1/4", 3.5),
        ("1-3/8", 3.75),
        ("1-1/2", 4.0),
        ("1-5/8", 4.25),
        ("1-3/4", 4.5),
        ("1-7/8", 4.75),
        ("2", 5.0),
        ("2-1/4", 5.5),
        ("2-1/2", 6.0),
        ("2-3/4", 6.5),
        ("3", 7.0),
    ]
    .into_iter()
    .map(|(size, min_spacing_in)| TensioningSpec {
        size: size.to_string(),
        min_spacing_in,
    })
    .collect()
}

fn gasket(id: &str, m: f64, y_psi: f64, facing_notes: &str) -> GasketFactorSpec {
    GasketFactorSpec {
        id: id.to_string(),
        m,
        y_psi,
        facing_notes: facing_notes.to_string(),
    }
}

/// ASME gasket factors
pub fn gaskets() -> Vec<GasketFactorSpec> {
    vec![
        gasket("Spiral Wound (SS/Graphite)", 3.0, 10_000.0, "1a, 1b, 1c, 1d, 2"),
        gasket("Double Jacketed (Soft Iron)", 3.75, 9_000.0, "1a, 1b, 1c, 1d, 2"),
        gasket("Double Jacketed (Stainless)", 3.75, 9_000.0, "1a, 1b, 1c, 1d, 2"),
        gasket("Kammprofile (Graphite Faced)", 2.0, 2_500.0, "1a, 1b, 1c, 1d, 2, 3"),
        gasket("Grooved Metal (Soft Iron)", 4.25, 11_000.0, "1a, 1b, 1c, 1d, 2, 3"),
        gasket("Solid Flat Metal (Soft Iron)", 5.5, 18_000.0, "1a, 1b, 1c, 1d, 2, 3, 4, 5"),
        gasket("Compressed Fiber 1/8in", 2.0, 1_600.0, "1a, 1b, 1c, 1d, 4, 5"),
        gasket("Ring Joint (Soft Iron)", 5.5, 18_000.0, "6"),
    ]
}

/// Retaining ring minimum widths by inside diameter
pub fn ring_standards() -> Vec<RingStandardSpec> {
    [
        (0.0, 350.0, 3.0, 10.0),
        (350.0, 700.0, 4.0, 12.0),
        (700.0, 1000.0, 4.5, 13.0),
        (1000.0, 1500.0, 5.0, 15.0),
        (1500.0, 2500.0, 6.0, 16.0),
    ]
    .into_iter()
    .map(
        |(id_min_mm, id_max_mm, inner_ring_min_mm, outer_ring_min_mm)| RingStandardSpec {
            id_min_mm,
            id_max_mm,
            inner_ring_min_mm,
            outer_ring_min_mm,
        },
    )
    .collect()
}

fn curve(
    id: &str,
    family: MaterialFamily,
    min_tensile_mpa: f64,
    min_yield_mpa: f64,
    allowable_mpa: Vec<Option<f64>>,
) -> MaterialStressCurve {
    MaterialStressCurve {
        id: id.to_string(),
        family,
        min_tensile_mpa,
        min_yield_mpa,
        allowable_mpa,
    }
}

fn defined(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

/// Bolting and plate allowable stress curves.
///
/// Bolt curves are aligned to [`crate::stress::BOLT_TEMP_STEPS_C`], plate
/// curves to [`crate::stress::PLATE_TEMP_STEPS_C`].
pub fn materials() -> Vec<MaterialStressCurve> {
    let mut l7 = defined(&[172.0, 172.0, 172.0, 172.0, 172.0, 172.0, 172.0, 172.0, 172.0, 172.0]);
    l7.extend([None, None, None, None]);

    let mut sa516 = defined(&[
        138.0, 138.0, 138.0, 138.0, 138.0, 138.0, 138.0, 134.0, 131.0, 127.0, 123.0, 101.0, 83.0,
        67.0, 51.0, 37.0,
    ]);
    sa516.extend([None, None]);

    vec![
        curve(
            "SA-193 B7",
            MaterialFamily::Bolt,
            862.0,
            724.0,
            defined(&[
                172.0, 172.0, 172.0, 172.0, 172.0, 172.0, 172.0, 172.0, 172.0, 172.0, 163.0,
                147.0, 127.0, 101.0,
            ]),
        ),
        curve(
            "SA-193 B16",
            MaterialFamily::Bolt,
            862.0,
            724.0,
            defined(&[
                172.0, 172.0, 172.0, 172.0, 172.0, 172.0, 172.0, 172.0, 172.0, 172.0, 168.0,
                158.0, 146.0, 131.0,
            ]),
        ),
        curve("SA-320 L7", MaterialFamily::Bolt, 862.0, 724.0, l7),
        curve(
            "SA-193 B8M Cl.2",
            MaterialFamily::Bolt,
            655.0,
            345.0,
            defined(&[
                138.0, 133.0, 128.0, 124.0, 121.0, 118.0, 117.0, 116.0, 115.0, 114.0, 113.0,
                112.0, 111.0, 110.0,
            ]),
        ),
        curve(
            "SA-240 316L",
            MaterialFamily::Plate,
            485.0,
            170.0,
            defined(&[
                115.0, 115.0, 115.0, 113.0, 110.0, 101.0, 94.0, 89.0, 87.0, 85.0, 83.0, 81.0,
                80.0, 78.0, 77.0, 76.0, 75.0, 73.0,
            ]),
        ),
        curve("SA-105", MaterialFamily::Plate, 485.0, 250.0, sa516.clone()),
        curve("SA-516 70", MaterialFamily::Plate, 485.0, 260.0, sa516),
    ]
}
