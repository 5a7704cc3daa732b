//! # Bolting Optimizer
//!
//! Exhaustive search over bolt size × bolt count for the feasible arrangement
//! with the smallest required bolt load.
//!
//! A candidate is feasible when its load margin is non-negative and its pitch
//! lies within `[effective spacing, max pitch]`. Sizes are visited ascending,
//! counts ascending within each size, and the first candidate reaching the
//! minimum load wins, so ties favor the smaller size and then the smaller
//! count.
//!
//! Every candidate is evaluated with manual overrides removed.
//!
//! ## Example
//!
//! ```rust
//! use flange_core::calculations::FlangeDesignInputs;
//! use flange_core::optimizer::optimize;
//! use flange_core::tables::ReferenceTables;
//!
//! let outcome = optimize(&FlangeDesignInputs::default(), ReferenceTables::standard(), false);
//! let best = outcome.best.expect("reference flange has a feasible bolting");
//! assert_eq!((best.bolt_size.as_str(), best.bolt_count), ("3/4", 60));
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::{evaluate, CalculationResult, FlangeDesignInputs};
use crate::errors::{CalcError, CalcResult};
use crate::tables::ReferenceTables;

/// Search grid for the optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerSettings {
    /// Smallest nominal diameter searched when all sizes are allowed (in)
    pub min_bolt_size_in: f64,

    /// Bolt counts tried for every size, in search order
    pub bolt_counts: Vec<u32>,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        OptimizerSettings {
            min_bolt_size_in: 0.75,
            bolt_counts: (4..=80).step_by(4).collect(),
        }
    }
}

impl OptimizerSettings {
    /// Reject grids the search cannot use: no counts, a zero count, or a
    /// negative or non-finite minimum size.
    pub fn validate(&self) -> CalcResult<()> {
        if self.bolt_counts.is_empty() {
            return Err(CalcError::invalid_input(
                "optimizer.bolt_counts",
                "[]",
                "at least one bolt count is required",
            ));
        }
        if self.bolt_counts.contains(&0) {
            return Err(CalcError::invalid_input(
                "optimizer.bolt_counts",
                format!("{:?}", self.bolt_counts),
                "bolt counts must be positive",
            ));
        }
        if !self.min_bolt_size_in.is_finite() || self.min_bolt_size_in < 0.0 {
            return Err(CalcError::invalid_input(
                "optimizer.min_bolt_size_in",
                self.min_bolt_size_in.to_string(),
                "must be a non-negative diameter in inches",
            ));
        }
        Ok(())
    }
}

/// A feasible bolting arrangement and its key figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoltingCandidate {
    pub bolt_size: String,
    pub bolt_count: u32,

    /// max(Wm1, Wm2) (N)
    pub required_load_n: f64,

    /// Available bolt load (N)
    pub available_load_n: f64,

    pub margin_pct: f64,
    pub pitch_mm: f64,
    pub final_bcd_mm: f64,
    pub flange_od_mm: f64,
}

impl BoltingCandidate {
    fn from_result(result: &CalculationResult) -> Self {
        BoltingCandidate {
            bolt_size: result.bolt_size.clone(),
            bolt_count: result.bolt_count,
            required_load_n: result.loads.required_load_n,
            available_load_n: result.loads.available_load_n,
            margin_pct: result.loads.margin_pct,
            pitch_mm: result.geometry.pitch_mm,
            final_bcd_mm: result.geometry.final_bcd_mm,
            flange_od_mm: result.geometry.flange_od_mm,
        }
    }
}

/// Outcome of one search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Best feasible candidate, `None` when nothing is feasible
    pub best: Option<BoltingCandidate>,

    /// Candidates evaluated
    pub evaluated: usize,

    /// Candidates that were feasible
    pub feasible: usize,
}

/// Search with the default grid.
///
/// With `fixed_size_only` only the currently selected bolt size is searched;
/// otherwise every size from 3/4 in upward.
pub fn optimize(
    inputs: &FlangeDesignInputs,
    tables: &ReferenceTables,
    fixed_size_only: bool,
) -> OptimizationResult {
    optimize_with(inputs, tables, fixed_size_only, &OptimizerSettings::default())
}

/// Search with a custom grid.
pub fn optimize_with(
    inputs: &FlangeDesignInputs,
    tables: &ReferenceTables,
    fixed_size_only: bool,
    settings: &OptimizerSettings,
) -> OptimizationResult {
    let sizes: Vec<&str> = if fixed_size_only {
        vec![tables.bolt_spec(&inputs.bolt_size).value.size.as_str()]
    } else {
        tables
            .bolt_specs_at_least(settings.min_bolt_size_in)
            .into_iter()
            .map(|b| b.size.as_str())
            .collect()
    };

    let mut best: Option<BoltingCandidate> = None;
    let mut evaluated = 0;
    let mut feasible = 0;

    for size in &sizes {
        for &count in &settings.bolt_counts {
            let result = evaluate(&inputs.candidate(size, count), tables);
            evaluated += 1;

            if !result.passes() {
                continue;
            }
            feasible += 1;

            let improves = best
                .as_ref()
                .map_or(true, |b| result.loads.required_load_n < b.required_load_n);
            if improves {
                best = Some(BoltingCandidate::from_result(&result));
            }
        }
    }

    debug!(
        sizes = sizes.len(),
        evaluated,
        feasible,
        best = ?best.as_ref().map(|b| (b.bolt_size.as_str(), b.bolt_count)),
        "bolting search finished"
    );

    OptimizationResult {
        best,
        evaluated,
        feasible,
    }
}
