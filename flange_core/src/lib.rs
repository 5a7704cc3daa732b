//! # flange_core - Flange Bolting Sizing Engine
//!
//! `flange_core` sizes the bolting of heat-exchanger channel flanges: bolt
//! circle diameter, gasket geometry, ASME VIII-1 Appendix 2 bolt loads, a
//! bolt size × count optimizer and an ASME PCC-1 assembly bolt stress check.
//! All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: every evaluation is a pure function of inputs and tables
//! - **Forgiving**: unknown table keys fall back to the first entry and are
//!   reported, never raised
//! - **Immutable tables**: reference data is a validated snapshot passed in
//! - **JSON-First**: all types implement Serialize/Deserialize
//!
//! ## Quick Start
//!
//! ```rust
//! use flange_core::{analyze, optimize, FlangeDesignInputs, ReferenceTables};
//!
//! let tables = ReferenceTables::standard();
//! let mut inputs = FlangeDesignInputs::default();
//! inputs.pcc1.enabled = true;
//!
//! let report = analyze(&inputs, tables);
//! println!("BCD {} mm, margin {:.1} %", report.result.geometry.final_bcd_mm, report.result.loads.margin_pct);
//!
//! if let Some(best) = optimize(&inputs, tables, false).best {
//!     println!("use {} x {}\"", best.bolt_count, best.bolt_size);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Shell sizing, flange geometry and bolt load balance
//! - [`optimizer`] - Bolt size × count search
//! - [`pcc1`] - PCC-1 assembly bolt stress check
//! - [`tables`] - Reference table snapshots and the built-in standard data
//! - [`stress`] - Allowable stress interpolation
//! - [`units`] - Unit conversion and type-safe unit wrappers
//! - [`design_file`] - Saved design container
//! - [`file_io`] - Atomic design/table file operations
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod design_file;
pub mod errors;
pub mod file_io;
pub mod optimizer;
pub mod pcc1;
pub mod stress;
pub mod tables;
pub mod units;

pub use calculations::{analyze, evaluate, CalculationResult, DesignReport, FlangeDesignInputs};
pub use design_file::DesignFile;
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_design, load_tables, save_design, save_tables};
pub use optimizer::{optimize, optimize_with, BoltingCandidate, OptimizationResult, OptimizerSettings};
pub use pcc1::{check_pcc1, Pcc1Check};
pub use tables::ReferenceTables;
