//! # Flangebolt CLI
//!
//! Command-line front end for `flange_core`. Reads a design file, evaluates
//! or optimizes it against the built-in or an imported table snapshot, and
//! prints a report (or JSON with `--json`).
//!
//! Log level is taken from `RUST_LOG` (default `info`); logs go to stderr.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use flange_core::calculations::{analyze, CalculationResult, DesignReport};
use flange_core::design_file::{DesignFile, DESIGN_EXTENSION};
use flange_core::file_io::{load_design, load_tables, save_design, save_tables};
use flange_core::optimizer::{optimize_with, OptimizationResult};
use flange_core::pcc1::Pcc1Check;
use flange_core::tables::ReferenceTables;

#[derive(Parser)]
#[command(name = "flange_cli")]
#[command(about = "Flangebolt CLI - Flange bolting sizing and PCC-1 checks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the bolting of a design
    Evaluate {
        /// Path to the design file
        design: PathBuf,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Search bolt size and count for the lightest feasible bolting
    Optimize {
        /// Path to the design file
        design: PathBuf,
        /// Only search the bolt size selected in the design
        #[arg(long)]
        fixed_size: bool,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Evaluate and run the PCC-1 assembly bolt stress check
    Pcc1 {
        /// Path to the design file
        design: PathBuf,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Write a design file with default inputs
    Template {
        /// Output path for the design file (`.fbd` added when no extension)
        output: PathBuf,
        #[arg(long, default_value = "")]
        engineer: String,
        #[arg(long, default_value = "")]
        job_id: String,
        #[arg(long, default_value = "")]
        client: String,
    },
    /// Export the built-in reference tables as JSON
    Tables {
        /// Output path for the table snapshot
        output: PathBuf,
    },
}

#[derive(clap::Args)]
struct CommonArgs {
    /// Reference table snapshot (overrides the design's tables_path)
    #[arg(long)]
    tables: Option<PathBuf>,
    /// Print JSON instead of a report
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate { design, common } => cmd_evaluate(&design, &common, false),
        Commands::Pcc1 { design, common } => cmd_evaluate(&design, &common, true),
        Commands::Optimize {
            design,
            fixed_size,
            common,
        } => cmd_optimize(&design, fixed_size, &common),
        Commands::Template {
            output,
            engineer,
            job_id,
            client,
        } => cmd_template(&output, engineer, job_id, client),
        Commands::Tables { output } => cmd_tables(&output),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_evaluate(design_path: &Path, common: &CommonArgs, force_pcc1: bool) -> Result<()> {
    let design = open_design(design_path)?;
    let tables = resolve_tables(&design, common)?;

    let mut inputs = design.inputs.clone();
    if force_pcc1 {
        inputs.pcc1.enabled = true;
    }
    let report = analyze(&inputs, &tables);

    if common.json {
        return print_json(&report);
    }

    print_header(&design);
    print_result(&report.result);
    if let Some(check) = &report.pcc1 {
        print_pcc1(check);
    }
    print_verdict(&report);
    Ok(())
}

fn cmd_optimize(design_path: &Path, fixed_size: bool, common: &CommonArgs) -> Result<()> {
    let design = open_design(design_path)?;
    let tables = resolve_tables(&design, common)?;

    let fixed_size_only = fixed_size || design.settings.fixed_size_only;
    let outcome = optimize_with(&design.inputs, &tables, fixed_size_only, &design.settings.optimizer);

    if common.json {
        return print_json(&outcome);
    }

    print_header(&design);
    print_optimization(&outcome, fixed_size_only);
    Ok(())
}

fn cmd_template(output: &Path, engineer: String, job_id: String, client: String) -> Result<()> {
    let output = design_path(output);
    let design = DesignFile::new(engineer, job_id, client);
    save_design(&design, &output)
        .with_context(|| format!("failed to write design template to {}", output.display()))?;
    println!("[OK] Wrote design template to {}", output.display());
    Ok(())
}

/// Append `.fbd` when the path has no extension.
fn design_path(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(DESIGN_EXTENSION)
    }
}

fn cmd_tables(output: &Path) -> Result<()> {
    save_tables(ReferenceTables::standard(), output)
        .with_context(|| format!("failed to export reference tables to {}", output.display()))?;
    println!("[OK] Wrote reference tables to {}", output.display());
    Ok(())
}

fn open_design(path: &Path) -> Result<DesignFile> {
    load_design(path).with_context(|| format!("failed to load design {}", path.display()))
}

/// `--tables`, else the design's `tables_path`, else the built-in snapshot.
fn resolve_tables(design: &DesignFile, common: &CommonArgs) -> Result<Cow<'static, ReferenceTables>> {
    let path = common
        .tables
        .clone()
        .or_else(|| design.settings.tables_path.as_ref().map(PathBuf::from));

    match path {
        Some(path) => {
            let tables = load_tables(&path)
                .with_context(|| format!("failed to load reference tables {}", path.display()))?;
            Ok(Cow::Owned(tables))
        }
        None => Ok(Cow::Borrowed(ReferenceTables::standard())),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[FAIL]"
    }
}

fn rule() {
    println!("═══════════════════════════════════════════════");
}

fn print_header(design: &DesignFile) {
    let inputs = &design.inputs;
    rule();
    println!("  {}", inputs.label);
    if !design.meta.job_id.is_empty() {
        println!("  Job {}  {}", design.meta.job_id, design.meta.client);
    }
    rule();
    println!();
    println!("Input:");
    println!(
        "  Pressure:    {} {}  ({:.3} MPa)",
        inputs.design_pressure,
        inputs.pressure_unit,
        inputs.pressure_mpa()
    );
    println!(
        "  Temperature: {} {}  ({:.1} °C)",
        inputs.design_temperature,
        inputs.temperature_unit,
        inputs.temperature_c()
    );
    println!("  ID / CA:     {:.0} mm / {:.1} mm", inputs.inside_diameter_mm, inputs.corrosion_allowance_mm);
    println!("  Gasket:      {} ({})", inputs.gasket, inputs.facing_sketch.display_name());
    println!("  Bolting:     {} x {}\" {}", inputs.bolt_count, inputs.bolt_size, inputs.bolt_material);
    println!();
}

fn print_result(result: &CalculationResult) {
    let shell = &result.shell;
    let geo = &result.geometry;
    let loads = &result.loads;

    for fallback in &result.fallbacks {
        println!(
            "  [WARN] {} '{}' not found, using '{}'",
            fallback.table, fallback.requested, fallback.substituted
        );
    }
    if !result.fallbacks.is_empty() {
        println!();
    }

    println!("Shell:");
    println!("  t required = {:.2} mm, g0 = {:.0} mm, g1 = {:.1} mm", shell.required_thickness_mm, shell.nominal_thickness_mm, shell.hub_thickness_mm);
    println!(
        "  Hoop stress {:.1} / {:.1} MPa {}",
        shell.hoop_stress_mpa,
        shell.allowable_stress_mpa,
        status_icon(shell.hoop_stress_mpa <= shell.allowable_stress_mpa)
    );
    println!();

    println!("Geometry:");
    println!("  BCD method 1 (spacing):  {:.0} mm", geo.bcd_method1_mm);
    println!("  BCD method 2 (hub + R):  {:.0} mm", geo.bcd_method2_mm);
    println!("  BCD method 3 (gasket):   {:.0} mm", geo.bcd_method3_mm);
    println!("  Final BCD:               {:.0} mm ({})", geo.final_bcd_mm, geo.bcd_source.display_name());
    println!("  Flange OD:               {:.0} mm", geo.flange_od_mm);
    println!("  Seating ID / OD:         {:.1} / {:.1} mm", geo.seating_id_mm, geo.seating_od_mm);
    println!("  Gasket ID / OD:          {:.1} / {:.1} mm", geo.gasket_id_mm, geo.gasket_od_mm);
    println!(
        "  Pitch:                   {:.1} mm ({:.1} .. {:.1}) {}",
        geo.pitch_mm,
        geo.effective_spacing_mm,
        geo.max_pitch_mm,
        status_icon(geo.pitch_ok)
    );
    println!();

    println!("Loads:");
    println!("  b = {:.2} mm, G = {:.1} mm", loads.effective_width_mm, loads.gasket_diameter_mm);
    println!("  Wm1 = {:.0} N (H {:.0} + Hp {:.0})", loads.wm1_n, loads.hydrostatic_end_force_n, loads.gasket_reaction_n);
    println!("  Wm2 = {:.0} N", loads.wm2_n);
    println!("  Sb ambient / design = {:.0} / {:.0} MPa", loads.ambient_stress_mpa, loads.design_stress_mpa);
    println!("  Am = {:.0} mm², Ab = {:.0} mm²", loads.required_area_mm2, loads.total_bolt_area_mm2);
    println!(
        "  Margin: {:.1} % {}",
        loads.margin_pct,
        status_icon(loads.is_safe)
    );
    println!();
}

fn print_pcc1(check: &Pcc1Check) {
    println!("PCC-1:");
    println!(
        "  Sb selected = {:.1} MPa (initial {:.1} MPa)",
        check.selected_bolt_stress_mpa, check.initial_bolt_stress_mpa
    );
    for (label, step) in check.steps() {
        println!("  {:<34} {:>8.1} MPa {}", label, step.threshold_mpa, status_icon(step.pass));
    }
    println!();
}

fn print_verdict(report: &DesignReport) {
    rule();
    println!("  RESULT: {}", if report.passes() { "PASS" } else { "FAIL" });
    rule();
}

fn print_optimization(outcome: &OptimizationResult, fixed_size_only: bool) {
    println!(
        "Search: {} ({} candidates, {} feasible)",
        if fixed_size_only { "selected size only" } else { "all sizes" },
        outcome.evaluated,
        outcome.feasible
    );
    println!();
    rule();
    match &outcome.best {
        Some(best) => {
            println!("  BEST: {} x {}\"", best.bolt_count, best.bolt_size);
            rule();
            println!("  Required load: {:.0} N", best.required_load_n);
            println!("  Margin:        {:.1} %", best.margin_pct);
            println!("  BCD / OD:      {:.0} / {:.0} mm", best.final_bcd_mm, best.flange_od_mm);
            println!("  Pitch:         {:.1} mm", best.pitch_mm);
        }
        None => {
            println!("  No feasible bolting found");
            rule();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_path_gets_design_extension() {
        assert_eq!(design_path(Path::new("e101")), Path::new("e101.fbd"));
        assert_eq!(design_path(Path::new("out/e101.json")), Path::new("out/e101.json"));
    }
}
