//! # File I/O Module
//!
//! Design files and reference table snapshots on disk:
//! - **Atomic saves**: write to `.tmp`, sync, rename over the target
//! - **Version validation**: design files must match the schema major version
//! - **Table validation**: snapshots are re-validated on load
//!
//! ## Example
//!
//! ```rust,no_run
//! use flange_core::design_file::DesignFile;
//! use flange_core::file_io::{load_design, save_design};
//! use std::path::Path;
//!
//! let design = DesignFile::new("Engineer", "25-001", "Client");
//! save_design(&design, Path::new("e101.fbd"))?;
//! let loaded = load_design(Path::new("e101.fbd"))?;
//! # Ok::<(), flange_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::design_file::{DesignFile, SCHEMA_VERSION};
use crate::errors::{CalcError, CalcResult};
use crate::tables::ReferenceTables;

/// Save a design file with atomic write semantics.
pub fn save_design(design: &DesignFile, path: &Path) -> CalcResult<()> {
    write_json_atomic(design, path)?;
    info!(path = %path.display(), job_id = %design.meta.job_id, "saved design");
    Ok(())
}

/// Load a design file.
///
/// # Returns
///
/// * `Ok(DesignFile)` - Successfully loaded design
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::InvalidInput)` - Optimizer grid is unusable
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_design(path: &Path) -> CalcResult<DesignFile> {
    let design: DesignFile = read_json(path)?;
    validate_version(&design.meta.version)?;
    design.settings.optimizer.validate()?;
    info!(path = %path.display(), job_id = %design.meta.job_id, "loaded design");
    Ok(design)
}

/// Export a reference table snapshot.
pub fn save_tables(tables: &ReferenceTables, path: &Path) -> CalcResult<()> {
    write_json_atomic(tables, path)?;
    info!(
        path = %path.display(),
        materials = tables.materials().len(),
        bolt_specs = tables.bolt_specs().len(),
        "saved reference tables"
    );
    Ok(())
}

/// Import a reference table snapshot.
///
/// The snapshot is validated while parsing; a snapshot that breaks a table
/// invariant fails with the `InvalidTable` reason inside a
/// `SerializationError`.
pub fn load_tables(path: &Path) -> CalcResult<ReferenceTables> {
    let tables: ReferenceTables = read_json(path)?;
    info!(
        path = %path.display(),
        materials = tables.materials().len(),
        bolt_specs = tables.bolt_specs().len(),
        "loaded reference tables"
    );
    Ok(tables)
}

/// Serialize, write to `<path>.tmp`, sync, then rename into place.
fn write_json_atomic<T: Serialize>(value: &T, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> CalcResult<T> {
    let mut file = File::open(path)
        .map_err(|e| CalcError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}

/// `design.fbd` -> `design.fbd.tmp`
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x, a newer minor version is not readable
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    fn temp_path(name: &str, extension: &str) -> PathBuf {
        temp_dir().join(format!("flange_core_test_{}_{}.{}", name, std::process::id(), extension))
    }

    #[test]
    fn test_tmp_path_appends_suffix() {
        assert_eq!(
            tmp_path_for(Path::new("/path/to/e101.fbd")),
            Path::new("/path/to/e101.fbd.tmp")
        );
    }

    #[test]
    fn test_design_roundtrip() {
        let path = temp_path("design_roundtrip", "fbd");

        let mut design = DesignFile::new("Test Engineer", "TEST-001", "Test Client");
        design.inputs.bolt_count = 60;
        save_design(&design, &path).unwrap();

        let loaded = load_design(&path).unwrap();
        assert_eq!(loaded, design);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_path("atomic", "fbd");

        save_design(&DesignFile::new("T", "T", "C"), &path).unwrap();
        assert!(!tmp_path_for(&path).exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_design(&temp_path("does_not_exist", "fbd")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_load_rejects_newer_schema() {
        let path = temp_path("newer_schema", "fbd");

        let mut design = DesignFile::new("T", "T", "C");
        design.meta.version = "0.9.0".to_string();
        save_design(&design, &path).unwrap();

        let err = load_design(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_empty_bolt_count_grid() {
        let path = temp_path("empty_grid", "fbd");

        let mut design = DesignFile::new("T", "T", "C");
        design.settings.optimizer.bolt_counts.clear();
        save_design(&design, &path).unwrap();

        let err = load_design(&path).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_tables_roundtrip() {
        let path = temp_path("tables_roundtrip", "json");

        save_tables(ReferenceTables::standard(), &path).unwrap();
        let loaded = load_tables(&path).unwrap();
        assert_eq!(&loaded, ReferenceTables::standard());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_invalid_tables() {
        let path = temp_path("invalid_tables", "json");
        fs::write(
            &path,
            r#"{ "materials": [], "bolt_specs": [], "gaskets": [], "ring_standards": [] }"#,
        )
        .unwrap();

        let err = load_tables(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
        assert!(err.to_string().contains("empty"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }
}
