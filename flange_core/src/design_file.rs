//! # Design Files
//!
//! A `DesignFile` is the saved form of one flange design: who made it, how
//! the optimizer should search, and the full input set. Design files are
//! human-readable JSON with the `.fbd` extension.
//!
//! ## Structure
//!
//! ```text
//! DesignFile
//! ├── meta: DesignMetadata (schema version, engineer, job info, timestamps)
//! ├── settings: DesignSettings (optimizer grid, table snapshot path)
//! └── inputs: FlangeDesignInputs
//! ```
//!
//! ## Example
//!
//! ```rust
//! use flange_core::design_file::DesignFile;
//!
//! let design = DesignFile::new("Jane Engineer", "25-042", "ACME Refining");
//! let json = serde_json::to_string_pretty(&design).unwrap();
//! assert!(json.contains("25-042"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculations::FlangeDesignInputs;
use crate::optimizer::OptimizerSettings;

/// Current schema version for design files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Design file extension
pub const DESIGN_EXTENSION: &str = "fbd";

/// Root container written to design files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignFile {
    pub meta: DesignMetadata,

    #[serde(default)]
    pub settings: DesignSettings,

    #[serde(default)]
    pub inputs: FlangeDesignInputs,
}

impl DesignFile {
    /// Create a design with default inputs.
    ///
    /// # Arguments
    ///
    /// * `engineer` - Name of the responsible engineer
    /// * `job_id` - Job number (e.g., "25-001")
    /// * `client` - Client name
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>, client: impl Into<String>) -> Self {
        let now = Utc::now();
        DesignFile {
            meta: DesignMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: DesignSettings::default(),
            inputs: FlangeDesignInputs::default(),
        }
    }

    /// Replace the inputs and mark the design modified.
    pub fn set_inputs(&mut self, inputs: FlangeDesignInputs) {
        self.inputs = inputs;
        self.touch();
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

impl Default for DesignFile {
    fn default() -> Self {
        DesignFile::new("", "", "")
    }
}

/// Metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    pub engineer: String,
    pub job_id: String,
    pub client: String,

    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Per-design settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSettings {
    /// Grid used by the bolting optimizer
    pub optimizer: OptimizerSettings,

    /// Only search the selected bolt size
    pub fixed_size_only: bool,

    /// Reference table snapshot to evaluate against; built-in tables if unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_design_creation() {
        let design = DesignFile::new("John Doe", "25-001", "Acme Corp");
        assert_eq!(design.meta.engineer, "John Doe");
        assert_eq!(design.meta.job_id, "25-001");
        assert_eq!(design.meta.version, SCHEMA_VERSION);
        assert_eq!(design.meta.created, design.meta.modified);
        assert_eq!(design.inputs, FlangeDesignInputs::default());
    }

    #[test]
    fn test_design_serialization() {
        let mut design = DesignFile::new("Jane Engineer", "25-042", "Test Client");
        design.settings.fixed_size_only = true;
        let json = serde_json::to_string_pretty(&design).unwrap();

        assert!(json.contains("Jane Engineer"));
        assert!(json.contains("\"fixed_size_only\": true"));
        assert!(!json.contains("tables_path"));

        let roundtrip: DesignFile = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, design);
    }

    #[test]
    fn test_missing_sections_default() {
        let json = r#"{
            "meta": {
                "version": "0.1.0",
                "engineer": "E",
                "job_id": "J",
                "client": "C",
                "created": "2025-01-01T00:00:00Z",
                "modified": "2025-01-01T00:00:00Z"
            },
            "inputs": { "bolt_count": 64 }
        }"#;
        let design: DesignFile = serde_json::from_str(json).unwrap();
        assert_eq!(design.inputs.bolt_count, 64);
        assert_eq!(design.inputs.bolt_size, "3/4");
        assert_eq!(design.settings.optimizer, OptimizerSettings::default());
    }

    #[test]
    fn test_set_inputs_touches() {
        let mut design = DesignFile::new("E", "J", "C");
        let before = design.meta.modified;
        design.set_inputs(FlangeDesignInputs {
            bolt_count: 60,
            ..Default::default()
        });
        assert_eq!(design.inputs.bolt_count, 60);
        assert!(design.meta.modified >= before);
    }
}
