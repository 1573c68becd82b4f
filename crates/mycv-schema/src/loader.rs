//! # CV Loader
//!
//! Reads a data file and a schema file from disk, validates the record,
//! and returns it only if every known section conforms.

use std::path::{Path, PathBuf};

use mycv_core::{read_record, CvError, CvRecord};

use crate::schema::Schema;
use crate::validate::validate_record;

/// A record that has been read (and, when a schema was given, validated).
#[derive(Debug, Clone)]
pub struct LoadedCv {
    /// The parsed record.
    pub record: CvRecord,
    /// Where the record was read from.
    pub data_path: PathBuf,
    /// The schema it was validated against, if any.
    pub schema_path: Option<PathBuf>,
}

impl LoadedCv {
    /// Returns true if the record was checked against a schema.
    pub fn is_validated(&self) -> bool {
        self.schema_path.is_some()
    }
}

/// Entry point for loading CV data.
#[derive(Debug, Default, Clone, Copy)]
pub struct CvLoader;

impl CvLoader {
    /// Load and validate.
    ///
    /// # Errors
    ///
    /// - `NotFound` if either path is missing.
    /// - `UnsupportedFormat` if the data file extension is not YAML or JSON.
    /// - `ParseError` if either file is malformed.
    /// - `ValidationError` with every violation if the record does not
    ///   conform to the schema.
    pub fn load(data_path: &Path, schema_path: &Path) -> Result<LoadedCv, CvError> {
        let schema = Schema::load(schema_path)?;
        let record = read_record(data_path)?;

        let violations = validate_record(&record, &schema);
        if !violations.is_empty() {
            tracing::debug!(
                data = %data_path.display(),
                count = violations.len(),
                "CV data failed validation"
            );
            return Err(CvError::ValidationError { violations });
        }

        tracing::debug!(
            data = %data_path.display(),
            schema = %schema_path.display(),
            sections = record.len(),
            "CV data validated"
        );
        Ok(LoadedCv {
            record,
            data_path: data_path.to_path_buf(),
            schema_path: Some(schema_path.to_path_buf()),
        })
    }

    /// Load without validating.
    pub fn load_unchecked(data_path: &Path) -> Result<LoadedCv, CvError> {
        let record = read_record(data_path)?;
        tracing::debug!(data = %data_path.display(), "loaded CV data without validation");
        Ok(LoadedCv {
            record,
            data_path: data_path.to_path_buf(),
            schema_path: None,
        })
    }

    /// [`load`](Self::load) when a schema is given, otherwise
    /// [`load_unchecked`](Self::load_unchecked).
    pub fn load_with(data_path: &Path, schema_path: Option<&Path>) -> Result<LoadedCv, CvError> {
        match schema_path {
            Some(schema) => Self::load(data_path, schema),
            None => Self::load_unchecked(data_path),
        }
    }
}
