//! # Data File Formats
//!
//! Reads CV data files into a [`CvRecord`]. The file extension selects the
//! parser: `.yaml`/`.yml` for YAML, `.json` for JSON. Both parsers keep
//! key order so sections display in source order.

use std::path::Path;

use crate::error::CvError;
use crate::record::{CvRecord, Mapping, Scalar, SectionContent};

/// Structured-text format of a data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Yaml,
    Json,
}

impl DataFormat {
    /// Select the format from a file extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `CvError::UnsupportedFormat` for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, CvError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "yaml" | "yml" => Ok(DataFormat::Yaml),
            "json" => Ok(DataFormat::Json),
            _ => Err(CvError::unsupported(path)),
        }
    }
}

/// Read a file to a string, mapping a missing file to `NotFound`.
///
/// `what` names the file in diagnostics ("CV data", "schema", ...).
pub fn read_source(path: &Path, what: &str) -> Result<String, CvError> {
    if !path.exists() {
        return Err(CvError::NotFound {
            what: what.to_string(),
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|e| CvError::io(path, e))
}

/// Load a CV data file from disk.
///
/// # Errors
///
/// `NotFound` if the file is missing, `UnsupportedFormat` for an unknown
/// extension, `ParseError` for malformed content or a non-mapping top level.
pub fn read_record(path: &Path) -> Result<CvRecord, CvError> {
    let format = DataFormat::from_path(path)?;
    let text = read_source(path, "CV data")?;
    tracing::debug!(path = %path.display(), ?format, "parsing CV data");
    parse_record(&text, format, path)
}

/// Parse CV data text. `origin` is only used in diagnostics.
pub fn parse_record(text: &str, format: DataFormat, origin: &Path) -> Result<CvRecord, CvError> {
    let parse_error = |reason: String| CvError::ParseError {
        path: origin.to_path_buf(),
        reason,
    };

    let content = match format {
        DataFormat::Yaml => {
            let value: serde_yaml::Value =
                serde_yaml::from_str(text).map_err(|e| parse_error(format!("invalid YAML: {e}")))?;
            yaml_to_content(&value).map_err(parse_error)?
        }
        DataFormat::Json => {
            let value: serde_json::Value =
                serde_json::from_str(text).map_err(|e| parse_error(format!("invalid JSON: {e}")))?;
            json_to_content(&value)
        }
    };

    match content {
        SectionContent::Mapping(sections) => Ok(CvRecord::from_mapping(sections)),
        // An empty YAML document parses to null.
        SectionContent::Scalar(Scalar::Null) => Ok(CvRecord::new()),
        other => Err(parse_error(format!(
            "top level must be a mapping of section headings, found a {}",
            other.kind_name()
        ))),
    }
}

/// Convert a `serde_yaml::Value` tree into [`SectionContent`].
///
/// Non-string keys (numbers, booleans) are stringified; tags are ignored.
pub fn yaml_to_content(yaml: &serde_yaml::Value) -> Result<SectionContent, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(SectionContent::null()),
        serde_yaml::Value::Bool(b) => Ok(SectionContent::Scalar(Scalar::Bool(*b))),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(SectionContent::Scalar(Scalar::Integer(i)))
            } else if let Some(f) = n.as_f64() {
                Ok(SectionContent::Scalar(Scalar::Float(f)))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(SectionContent::string(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<SectionContent>, String> = seq.iter().map(yaml_to_content).collect();
            Ok(SectionContent::Sequence(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut mapping = Mapping::new();
            for (k, v) in map {
                mapping.insert(yaml_key(k)?, yaml_to_content(v)?);
            }
            Ok(SectionContent::Mapping(mapping))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_content(&tagged.value),
    }
}

/// Stringify a YAML mapping key.
pub fn yaml_key(key: &serde_yaml::Value) -> Result<String, String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(format!("unsupported YAML map key type: {other:?}")),
    }
}

/// Convert a `serde_json::Value` tree into [`SectionContent`].
pub fn json_to_content(json: &serde_json::Value) -> SectionContent {
    match json {
        serde_json::Value::Null => SectionContent::null(),
        serde_json::Value::Bool(b) => SectionContent::Scalar(Scalar::Bool(*b)),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => SectionContent::Scalar(Scalar::Integer(i)),
            None => SectionContent::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN))),
        },
        serde_json::Value::String(s) => SectionContent::string(s.clone()),
        serde_json::Value::Array(items) => {
            SectionContent::Sequence(items.iter().map(json_to_content).collect())
        }
        serde_json::Value::Object(map) => SectionContent::Mapping(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_content(v)))
                .collect(),
        ),
    }
}
