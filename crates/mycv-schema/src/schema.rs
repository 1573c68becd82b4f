//! # Allowed-Keys Schema
//!
//! Parses the YAML schema file into an explicit recursive tree.
//!
//! ## File Format
//!
//! ```yaml
//! personal_info:        # Nested: a mapping with these keys
//!   name:
//!   email:
//! education:            # RepeatedNested: a list of mappings
//!   - degree:
//!     institution:
//!     notes: []         # Leaf: list of free values
//! about: ~              # Leaf: anything
//! ```
//!
//! A scalar (including null) is a `Leaf`. A mapping is `Nested`. A
//! single-element sequence holding a mapping is `RepeatedNested`. An empty
//! sequence, or one holding a single scalar, is a `Leaf`. Any other
//! sequence is a malformed schema.

use std::collections::BTreeMap;
use std::path::Path;

use mycv_core::format::{read_source, yaml_key};
use mycv_core::CvError;

/// Constraint on the value stored under an allowed key.
#[derive(Debug, Clone, PartialEq)]
pub enum AllowedKey {
    /// Key allowed, no constraint on its value.
    Leaf,
    /// Value must be a mapping satisfying these keys.
    Nested(AllowedKeys),
    /// Value must be a sequence whose every element satisfies these keys.
    RepeatedNested(AllowedKeys),
}

/// A set of allowed keys, each with its own constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllowedKeys {
    keys: BTreeMap<String, AllowedKey>,
}

impl AllowedKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow a key with the given constraint.
    pub fn insert(&mut self, key: impl Into<String>, rule: AllowedKey) {
        self.keys.insert(key.into(), rule);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, rule: AllowedKey) -> Self {
        self.insert(key, rule);
        self
    }

    pub fn get(&self, key: &str) -> Option<&AllowedKey> {
        self.keys.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    /// Allowed key names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromIterator<(String, AllowedKey)> for AllowedKeys {
    fn from_iter<I: IntoIterator<Item = (String, AllowedKey)>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

/// Section heading → allowed-keys tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    sections: BTreeMap<String, AllowedKey>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rule for a section.
    pub fn insert_section(&mut self, heading: impl Into<String>, rule: AllowedKey) {
        self.sections.insert(heading.into(), rule);
    }

    /// Builder form of [`insert_section`](Self::insert_section).
    pub fn with_section(mut self, heading: impl Into<String>, rule: AllowedKey) -> Self {
        self.insert_section(heading, rule);
        self
    }

    /// The rule for a section, or `None` if the schema does not know it.
    pub fn rule_for(&self, heading: &str) -> Option<&AllowedKey> {
        self.sections.get(heading)
    }

    /// Headings the schema constrains, sorted.
    pub fn headings(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Load a schema file from disk.
    ///
    /// # Errors
    ///
    /// `NotFound` if the file is missing, `ParseError` if it is not valid
    /// YAML or does not describe an allowed-keys tree.
    pub fn load(path: &Path) -> Result<Self, CvError> {
        let text = read_source(path, "schema")?;
        tracing::debug!(path = %path.display(), "parsing schema");
        Self::from_yaml_str(&text, path)
    }

    /// Parse schema text. `origin` is only used in diagnostics.
    pub fn from_yaml_str(text: &str, origin: &Path) -> Result<Self, CvError> {
        let parse_error = |reason: String| CvError::ParseError {
            path: origin.to_path_buf(),
            reason,
        };

        let value: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| parse_error(format!("invalid YAML: {e}")))?;

        let mut schema = Schema::new();
        match &value {
            serde_yaml::Value::Null => {}
            serde_yaml::Value::Mapping(map) => {
                for (k, v) in map {
                    let heading = yaml_key(k).map_err(parse_error)?;
                    let rule = parse_rule(v, &heading).map_err(parse_error)?;
                    schema.insert_section(heading, rule);
                }
            }
            _ => {
                return Err(parse_error(
                    "schema top level must be a mapping of section headings".to_string(),
                ))
            }
        }
        Ok(schema)
    }
}

fn parse_rule(value: &serde_yaml::Value, at: &str) -> Result<AllowedKey, String> {
    match value {
        serde_yaml::Value::Mapping(map) => Ok(AllowedKey::Nested(parse_keys(map, at)?)),
        serde_yaml::Value::Sequence(seq) => match seq.as_slice() {
            [] => Ok(AllowedKey::Leaf),
            [serde_yaml::Value::Mapping(map)] => Ok(AllowedKey::RepeatedNested(parse_keys(map, at)?)),
            [serde_yaml::Value::Sequence(_)] => Err(format!(
                "schema entry '{at}': nested sequences are not supported"
            )),
            [_scalar] => Ok(AllowedKey::Leaf),
            _ => Err(format!(
                "schema entry '{at}': a sequence must hold exactly one element, found {}",
                seq.len()
            )),
        },
        serde_yaml::Value::Tagged(tagged) => parse_rule(&tagged.value, at),
        _ => Ok(AllowedKey::Leaf),
    }
}

fn parse_keys(map: &serde_yaml::Mapping, at: &str) -> Result<AllowedKeys, String> {
    let mut keys = AllowedKeys::new();
    for (k, v) in map {
        let key = yaml_key(k)?;
        let rule = parse_rule(v, &format!("{at}.{key}"))?;
        keys.insert(key, rule);
    }
    Ok(keys)
}
