//! # CV Record Model
//!
//! The in-memory representation of a loaded CV: an ordered mapping from
//! section heading to [`SectionContent`]. Content is a closed sum type, so
//! every consumer matches on `Mapping`, `Sequence` or `Scalar` instead of
//! probing dynamically.
//!
//! ## Ordering
//!
//! [`Mapping`] keeps insertion order. Sections render in the order they
//! appear in the source file, and keys inside a section likewise.

use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// An explicit null (`~` or an empty YAML value).
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Integer(i64),
    /// A floating-point number.
    Float(f64),
    /// A string.
    String(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Integer(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

/// Insertion-ordered string-keyed mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping {
    entries: Vec<(String, SectionContent)>,
}

impl Mapping {
    /// Create an empty mapping.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert a key. An existing key keeps its position and has its value
    /// replaced; the previous value is returned.
    pub fn insert(&mut self, key: impl Into<String>, value: SectionContent) -> Option<SectionContent> {
        let key = key.into();
        if let Some((_, slot)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(slot, value));
        }
        self.entries.push((key, value));
        None
    }

    /// Look up a key.
    pub fn get(&self, key: &str) -> Option<&SectionContent> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns true if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SectionContent)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, SectionContent)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (String, SectionContent)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (k, v) in iter {
            mapping.insert(k, v);
        }
        mapping
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Content of a section or of any node below it.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionContent {
    /// Keyed content such as `personal_info`.
    Mapping(Mapping),
    /// List content such as `education`.
    Sequence(Vec<SectionContent>),
    /// A leaf value.
    Scalar(Scalar),
}

impl SectionContent {
    /// Shorthand for a string scalar.
    pub fn string(s: impl Into<String>) -> Self {
        SectionContent::Scalar(Scalar::String(s.into()))
    }

    /// Shorthand for a null scalar.
    pub fn null() -> Self {
        SectionContent::Scalar(Scalar::Null)
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            SectionContent::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[SectionContent]> {
        match self {
            SectionContent::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            SectionContent::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true for an explicit null.
    pub fn is_null(&self) -> bool {
        matches!(self, SectionContent::Scalar(Scalar::Null))
    }

    /// Look up a key if this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&SectionContent> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    /// Shape name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SectionContent::Mapping(_) => "mapping",
            SectionContent::Sequence(_) => "sequence",
            SectionContent::Scalar(Scalar::Null) => "null",
            SectionContent::Scalar(_) => "scalar",
        }
    }

    /// Nesting depth: 0 for a scalar, 1 + deepest child for containers.
    pub fn depth(&self) -> usize {
        match self {
            SectionContent::Scalar(_) => 0,
            SectionContent::Mapping(m) => 1 + m.iter().map(|(_, v)| v.depth()).max().unwrap_or(0),
            SectionContent::Sequence(s) => 1 + s.iter().map(SectionContent::depth).max().unwrap_or(0),
        }
    }

    /// Compact single-line string form of the whole subtree.
    ///
    /// Scalars print bare, sequences as `[a, b]`, mappings as `{k: v}`.
    pub fn flatten(&self) -> String {
        match self {
            SectionContent::Scalar(s) => s.to_string(),
            SectionContent::Sequence(items) => {
                let inner: Vec<String> = items.iter().map(SectionContent::flatten).collect();
                format!("[{}]", inner.join(", "))
            }
            SectionContent::Mapping(m) => {
                let inner: Vec<String> = m
                    .iter()
                    .map(|(k, v)| format!("{k}: {}", v.flatten()))
                    .collect();
                format!("{{{}}}", inner.join(", "))
            }
        }
    }
}

impl Serialize for SectionContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SectionContent::Mapping(m) => m.serialize(serializer),
            SectionContent::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            SectionContent::Scalar(Scalar::Null) => serializer.serialize_unit(),
            SectionContent::Scalar(Scalar::Bool(b)) => serializer.serialize_bool(*b),
            SectionContent::Scalar(Scalar::Integer(i)) => serializer.serialize_i64(*i),
            SectionContent::Scalar(Scalar::Float(x)) => serializer.serialize_f64(*x),
            SectionContent::Scalar(Scalar::String(s)) => serializer.serialize_str(s),
        }
    }
}

/// A loaded CV: section heading → content, in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CvRecord {
    sections: Mapping,
}

impl CvRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-parsed top-level mapping.
    pub fn from_mapping(sections: Mapping) -> Self {
        Self { sections }
    }

    /// Add or replace a section.
    pub fn insert_section(&mut self, heading: impl Into<String>, content: SectionContent) {
        self.sections.insert(heading, content);
    }

    /// Generic section lookup. Never fails on a missing heading.
    pub fn get_section(&self, heading: &str) -> Option<&SectionContent> {
        self.sections.get(heading)
    }

    /// All section headings in source order.
    pub fn headings(&self) -> Vec<&str> {
        self.sections.keys().collect()
    }

    /// Sections in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SectionContent)> {
        self.sections.iter()
    }

    /// The whole record as a mapping.
    pub fn as_mapping(&self) -> &Mapping {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// A key inside a mapping-shaped section, e.g. `("personal_info", "name")`.
    pub fn get_field(&self, heading: &str, key: &str) -> Option<&SectionContent> {
        self.get_section(heading).and_then(|s| s.get(key))
    }

    /// Dotted lookup through mappings and sequence indices,
    /// e.g. `education.0.institution`.
    pub fn get_path(&self, path: &str) -> Option<&SectionContent> {
        let mut parts = path.split('.');
        let mut node = self.get_section(parts.next()?)?;
        for part in parts {
            node = match node {
                SectionContent::Mapping(m) => m.get(part)?,
                SectionContent::Sequence(items) => items.get(part.parse::<usize>().ok()?)?,
                SectionContent::Scalar(_) => return None,
            };
        }
        Some(node)
    }
}

impl Serialize for CvRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.sections.serialize(serializer)
    }
}
