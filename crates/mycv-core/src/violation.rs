//! # Schema Violations
//!
//! Structured description of where a CV record departs from its schema.
//! Each [`Violation`] names the section, the full path inside it and the
//! kind of departure, so a user can fix every problem in one pass.

use std::fmt;

/// One step of a path inside a section's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A mapping key.
    Key(String),
    /// A sequence index.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, ".{k}"),
            PathSegment::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// What went wrong at a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// The key is not among the allowed keys of the schema subtree.
    UnknownKey {
        /// The offending key.
        key: String,
    },
    /// The content has a different shape than the schema expects.
    ShapeMismatch {
        /// Expected shape ("mapping" or "sequence").
        expected: &'static str,
        /// Shape actually found.
        found: &'static str,
    },
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Heading of the enclosing top-level section.
    pub section: String,
    /// Path from the section root to the violating node. For an unknown
    /// key the last segment is the key itself.
    pub path: Vec<PathSegment>,
    /// Kind of violation.
    pub kind: ViolationKind,
}

impl Violation {
    /// Dotted rendering of section plus path, e.g. `education[0].extra`.
    pub fn location(&self) -> String {
        let mut out = self.section.clone();
        for segment in &self.path {
            out.push_str(&segment.to_string());
        }
        out
    }

    /// The offending key for `UnknownKey` violations.
    pub fn key(&self) -> Option<&str> {
        match &self.kind {
            ViolationKind::UnknownKey { key } => Some(key),
            ViolationKind::ShapeMismatch { .. } => None,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::UnknownKey { key } => write!(
                f,
                "  {}: key '{key}' is not allowed in section '{}'",
                self.location(),
                self.section
            ),
            ViolationKind::ShapeMismatch { expected, found } => write!(
                f,
                "  {}: expected a {expected}, found a {found}",
                self.location()
            ),
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Wrap a list of violations.
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Append violations found in another section.
    pub fn extend(&mut self, more: impl IntoIterator<Item = Violation>) {
        self.violations.extend(more);
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}
