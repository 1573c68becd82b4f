//! # Record Validation
//!
//! Walks a [`CvRecord`] against a [`Schema`] and collects every violation.
//!
//! ## Rules
//!
//! 1. `Nested(keys)`: the content must be a mapping. Each of its keys must
//!    be in `keys`; known keys are descended into with their own rule.
//! 2. `RepeatedNested(keys)`: the content must be a sequence. Every element
//!    is checked as `Nested(keys)` under an index path segment.
//! 3. `Leaf`: anything is accepted.
//! 4. A null where a container is expected counts as an empty container.
//! 5. Sections the schema does not name are skipped (open world).
//!
//! Validation never stops at the first problem: all violations are
//! reported, in document order.

use mycv_core::{CvRecord, PathSegment, SectionContent, ValidationViolations, Violation, ViolationKind};

use crate::schema::{AllowedKey, AllowedKeys, Schema};

/// Validate every section the schema knows about.
pub fn validate_record(record: &CvRecord, schema: &Schema) -> ValidationViolations {
    let mut all = ValidationViolations::default();
    for (heading, content) in record.iter() {
        match schema.rule_for(heading) {
            Some(rule) => all.extend(validate_content(heading, content, rule)),
            None => tracing::debug!(section = heading, "section not in schema; skipping"),
        }
    }
    all
}

/// Validate one section's content against its rule.
///
/// `section` is only used to label the violations.
pub fn validate_content(section: &str, content: &SectionContent, rule: &AllowedKey) -> Vec<Violation> {
    let mut walker = Walker {
        section,
        path: Vec::new(),
        found: Vec::new(),
    };
    walker.check(content, rule);
    walker.found
}

struct Walker<'a> {
    section: &'a str,
    path: Vec<PathSegment>,
    found: Vec<Violation>,
}

impl Walker<'_> {
    fn check(&mut self, content: &SectionContent, rule: &AllowedKey) {
        match rule {
            AllowedKey::Leaf => {}
            AllowedKey::Nested(keys) => self.check_mapping(content, keys),
            AllowedKey::RepeatedNested(keys) => match content {
                SectionContent::Sequence(items) => {
                    for (i, item) in items.iter().enumerate() {
                        self.path.push(PathSegment::Index(i));
                        self.check_mapping(item, keys);
                        self.path.pop();
                    }
                }
                c if c.is_null() => {}
                other => self.shape_mismatch("sequence", other),
            },
        }
    }

    fn check_mapping(&mut self, content: &SectionContent, keys: &AllowedKeys) {
        match content {
            SectionContent::Mapping(mapping) => {
                for (key, value) in mapping.iter() {
                    self.path.push(PathSegment::Key(key.to_string()));
                    match keys.get(key) {
                        Some(rule) => self.check(value, rule),
                        None => self.found.push(Violation {
                            section: self.section.to_string(),
                            path: self.path.clone(),
                            kind: ViolationKind::UnknownKey {
                                key: key.to_string(),
                            },
                        }),
                    }
                    self.path.pop();
                }
            }
            c if c.is_null() => {}
            other => self.shape_mismatch("mapping", other),
        }
    }

    fn shape_mismatch(&mut self, expected: &'static str, found: &SectionContent) {
        self.found.push(Violation {
            section: self.section.to_string(),
            path: self.path.clone(),
            kind: ViolationKind::ShapeMismatch {
                expected,
                found: found.kind_name(),
            },
        });
    }
}
