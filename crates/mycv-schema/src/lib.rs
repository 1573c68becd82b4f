//! # mycv-schema — Allowed-Keys Validation
//!
//! Checks a CV record against a schema that lists, per section, which keys
//! may appear and how deep they nest.
//!
//! ## Schema Tree (`schema`)
//!
//! A schema maps section headings to an [`AllowedKey`]:
//!
//! - `Leaf`: anything goes below this point.
//! - `Nested(keys)`: the value must be a mapping whose keys are in `keys`.
//! - `RepeatedNested(keys)`: the value must be a sequence of such mappings.
//!
//! ## Validation (`validate`)
//!
//! [`validate_record`] is a pure function: no file I/O, no early exit.
//! It returns every [`Violation`](mycv_core::Violation) it finds, each with
//! the full path to the offending key. Sections the schema does not name
//! are always valid.
//!
//! ## Loading (`loader`)
//!
//! [`CvLoader`] ties it together: read data + schema from disk, validate,
//! and hand back a record the renderer can trust.

pub mod loader;
pub mod schema;
pub mod validate;

pub use loader::{CvLoader, LoadedCv};
pub use schema::{AllowedKey, AllowedKeys, Schema};
pub use validate::{validate_content, validate_record};
