//! # mycv-core — Foundational Types for mycv
//!
//! Defines the in-memory CV record and everything that touches it without
//! knowing about schemas or templates. Every other crate in the workspace
//! depends on `mycv-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One sum type for section content.** A section is a `Mapping`, a
//!    `Sequence` or a `Scalar`. There is no duck-typed attribute access:
//!    typed accessors are thin projections over [`CvRecord`] that return a
//!    statically-typed empty default when a section is absent.
//!
//! 2. **Source order is display order.** Both YAML and JSON inputs keep
//!    the order in which sections and keys appear in the file.
//!
//! 3. **Single error taxonomy.** [`CvError`] names every way a run can
//!    fail, from a missing data file to a LaTeX compiler exiting non-zero.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `mycv-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod format;
pub mod record;
pub mod sections;
pub mod violation;

// Re-export primary types for ergonomic imports.
pub use error::CvError;
pub use format::{parse_record, read_record, DataFormat};
pub use record::{CvRecord, Mapping, Scalar, SectionContent};
pub use sections::{KnownSection, SectionShape};
pub use violation::{PathSegment, ValidationViolations, Violation, ViolationKind};
