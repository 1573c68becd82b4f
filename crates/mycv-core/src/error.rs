//! # Error Types — Run-Aborting Failures
//!
//! Defines [`CvError`], the single error type returned by every library
//! crate in the workspace. All variants are unrecoverable for the current
//! run: the pipeline stops at the stage where the error occurred.
//!
//! ## Design
//!
//! - Path-bearing variants always carry the offending path.
//! - Validation errors carry every violation found, not just the first.
//! - Compiler errors carry the captured stdout and stderr of the child.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::violation::ValidationViolations;

/// Top-level error type for mycv.
#[derive(Error, Debug)]
pub enum CvError {
    /// A data, schema or template file does not exist.
    #[error("{what} file not found: {}", .path.display())]
    NotFound {
        /// What kind of file was expected ("CV data", "schema", ...).
        what: String,
        /// The path that was looked up.
        path: PathBuf,
    },

    /// The content of a file is not well-formed structured text.
    #[error("parse error in {}: {reason}", .path.display())]
    ParseError {
        /// The file being parsed.
        path: PathBuf,
        /// Parser diagnostic.
        reason: String,
    },

    /// The record does not conform to the schema.
    #[error("CV data validation failed with {} violation(s):\n{violations}", .violations.len())]
    ValidationError {
        /// Every violation found, in document order.
        violations: ValidationViolations,
    },

    /// The requested template or theme does not exist.
    #[error("template not found: {}", .path.display())]
    TemplateNotFound {
        /// The template path that was looked up.
        path: PathBuf,
    },

    /// The templating engine failed during substitution.
    #[error("failed to render template {template}: {reason}")]
    TemplateRenderError {
        /// Template name or path.
        template: String,
        /// Engine diagnostic, including the line number when known.
        reason: String,
    },

    /// The external document compiler exited unsuccessfully.
    #[error("{program} failed on {} ({status}){}", .file.display(), diagnostic(.stdout, .stderr))]
    CompileError {
        /// The compiler program that was invoked.
        program: String,
        /// The input file handed to the compiler.
        file: PathBuf,
        /// Exit status or failure description.
        status: String,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
    },

    /// A file extension is not recognised at this boundary.
    #[error("unsupported format '{extension}' for {}", .path.display())]
    UnsupportedFormat {
        /// The file whose extension was rejected.
        path: PathBuf,
        /// The rejected extension (empty when there was none).
        extension: String,
    },

    /// A required font or external tool is not present on the host.
    #[error("missing resource {resource}: {detail}")]
    MissingResource {
        /// The font path or program name.
        resource: String,
        /// What was tried.
        detail: String,
    },

    /// IO error while reading or writing a file.
    #[error("io error on {}: {source}", .path.display())]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl CvError {
    /// Wrap an IO error with the path it occurred on.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        CvError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Build an `UnsupportedFormat` error from a path's extension.
    pub fn unsupported(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        CvError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }

    /// Returns the accumulated violations if this is a validation failure.
    pub fn violations(&self) -> Option<&ValidationViolations> {
        match self {
            CvError::ValidationError { violations } => Some(violations),
            _ => None,
        }
    }
}

fn diagnostic(stdout: &str, stderr: &str) -> String {
    let mut out = String::new();
    for (label, text) in [("stdout", stdout), ("stderr", stderr)] {
        let text = text.trim();
        if !text.is_empty() {
            out.push_str(&format!("\n--- {label} ---\n{text}"));
        }
    }
    out
}
