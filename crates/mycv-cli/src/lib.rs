//! # mycv-cli — The `mycv` Command
//!
//! Wires the loader to the renderer:
//!
//! ```bash
//! mycv --yaml data/mycv.yaml --schema settings/schema.yaml --to pdf
//! mycv --yaml cv.json --theme fancy --to source --output site/
//! mycv --yaml cv.yaml --validate-only
//! mycv --yaml cv.yaml --list-sections
//! ```
//!
//! ## Exit Codes
//!
//! `0` on success, `1` on any load, validation, render or compile failure.
//! Diagnostics go to stderr; produced paths go to stdout.
//!
//! ## Configuration
//!
//! Defaults come from `.mycv.yaml` in the working directory, or the file
//! given with `--config`. Command-line flags always win.

pub mod config;
pub mod generate;

use std::path::{Path, PathBuf};

/// Resolve a path that may be relative to the project root.
///
/// Absolute paths are returned as-is. A relative path that exists under
/// `root` resolves there; otherwise it is returned unchanged.
pub fn resolve_path(path: &Path, root: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let rooted = root.join(path);
    if rooted.exists() {
        rooted
    } else {
        path.to_path_buf()
    }
}
