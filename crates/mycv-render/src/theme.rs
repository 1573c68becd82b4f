//! # Theme Resolution
//!
//! Maps a theme name or explicit path to a template file and the kind of
//! document it produces.

use std::fmt;
use std::path::{Path, PathBuf};

use mycv_core::CvError;

/// Template extensions searched inside a theme directory, in order.
pub const TEMPLATE_EXTENSIONS: [&str; 4] = ["tex", "html", "md", "txt"];

/// File stem of the template inside a theme directory.
pub const TEMPLATE_STEM: &str = "template";

/// Kind of document a template produces, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Latex,
    Html,
    Markdown,
    Text,
}

impl OutputKind {
    /// Classify a template path by extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, CvError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "tex" => Ok(OutputKind::Latex),
            "html" | "htm" => Ok(OutputKind::Html),
            "md" | "markdown" => Ok(OutputKind::Markdown),
            "txt" => Ok(OutputKind::Text),
            _ => Err(CvError::unsupported(path)),
        }
    }

    /// Extension of the rendered output file.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputKind::Latex => "tex",
            OutputKind::Html => "html",
            OutputKind::Markdown => "md",
            OutputKind::Text => "txt",
        }
    }

    /// Returns true if an external program can turn this kind into PDF.
    pub fn compiles_to_pdf(&self) -> bool {
        matches!(self, OutputKind::Latex | OutputKind::Html)
    }
}

/// What the caller asked to render with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateRef {
    /// A bundled or user theme under the themes directory.
    Theme(String),
    /// A template file anywhere on disk.
    Path(PathBuf),
}

impl fmt::Display for TemplateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateRef::Theme(name) => write!(f, "theme '{name}'"),
            TemplateRef::Path(path) => write!(f, "template {}", path.display()),
        }
    }
}

/// A template that exists on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    pub path: PathBuf,
    pub kind: OutputKind,
}

impl ResolvedTemplate {
    /// Name handed to the template engine. The extension drives
    /// auto-escaping, so `.html` templates are HTML-escaped.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{TEMPLATE_STEM}.{}", self.kind.extension()))
    }

    /// Read the template source.
    pub fn source(&self) -> Result<String, CvError> {
        std::fs::read_to_string(&self.path).map_err(|e| CvError::io(&self.path, e))
    }
}

impl TemplateRef {
    /// Locate the template file.
    ///
    /// # Errors
    ///
    /// `TemplateNotFound` if the theme has no template or the path does not
    /// exist; `UnsupportedFormat` if an explicit path has an unknown
    /// extension.
    pub fn resolve(&self, themes_dir: &Path) -> Result<ResolvedTemplate, CvError> {
        match self {
            TemplateRef::Theme(name) => {
                let dir = themes_dir.join(name);
                let found = TEMPLATE_EXTENSIONS
                    .iter()
                    .map(|ext| dir.join(format!("{TEMPLATE_STEM}.{ext}")))
                    .find(|candidate| candidate.is_file());
                match found {
                    Some(path) => Ok(ResolvedTemplate {
                        kind: OutputKind::from_path(&path)?,
                        path,
                    }),
                    None => Err(CvError::TemplateNotFound { path: dir }),
                }
            }
            TemplateRef::Path(path) => {
                if !path.is_file() {
                    return Err(CvError::TemplateNotFound { path: path.clone() });
                }
                Ok(ResolvedTemplate {
                    kind: OutputKind::from_path(path)?,
                    path: path.clone(),
                })
            }
        }
    }
}

/// Names of the themes under `themes_dir` that hold a template, sorted.
pub fn available_themes(themes_dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(themes_dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| TemplateRef::Theme(name.clone()).resolve(themes_dir).is_ok())
        .collect();
    names.sort();
    names
}
