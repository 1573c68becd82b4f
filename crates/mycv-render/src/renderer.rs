//! # Renderer
//!
//! Writes rendered documents into an output directory. Every method
//! creates the directory (recursively, idempotently) before writing and
//! renders fully in memory first, so a failed render leaves no file.

use std::path::{Path, PathBuf};

use mycv_core::{CvError, CvRecord, SectionContent};

use crate::pdf::{draw_pdf, FontConfig};
use crate::template::render_template;
use crate::text::render_outline;
use crate::theme::{ResolvedTemplate, TemplateRef};

/// Default output base name.
pub const DEFAULT_NAME: &str = "cv";

/// Renders records into `<output_dir>/<name>.<ext>`.
#[derive(Debug, Clone)]
pub struct Renderer {
    themes_dir: PathBuf,
    output_dir: PathBuf,
    name: String,
}

impl Renderer {
    /// A renderer writing to `output_dir` with themes under `themes/`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            themes_dir: PathBuf::from("themes"),
            output_dir: output_dir.into(),
            name: DEFAULT_NAME.to_string(),
        }
    }

    pub fn with_themes_dir(mut self, themes_dir: impl Into<PathBuf>) -> Self {
        self.themes_dir = themes_dir.into();
        self
    }

    /// Output base name (default `cv`).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn themes_dir(&self) -> &Path {
        &self.themes_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve a template reference against this renderer's themes dir.
    pub fn resolve(&self, template: &TemplateRef) -> Result<ResolvedTemplate, CvError> {
        template.resolve(&self.themes_dir)
    }

    /// Render the whole record and return the written file.
    ///
    /// # Errors
    ///
    /// `TemplateNotFound`, `TemplateRenderError`, or `Io` on write failure.
    pub fn render(&self, record: &CvRecord, template: &TemplateRef) -> Result<PathBuf, CvError> {
        let resolved = self.resolve(template)?;
        let file_name = format!("{}.{}", self.name, resolved.kind.extension());
        self.render_resolved(record, &resolved, None, &file_name)
    }

    /// Render one section with the section bound as `section`.
    ///
    /// Writes `<name>-<heading>.<ext>`, with every character of the heading
    /// other than ASCII letters, digits, `_` and `-` replaced by `_` so the
    /// file stays inside the output directory. A missing section renders as
    /// empty.
    pub fn render_section(
        &self,
        record: &CvRecord,
        heading: &str,
        template: &TemplateRef,
    ) -> Result<PathBuf, CvError> {
        let resolved = self.resolve(template)?;
        let file_name = format!(
            "{}-{}.{}",
            self.name,
            file_stem_for(heading),
            resolved.kind.extension()
        );
        self.render_resolved(record, &resolved, Some(heading), &file_name)
    }

    /// Write the plain-text outline to `<name>.txt`.
    pub fn render_text(&self, record: &CvRecord) -> Result<PathBuf, CvError> {
        self.write_output(&format!("{}.txt", self.name), &render_outline(record))
    }

    /// Draw the record directly to `<name>.pdf` without a template.
    pub fn draw_pdf(&self, record: &CvRecord, fonts: &FontConfig) -> Result<PathBuf, CvError> {
        self.ensure_output_dir()?;
        let path = self.output_dir.join(format!("{}.pdf", self.name));
        let title = record
            .personal_info()
            .get("name")
            .map(SectionContent::flatten)
            .unwrap_or_else(|| self.name.clone());
        draw_pdf(record, &title, &path, fonts)?;
        tracing::info!(path = %path.display(), "wrote PDF");
        Ok(path)
    }

    fn render_resolved(
        &self,
        record: &CvRecord,
        resolved: &ResolvedTemplate,
        section: Option<&str>,
        file_name: &str,
    ) -> Result<PathBuf, CvError> {
        let source = resolved.source()?;
        tracing::debug!(template = %resolved.path.display(), section = ?section, "rendering");
        let rendered = render_template(&resolved.name(), &source, record, section)?;
        self.write_output(file_name, &rendered)
    }

    fn ensure_output_dir(&self) -> Result<(), CvError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| CvError::io(&self.output_dir, e))
    }

    fn write_output(&self, file_name: &str, contents: &str) -> Result<PathBuf, CvError> {
        self.ensure_output_dir()?;
        let path = self.output_dir.join(file_name);
        std::fs::write(&path, contents).map_err(|e| CvError::io(&path, e))?;
        tracing::info!(path = %path.display(), bytes = contents.len(), "wrote output");
        Ok(path)
    }
}

fn file_stem_for(heading: &str) -> String {
    heading
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}
