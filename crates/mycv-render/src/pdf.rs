//! # Direct PDF Drawing
//!
//! Draws the record straight to PDF with `genpdf`, for when no compilable
//! template is available. Every section becomes a bold heading followed by
//! its lines (see [`section_lines`]).
//!
//! ## Fonts
//!
//! A Unicode TrueType family is required: `<dir>/<family>-Regular.ttf`,
//! `-Bold`, `-Italic` and `-BoldItalic`. The default is `DejaVuSans` under
//! `assets/fonts`. The repository keeps that directory but not the `.ttf`
//! files. A missing file is reported as `MissingResource`; no built-in
//! font is substituted, since those lack most non-Latin glyphs.

use std::path::{Path, PathBuf};

use genpdf::{elements, style, Element as _};
use mycv_core::{CvError, CvRecord, Scalar, SectionContent};

use crate::template::capitalize_words;

const FONT_VARIANTS: [&str; 4] = ["Regular", "Bold", "Italic", "BoldItalic"];

/// Where to find the TrueType family used for drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontConfig {
    pub dir: PathBuf,
    pub family: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets/fonts"),
            family: "DejaVuSans".to_string(),
        }
    }
}

impl FontConfig {
    pub fn new(dir: impl Into<PathBuf>, family: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            family: family.into(),
        }
    }

    /// Paths of the four variants genpdf loads.
    pub fn variant_paths(&self) -> Vec<PathBuf> {
        FONT_VARIANTS
            .iter()
            .map(|v| self.dir.join(format!("{}-{v}.ttf", self.family)))
            .collect()
    }

    /// Fail with `MissingResource` naming the first absent font file.
    pub fn check(&self) -> Result<(), CvError> {
        match self.variant_paths().into_iter().find(|p| !p.is_file()) {
            Some(missing) => Err(CvError::MissingResource {
                resource: missing.display().to_string(),
                detail: format!(
                    "font file not found; install the {} TrueType family into {}",
                    self.family,
                    self.dir.display()
                ),
            }),
            None => Ok(()),
        }
    }
}

/// Body lines drawn under a section heading.
///
/// - Mapping section: one `Capitalized-Key: value` line per entry.
/// - Sequence section: one line per item. A mapping item becomes its
///   `Key: value` pairs joined by `, `; a scalar item its string form.
/// - Scalar section: its string form.
///
/// Nested values are flattened to a compact string. Nulls are skipped.
pub fn section_lines(content: &SectionContent) -> Vec<String> {
    match content {
        SectionContent::Scalar(Scalar::Null) => Vec::new(),
        SectionContent::Scalar(s) => vec![s.to_string()],
        SectionContent::Mapping(m) => m
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| format!("{}: {}", capitalize_words(k), v.flatten()))
            .collect(),
        SectionContent::Sequence(items) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(|item| match item {
                SectionContent::Mapping(m) => m
                    .iter()
                    .filter(|(_, v)| !v.is_null())
                    .map(|(k, v)| format!("{}: {}", capitalize_words(k), v.flatten()))
                    .collect::<Vec<_>>()
                    .join(", "),
                other => other.flatten(),
            })
            .collect(),
    }
}

/// Draw `record` to a PDF at `out_path`.
///
/// The document is rendered in memory first, so a failure leaves no file.
pub fn draw_pdf(record: &CvRecord, title: &str, out_path: &Path, fonts: &FontConfig) -> Result<(), CvError> {
    fonts.check()?;
    let family = genpdf::fonts::from_files(&fonts.dir, &fonts.family, None).map_err(|e| {
        CvError::MissingResource {
            resource: fonts.dir.join(&fonts.family).display().to_string(),
            detail: format!("failed to load font family: {e}"),
        }
    })?;

    let mut doc = genpdf::Document::new(family);
    doc.set_title(title);
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(15);
    doc.set_page_decorator(decorator);

    for (heading, content) in record.iter() {
        doc.push(
            elements::Paragraph::new(capitalize_words(heading))
                .styled(style::Style::new().bold().with_font_size(14)),
        );
        for line in section_lines(content) {
            doc.push(elements::Paragraph::new(line));
        }
        doc.push(elements::Break::new(1));
    }

    let mut bytes = Vec::new();
    doc.render(&mut bytes).map_err(|e| CvError::TemplateRenderError {
        template: "direct PDF drawing".to_string(),
        reason: e.to_string(),
    })?;
    std::fs::write(out_path, bytes).map_err(|e| CvError::io(out_path, e))?;
    tracing::debug!(path = %out_path.display(), sections = record.len(), "drew PDF");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mycv_core::DataFormat;

    fn record(yaml: &str) -> CvRecord {
        mycv_core::parse_record(yaml, DataFormat::Yaml, Path::new("cv.yaml")).unwrap()
    }

    #[test]
    fn mapping_section_lines() {
        let r = record("personal_info:\n  name: Ada\n  start_date: 1842\n  phone:\n");
        assert_eq!(
            section_lines(r.get_section("personal_info").unwrap()),
            vec!["Name: Ada", "Start-Date: 1842"]
        );
    }

    #[test]
    fn sequence_items_become_single_lines() {
        let r = record(
            "education:\n  - degree: BSc\n    institution: MIT\n    notes: [a, b]\n  - Self-taught\n",
        );
        assert_eq!(
            section_lines(r.get_section("education").unwrap()),
            vec!["Degree: BSc, Institution: MIT, Notes: [a, b]", "Self-taught"]
        );
    }

    #[test]
    fn scalar_and_null_sections() {
        let r = record("about: Short bio\ncertificates:\n");
        assert_eq!(section_lines(r.get_section("about").unwrap()), vec!["Short bio"]);
        assert!(section_lines(r.get_section("certificates").unwrap()).is_empty());
    }

    #[test]
    fn missing_font_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let fonts = FontConfig::new(dir.path(), "DejaVuSans");
        let out = dir.path().join("cv.pdf");
        let err = draw_pdf(&record("about: hi\n"), "cv", &out, &fonts).unwrap_err();
        match err {
            CvError::MissingResource { resource, .. } => {
                assert!(resource.ends_with("DejaVuSans-Regular.ttf"), "{resource}");
            }
            other => panic!("expected MissingResource, got {other}"),
        }
        assert!(!out.exists());
    }

    #[test]
    fn default_fonts() {
        let fonts = FontConfig::default();
        assert_eq!(fonts.variant_paths()[1], PathBuf::from("assets/fonts/DejaVuSans-Bold.ttf"));
    }
}
