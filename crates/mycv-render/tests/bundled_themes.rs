//! Integration test: every bundled theme renders the bundled sample CV.

use mycv_render::{available_themes, OutputKind, Renderer, TemplateRef};
use mycv_schema::CvLoader;
use std::path::PathBuf;

/// Find the repository root.
fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates/
    dir.pop(); // repo root
    dir
}

fn render_theme(theme: &str) -> (PathBuf, String) {
    let root = repo_root();
    let loaded = CvLoader::load(&root.join("data/mycv.yaml"), &root.join("settings/schema.yaml")).unwrap();
    let out = tempfile::tempdir().unwrap();
    let renderer = Renderer::new(out.path()).with_themes_dir(root.join("themes"));
    let path = renderer
        .render(&loaded.record, &TemplateRef::Theme(theme.to_string()))
        .unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    (path.file_name().map(PathBuf::from).unwrap(), text)
}

#[test]
fn bundled_themes_are_discovered() {
    assert_eq!(
        available_themes(&repo_root().join("themes")),
        vec!["classic", "fancy", "minimal", "modern"]
    );
}

#[test]
fn every_theme_renders_without_leftover_placeholders() {
    for theme in available_themes(&repo_root().join("themes")) {
        let (_, text) = render_theme(&theme);
        assert!(text.contains("Ada Lovelace"), "{theme}: name missing");
        assert!(!text.contains("{{"), "{theme}: unrendered expression");
        assert!(!text.contains("{%"), "{theme}: unrendered block");
    }
}

#[test]
fn classic_is_escaped_latex() {
    let (file, text) = render_theme("classic");
    assert_eq!(file, PathBuf::from("cv.tex"));
    assert!(text.contains(r"Analyst \& Programmer"));
    assert!(text.contains(r"\textbf{Translator and annotator}"));
    assert!(text.contains(r"\section*{Experience}"));
    assert!(!text.contains(r"\section*{Certificates}"));
}

#[test]
fn modern_lists_sections_generically() {
    let (_, text) = render_theme("modern");
    assert!(text.contains(r"\section{Experience}"));
    assert!(text.contains(r"\section{Presentations}"));
    assert!(!text.contains(r"\section{Certificates}"));
}

#[test]
fn fancy_is_escaped_html() {
    let (file, text) = render_theme("fancy");
    assert_eq!(file, PathBuf::from("cv.html"));
    assert!(text.contains("Analyst &amp; Programmer"));
    assert!(text.contains("<li>Wrote Notes A to G, including an algorithm for Bernoulli numbers</li>"));
}

#[test]
fn minimal_is_markdown() {
    let (file, text) = render_theme("minimal");
    assert_eq!(file, PathBuf::from("cv.md"));
    assert!(text.starts_with("# Ada Lovelace\n"));
    assert!(text.contains("## Experience"));
    assert!(!text.contains("## Certificates"));
}

#[test]
fn sample_kinds_match_extensions() {
    let themes = repo_root().join("themes");
    let kind = |name: &str| TemplateRef::Theme(name.to_string()).resolve(&themes).unwrap().kind;
    assert_eq!(kind("classic"), OutputKind::Latex);
    assert_eq!(kind("modern"), OutputKind::Latex);
    assert_eq!(kind("fancy"), OutputKind::Html);
    assert_eq!(kind("minimal"), OutputKind::Markdown);
}
