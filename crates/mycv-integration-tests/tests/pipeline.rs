//! Integration test: load, validate, render and compile the bundled CV.
//!
//! The LaTeX and HTML compilers are replaced by `sh` one-liners so the
//! suite runs on hosts without a TeX distribution or wkhtmltopdf.

use std::path::{Path, PathBuf};

use mycv_core::{CvError, ViolationKind};
use mycv_render::{compile_to_pdf, parse_outline, render_outline, CompilerConfig, FontConfig, Renderer, TemplateRef};
use mycv_schema::{CvLoader, LoadedCv};

fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates/
    dir.pop(); // repo root
    dir
}

fn load_sample() -> LoadedCv {
    let root = repo_root();
    CvLoader::load(&root.join("data/mycv.yaml"), &root.join("settings/schema.yaml")).unwrap()
}

fn renderer(out: &Path) -> Renderer {
    Renderer::new(out).with_themes_dir(repo_root().join("themes"))
}

/// A compiler that copies its input to the PDF name and leaves LaTeX
/// droppings behind, like pdflatex does.
fn fake_compilers() -> CompilerConfig {
    let latex = r#"cp "$1" "${1%.tex}.pdf"; touch "${1%.tex}.aux" "${1%.tex}.log""#;
    let html = r#"cp "$1" "$2""#;
    CompilerConfig {
        latex_compiler: "sh".to_string(),
        latex_args: vec!["-c".to_string(), latex.to_string(), "sh".to_string()],
        html_converter: "sh".to_string(),
        html_args: vec!["-c".to_string(), html.to_string(), "sh".to_string()],
        timeout: None,
    }
}

#[test]
fn sample_cv_loads_and_validates() {
    let loaded = load_sample();
    assert!(loaded.is_validated());
    assert_eq!(
        loaded.record.headings(),
        vec![
            "personal_info",
            "about",
            "skills",
            "education",
            "experience",
            "projects",
            "certificates",
            "presentations",
        ]
    );
    assert_eq!(
        loaded.record.get_path("personal_info.name").map(|v| v.flatten()),
        Some("Ada Lovelace".to_string())
    );
}

#[test]
fn latex_theme_renders_and_compiles() {
    let out = tempfile::tempdir().unwrap();
    let loaded = load_sample();
    let tex = renderer(out.path())
        .render(&loaded.record, &TemplateRef::Theme("classic".into()))
        .unwrap();
    assert_eq!(tex, out.path().join("cv.tex"));

    let pdf = compile_to_pdf(&tex, &fake_compilers()).unwrap();
    assert_eq!(pdf, out.path().join("cv.pdf"));
    let compiled = std::fs::read_to_string(&pdf).unwrap();
    assert!(compiled.contains("Ada Lovelace"));
    assert!(!out.path().join("cv.aux").exists());
    assert!(!out.path().join("cv.log").exists());
    assert!(tex.exists(), "the rendered source is kept");
}

#[test]
fn html_theme_renders_and_compiles() {
    let out = tempfile::tempdir().unwrap();
    let html = renderer(out.path())
        .with_name("ada")
        .render(&load_sample().record, &TemplateRef::Theme("fancy".into()))
        .unwrap();
    let pdf = compile_to_pdf(&html, &fake_compilers()).unwrap();
    assert_eq!(pdf, out.path().join("ada.pdf"));
}

#[test]
fn failing_compiler_reports_its_output() {
    let out = tempfile::tempdir().unwrap();
    let tex = renderer(out.path())
        .render(&load_sample().record, &TemplateRef::Theme("modern".into()))
        .unwrap();
    let script = "echo 'This is pdfTeX'; echo '! LaTeX Error: File `moderncv.cls not found.' >&2; exit 1";
    let config = CompilerConfig {
        latex_compiler: "sh".to_string(),
        latex_args: vec!["-c".to_string(), script.to_string()],
        ..CompilerConfig::default()
    };
    match compile_to_pdf(&tex, &config).unwrap_err() {
        CvError::CompileError { program, stdout, stderr, .. } => {
            assert_eq!(program, "sh");
            assert!(stdout.contains("pdfTeX"));
            assert!(stderr.contains("moderncv.cls"));
        }
        other => panic!("expected CompileError, got {other}"),
    }
    assert!(!out.path().join("cv.pdf").exists());
}

#[test]
fn missing_compiler_is_missing_resource() {
    let out = tempfile::tempdir().unwrap();
    let tex = renderer(out.path())
        .render(&load_sample().record, &TemplateRef::Theme("classic".into()))
        .unwrap();
    let config = CompilerConfig {
        latex_compiler: "mycv-test-absent-pdflatex".to_string(),
        ..CompilerConfig::default()
    };
    assert!(matches!(
        compile_to_pdf(&tex, &config),
        Err(CvError::MissingResource { ref resource, .. }) if resource == "mycv-test-absent-pdflatex"
    ));
}

#[test]
fn direct_drawing_without_fonts_is_missing_resource() {
    let out = tempfile::tempdir().unwrap();
    let fonts = FontConfig::new(out.path().join("fonts"), "DejaVuSans");
    let err = renderer(out.path())
        .draw_pdf(&load_sample().record, &fonts)
        .unwrap_err();
    assert!(matches!(err, CvError::MissingResource { .. }));
    assert!(!out.path().join("cv.pdf").exists());
}

#[test]
fn tampered_cv_is_rejected_with_every_violation() {
    let root = repo_root();
    let dir = tempfile::tempdir().unwrap();
    let sample = std::fs::read_to_string(root.join("data/mycv.yaml")).unwrap();
    let tampered = sample.replacen("  name: Ada Lovelace\n", "  name: Ada Lovelace\n  nickname: Ada\n", 1)
        + "hobbies:\n  - chess\n";
    let data = dir.path().join("cv.yaml");
    std::fs::write(&data, tampered).unwrap();

    let err = CvLoader::load(&data, &root.join("settings/schema.yaml")).unwrap_err();
    let violations = err.violations().unwrap();
    assert_eq!(violations.len(), 1);
    let v = &violations.violations()[0];
    assert_eq!(v.kind, ViolationKind::UnknownKey { key: "nickname".to_string() });
    assert_eq!(v.location(), "personal_info.nickname");

    // The same data renders fine when validation is skipped.
    let unchecked = CvLoader::load_unchecked(&data).unwrap();
    assert!(!unchecked.is_validated());
    assert!(unchecked.record.get_section("hobbies").is_some());
}

#[test]
fn json_and_yaml_samples_render_identically() {
    let root = repo_root();
    let schema = root.join("settings/schema.yaml");
    let from_json = CvLoader::load(&root.join("data/mycv.json"), &schema).unwrap();
    let out_yaml = tempfile::tempdir().unwrap();
    let out_json = tempfile::tempdir().unwrap();
    let theme = TemplateRef::Theme("minimal".into());

    let a = renderer(out_yaml.path()).render(&load_sample().record, &theme).unwrap();
    let b = renderer(out_json.path()).render(&from_json.record, &theme).unwrap();
    assert_eq!(
        std::fs::read_to_string(a).unwrap(),
        std::fs::read_to_string(b).unwrap()
    );
}

#[test]
fn text_outline_of_sample_parses_back() {
    let record = load_sample().record;
    let text = render_outline(&record);
    let nodes = parse_outline(&text).unwrap();
    assert_eq!(nodes, mycv_render::text::outline_nodes(&record));
    assert_eq!(nodes.len(), record.len());
    assert!(text.lines().next().is_some_and(|l| l == "personal_info:"));
}

#[test]
fn section_render_binds_one_section() {
    let out = tempfile::tempdir().unwrap();
    let template = out.path().join("section.md");
    std::fs::write(
        &template,
        "## {{ heading | capitalize_key }}\n{% for item in section %}- {{ item.role }}\n{% endfor %}",
    )
    .unwrap();
    let path = renderer(out.path())
        .render_section(&load_sample().record, "experience", &TemplateRef::Path(template))
        .unwrap();
    assert_eq!(path, out.path().join("cv-experience.md"));
    assert_eq!(
        std::fs::read_to_string(path).unwrap(),
        "## Experience\n- Translator and annotator\n"
    );
}
