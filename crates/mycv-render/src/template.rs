//! # Template Engine
//!
//! A `minijinja` environment configured for CV rendering.
//!
//! ## Bindings
//!
//! - `cv`: the whole record. Sections are attributes (`cv.skills`), and
//!   `cv.get_section('skills')` / `cv.headings()` are methods.
//! - `section` / `heading`: set only when rendering a single section.
//!
//! ## Missing Data
//!
//! Undefined behaviour is `Chainable`: `cv.nope.deeper` renders as an
//! empty string and iterates as an empty list. YAML nulls are bound as
//! undefined so that `about:` with no body behaves like a missing section.
//!
//! ## Helpers
//!
//! | Name | Kind | Effect |
//! |---|---|---|
//! | `latex_escape` | filter | escapes `\ & % $ # _ { } ~ ^` |
//! | `capitalize_key` | filter | `start_date` → `Start-Date` |
//! | `today()` | function | current local date, `YYYY-MM-DD` |

use std::sync::Arc;

use minijinja::value::{from_args, Enumerator, Object, ObjectRepr, Value};
use minijinja::{context, Environment, Error, ErrorKind, State, UndefinedBehavior};
use mycv_core::{CvError, CvRecord, Scalar, SectionContent};

/// The record as seen from a template.
#[derive(Debug)]
pub struct TemplateContext {
    record: CvRecord,
}

impl TemplateContext {
    pub fn new(record: &CvRecord) -> Self {
        Self {
            record: record.clone(),
        }
    }

    fn section(&self, heading: &str) -> Value {
        self.record
            .get_section(heading)
            .map(content_to_value)
            .unwrap_or(Value::UNDEFINED)
    }
}

impl Object for TemplateContext {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Map
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        let heading = key.as_str()?;
        self.record.get_section(heading).map(content_to_value)
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Values(self.record.headings().into_iter().map(Value::from).collect())
    }

    fn call_method(
        self: &Arc<Self>,
        _state: &State<'_, '_>,
        method: &str,
        args: &[Value],
    ) -> Result<Value, Error> {
        match method {
            "get_section" => {
                let (heading,): (&str,) = from_args(args)?;
                Ok(self.section(heading))
            }
            "headings" => {
                let () = from_args(args)?;
                Ok(Value::from(
                    self.record
                        .headings()
                        .into_iter()
                        .map(Value::from)
                        .collect::<Vec<_>>(),
                ))
            }
            _ => Err(Error::from(ErrorKind::UnknownMethod)),
        }
    }
}

/// Convert section content to a template value. Nulls become undefined.
pub fn content_to_value(content: &SectionContent) -> Value {
    match content {
        SectionContent::Scalar(Scalar::Null) => Value::UNDEFINED,
        SectionContent::Scalar(Scalar::Bool(b)) => Value::from(*b),
        SectionContent::Scalar(Scalar::Integer(i)) => Value::from(*i),
        SectionContent::Scalar(Scalar::Float(x)) => Value::from(*x),
        SectionContent::Scalar(Scalar::String(s)) => Value::from(s.as_str()),
        SectionContent::Sequence(items) => {
            Value::from(items.iter().map(content_to_value).collect::<Vec<_>>())
        }
        SectionContent::Mapping(mapping) => Value::from_iter(
            mapping
                .iter()
                .map(|(k, v)| (Value::from(k), content_to_value(v))),
        ),
    }
}

/// Build the environment with CV helpers registered.
pub fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Chainable);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.add_filter("latex_escape", latex_escape);
    env.add_filter("capitalize_key", capitalize_key);
    env.add_function("today", today);
    env
}

/// Render template source against a record.
///
/// `name` selects auto-escaping by extension (`.html` is escaped, `.tex`
/// and `.md` are not). When `section` is given, that section is bound as
/// `section` and its heading as `heading`.
///
/// # Errors
///
/// `TemplateRenderError` on a syntax or evaluation error, with the line
/// number when the engine reports one.
pub fn render_template(
    name: &str,
    source: &str,
    record: &CvRecord,
    section: Option<&str>,
) -> Result<String, CvError> {
    let section_value = section
        .and_then(|h| record.get_section(h))
        .map(content_to_value)
        .unwrap_or(Value::UNDEFINED);
    let ctx = context! {
        cv => Value::from_object(TemplateContext::new(record)),
        section => section_value,
        heading => section.map(Value::from).unwrap_or(Value::UNDEFINED),
    };

    let env = environment();
    env.render_named_str(name, source, ctx)
        .map_err(|e| render_error(name, &e))
}

fn render_error(template: &str, e: &Error) -> CvError {
    let what = e
        .detail()
        .map(str::to_string)
        .unwrap_or_else(|| e.kind().to_string());
    let reason = match e.line() {
        Some(line) => format!("line {line}: {what}"),
        None => what,
    };
    CvError::TemplateRenderError {
        template: template.to_string(),
        reason,
    }
}

/// Escape LaTeX special characters.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str(r"\textbackslash{}"),
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// `start_date` → `Start-Date`.
pub fn capitalize_words(key: &str) -> String {
    key.split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join("-")
}

fn latex_escape(value: &Value) -> String {
    if value.is_undefined() || value.is_none() {
        return String::new();
    }
    escape_latex(&value.to_string())
}

fn capitalize_key(value: &Value) -> String {
    if value.is_undefined() || value.is_none() {
        return String::new();
    }
    capitalize_words(&value.to_string())
}

fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mycv_core::DataFormat;
    use std::path::Path;

    fn record(yaml: &str) -> CvRecord {
        mycv_core::parse_record(yaml, DataFormat::Yaml, Path::new("cv.yaml")).unwrap()
    }

    fn render(source: &str, r: &CvRecord) -> String {
        render_template("t.md", source, r, None).unwrap()
    }

    #[test]
    fn attribute_and_method_access() {
        let r = record("personal_info:\n  name: Ada\nskills:\n  languages: [Rust, C]\n");
        assert_eq!(render("{{ cv.personal_info.name }}", &r), "Ada");
        assert_eq!(
            render("{{ cv.get_section('skills').languages|join(', ') }}", &r),
            "Rust, C"
        );
        assert_eq!(render("{{ cv.headings()|join(' ') }}", &r), "personal_info skills");
    }

    #[test]
    fn missing_fields_render_empty() {
        let r = record("personal_info:\n  name: Ada\n");
        assert_eq!(render("[{{ cv.personal_info.email }}]", &r), "[]");
        assert_eq!(render("[{{ cv.awards.first.name }}]", &r), "[]");
        assert_eq!(
            render("[{% for e in cv.education %}x{% endfor %}]", &r),
            "[]"
        );
        assert_eq!(render("[{{ cv.get_section('nope') }}]", &r), "[]");
    }

    #[test]
    fn null_section_behaves_as_missing() {
        let r = record("certificates:\nabout:\n");
        assert_eq!(
            render("[{% for c in cv.certificates %}{{ c.name }}{% endfor %}{{ cv.about }}]", &r),
            "[]"
        );
    }

    #[test]
    fn sections_iterate_in_source_order() {
        let r = record("skills:\n  a: 1\nabout:\n  summary: s\npersonal_info:\n  name: n\n");
        assert_eq!(
            render("{% for h in cv %}{{ h }};{% endfor %}", &r),
            "skills;about;personal_info;"
        );
        assert_eq!(
            render("{% for k, v in cv.personal_info|items %}{{ k }}={{ v }}{% endfor %}", &r),
            "name=n"
        );
    }

    #[test]
    fn latex_escape_filter() {
        let r = record("personal_info:\n  title: R&D 100% {fast}_1\n");
        assert_eq!(
            render("{{ cv.personal_info.title|latex_escape }}", &r),
            r"R\&D 100\% \{fast\}\_1"
        );
        assert_eq!(escape_latex(r"a\b~c^"), r"a\textbackslash{}b\textasciitilde{}c\textasciicircum{}");
    }

    #[test]
    fn capitalize_key_filter() {
        assert_eq!(capitalize_words("start_date"), "Start-Date");
        assert_eq!(capitalize_words("name"), "Name");
        let r = record("x:\n  k: start_date\n");
        assert_eq!(render("{{ cv.x.k|capitalize_key }}", &r), "Start-Date");
    }

    #[test]
    fn trailing_newline_is_kept() {
        let r = record("personal_info:\n  name: Ada\n");
        assert_eq!(render("# {{ cv.personal_info.name }}\n", &r), "# Ada\n");
        assert_eq!(render("# {{ cv.personal_info.name }}", &r), "# Ada");
    }

    #[test]
    fn today_is_iso_date() {
        let out = render("{{ today() }}", &CvRecord::new());
        assert!(chrono::NaiveDate::parse_from_str(&out, "%Y-%m-%d").is_ok(), "{out}");
    }

    #[test]
    fn html_templates_are_escaped() {
        let r = record("personal_info:\n  name: <b>Ada</b>\n");
        let html = render_template("t.html", "{{ cv.personal_info.name }}", &r, None).unwrap();
        assert_eq!(html, "&lt;b&gt;Ada&lt;&#x2f;b&gt;");
        let tex = render_template("t.tex", "{{ cv.personal_info.name }}", &r, None).unwrap();
        assert_eq!(tex, "<b>Ada</b>");
    }

    #[test]
    fn section_binding() {
        let r = record("education:\n  - degree: BSc\n  - degree: MSc\n");
        let out = render_template(
            "s.md",
            "{{ heading }}:{% for e in section %} {{ e.degree }}{% endfor %}",
            &r,
            Some("education"),
        )
        .unwrap();
        assert_eq!(out, "education: BSc MSc");
    }

    #[test]
    fn syntax_error_reports_line() {
        let err = render_template("bad.tex", "ok\n{% for x in %}\n", &CvRecord::new(), None).unwrap_err();
        match err {
            CvError::TemplateRenderError { template, reason } => {
                assert_eq!(template, "bad.tex");
                assert!(reason.starts_with("line 2"), "reason: {reason}");
            }
            other => panic!("expected TemplateRenderError, got {other}"),
        }
    }
}
