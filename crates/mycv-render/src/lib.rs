//! # mycv-render — From Record to Document
//!
//! Turns a validated [`CvRecord`](mycv_core::CvRecord) into files on disk.
//!
//! ## Themes (`theme`)
//!
//! A theme is a directory `themes/<name>/` holding one `template.<ext>`.
//! The extension decides the output kind: `.tex` (LaTeX), `.html`, `.md`
//! or `.txt`. An explicit template path may be used instead of a theme.
//!
//! ## Templating (`template`)
//!
//! Templates use Jinja syntax via `minijinja`. The record is bound as `cv`;
//! `cv.personal_info.name` and `cv.get_section('education')` both work.
//! Undefined lookups chain to empty output, so a template that names a
//! field the record lacks still renders.
//!
//! ## Compilation (`compile`)
//!
//! `.tex` and `.html` sources are turned into PDF by an external program.
//! The child runs in the output directory; this process never changes its
//! own working directory.
//!
//! ## Direct Drawing (`pdf`) and Outlines (`text`)
//!
//! Without a template, a PDF can be drawn directly with `genpdf`, and a
//! plain-text outline can be produced for terminals and diffs.
//!
//! ## Crate Policy
//!
//! - Borrows the record; never mutates it.
//! - A failed render writes no output file.

pub mod compile;
pub mod pdf;
pub mod renderer;
pub mod template;
pub mod text;
pub mod theme;

pub use compile::{compile_to_pdf, CompilerConfig};
pub use pdf::{draw_pdf, section_lines, FontConfig};
pub use renderer::Renderer;
pub use template::{render_template, TemplateContext};
pub use text::{parse_outline, render_outline, OutlineNode};
pub use theme::{available_themes, OutputKind, ResolvedTemplate, TemplateRef};
