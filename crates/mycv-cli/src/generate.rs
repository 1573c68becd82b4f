//! # Generate
//!
//! The whole `mycv` pipeline: load the data file, validate it, then render
//! it in the requested form.
//!
//! ## Output Forms (`--to`)
//!
//! - `pdf`: render the theme and compile it. A theme whose template cannot
//!   be compiled (Markdown, text), or a theme with no template at all, is
//!   drawn straight to PDF instead.
//! - `source`: render the theme and stop (`.tex`, `.html`, `.md`, `.txt`).
//! - `text`: write an indented outline without any template.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use mycv_core::{CvError, CvRecord, SectionContent};
use mycv_render::{compile_to_pdf, Renderer, TemplateRef};
use mycv_schema::CvLoader;

use crate::config::CliConfig;
use crate::resolve_path;

/// Schema used when neither `--schema` nor the config names one.
pub const DEFAULT_SCHEMA: &str = "settings/schema.yaml";
pub const DEFAULT_THEME: &str = "classic";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// What `mycv` should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// A PDF, compiled from the theme or drawn directly.
    Pdf,
    /// The rendered template source.
    Source,
    /// An indented plain-text outline.
    Text,
}

/// Arguments for a `mycv` run.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// CV data file (.yaml, .yml or .json).
    #[arg(long = "yaml", visible_alias = "data", value_name = "PATH")]
    pub data: PathBuf,

    /// Allowed-keys schema. Defaults to settings/schema.yaml when present.
    #[arg(long, value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Theme under the themes directory [default: classic].
    #[arg(long, value_name = "NAME")]
    pub theme: Option<String>,

    /// Template file to use instead of a theme.
    #[arg(long, value_name = "PATH", conflicts_with = "theme")]
    pub template: Option<PathBuf>,

    /// Output directory [default: output].
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Base name of the produced files.
    #[arg(long, default_value = "cv")]
    pub name: String,

    /// Output form.
    #[arg(long = "to", value_enum, default_value_t = OutputFormat::Pdf)]
    pub to: OutputFormat,

    /// Stop after validation.
    #[arg(long)]
    pub validate_only: bool,

    /// Print the record's sections and exit.
    #[arg(long, conflicts_with = "validate_only")]
    pub list_sections: bool,
}

/// Run the pipeline. Returns the process exit code.
pub fn run_generate(args: &GenerateArgs, config: &CliConfig, root: &Path) -> Result<u8> {
    let data = resolve_path(&args.data, root);
    let schema = schema_path(args, config, root);
    match &schema {
        Some(path) => tracing::debug!(schema = %path.display(), "validating against schema"),
        None => tracing::warn!("no schema found; CV data will not be validated"),
    }

    let loaded = match CvLoader::load_with(&data, schema.as_deref()) {
        Ok(loaded) => loaded,
        Err(CvError::ValidationError { violations }) => {
            eprintln!("  {}: INVALID", data.display());
            eprintln!("{violations}");
            return Ok(1);
        }
        Err(e) => return Err(e).with_context(|| format!("loading CV data: {}", data.display())),
    };
    let record = &loaded.record;

    if args.list_sections {
        for line in section_summaries(record) {
            println!("{line}");
        }
        return Ok(0);
    }
    if args.validate_only {
        println!("  {}: VALID ({} sections)", data.display(), record.len());
        return Ok(0);
    }

    let output_dir = args
        .output
        .clone()
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    let renderer = Renderer::new(root.join(output_dir))
        .with_themes_dir(resolve_path(&config.themes_dir, root))
        .with_name(&args.name);
    let template = template_ref(args, config, root);

    let produced = match args.to {
        OutputFormat::Text => renderer.render_text(record)?,
        OutputFormat::Source => renderer
            .render(record, &template)
            .with_context(|| format!("rendering {template}"))?,
        OutputFormat::Pdf => render_pdf(&renderer, record, &template, config, root)?,
    };
    println!("{}", produced.display());
    Ok(0)
}

fn render_pdf(
    renderer: &Renderer,
    record: &CvRecord,
    template: &TemplateRef,
    config: &CliConfig,
    root: &Path,
) -> Result<PathBuf> {
    match renderer.resolve(template) {
        Ok(resolved) if resolved.kind.compiles_to_pdf() => {
            let source = renderer
                .render(record, template)
                .with_context(|| format!("rendering {template}"))?;
            let pdf = compile_to_pdf(&source, &config.compiler())
                .with_context(|| format!("compiling {}", source.display()))?;
            Ok(pdf)
        }
        Ok(resolved) => {
            tracing::info!(
                template = %resolved.path.display(),
                "template does not compile to PDF; drawing directly"
            );
            draw(renderer, record, config, root)
        }
        Err(CvError::TemplateNotFound { path }) if matches!(template, TemplateRef::Theme(_)) => {
            tracing::info!(theme_dir = %path.display(), "theme has no template; drawing directly");
            draw(renderer, record, config, root)
        }
        Err(e) => Err(e).with_context(|| format!("resolving {template}")),
    }
}

fn draw(renderer: &Renderer, record: &CvRecord, config: &CliConfig, root: &Path) -> Result<PathBuf> {
    let mut fonts = config.fonts();
    fonts.dir = resolve_path(&fonts.dir, root);
    renderer
        .draw_pdf(record, &fonts)
        .context("drawing PDF without a template")
}

fn schema_path(args: &GenerateArgs, config: &CliConfig, root: &Path) -> Option<PathBuf> {
    if let Some(explicit) = args.schema.as_ref().or(config.schema.as_ref()) {
        return Some(resolve_path(explicit, root));
    }
    let default = root.join(DEFAULT_SCHEMA);
    default.is_file().then_some(default)
}

fn template_ref(args: &GenerateArgs, config: &CliConfig, root: &Path) -> TemplateRef {
    match &args.template {
        Some(path) => TemplateRef::Path(resolve_path(path, root)),
        None => TemplateRef::Theme(
            args.theme
                .clone()
                .or_else(|| config.default_theme.clone())
                .unwrap_or_else(|| DEFAULT_THEME.to_string()),
        ),
    }
}

/// One line per section: heading, shape and size.
pub fn section_summaries(record: &CvRecord) -> Vec<String> {
    let width = record.iter().map(|(h, _)| h.len()).max().unwrap_or(0);
    record
        .iter()
        .map(|(heading, content)| {
            let size = match content {
                SectionContent::Mapping(m) => plural(m.len(), "key"),
                SectionContent::Sequence(items) => plural(items.len(), "item"),
                SectionContent::Scalar(_) if content.is_null() => "empty".to_string(),
                SectionContent::Scalar(_) => "1 value".to_string(),
            };
            format!("{heading:<width$}  {:<8}  {size}", content.kind_name())
        })
        .collect()
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}
