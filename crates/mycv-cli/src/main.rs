//! # mycv CLI entry point
//!
//! Parses command-line arguments, loads the optional config file and hands
//! off to [`run_generate`].

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mycv_cli::config::{CliConfig, CONFIG_FILE_NAME};
use mycv_cli::generate::{run_generate, GenerateArgs};

/// Render a CV from YAML or JSON data.
///
/// Loads the data file, checks it against an allowed-keys schema, then
/// renders it through a theme template and compiles it to PDF.
#[derive(Parser, Debug)]
#[command(name = "mycv", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file [default: ./.mycv.yaml if present].
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    args: GenerateArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let root = resolve_project_root().unwrap_or_else(|| {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    });
    tracing::debug!(root = %root.display(), "resolved project root");

    let result = CliConfig::discover(cli.config.as_deref(), &root)
        .and_then(|config| run_generate(&cli.args, &config, &root));

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

/// Walk up from the current directory to the nearest directory holding a
/// `.mycv.yaml` config or a `themes/` directory.
fn resolve_project_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut dir = cwd.as_path();
    loop {
        if dir.join(CONFIG_FILE_NAME).is_file() || dir.join("themes").is_dir() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mycv_cli::generate::OutputFormat;

    #[test]
    fn cli_parse_defaults() {
        let cli = Cli::try_parse_from(["mycv", "--yaml", "data/mycv.yaml"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
        assert_eq!(cli.args.data, PathBuf::from("data/mycv.yaml"));
        assert_eq!(cli.args.to, OutputFormat::Pdf);
        assert_eq!(cli.args.name, "cv");
        assert!(cli.args.schema.is_none());
        assert!(cli.args.theme.is_none());
        assert!(!cli.args.validate_only);
    }

    #[test]
    fn cli_parse_data_alias_and_options() {
        let cli = Cli::try_parse_from([
            "mycv", "-vv", "--data", "cv.json", "--schema", "s.yaml", "--theme", "fancy",
            "--to", "source", "--output", "site", "--name", "ada",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.args.data, PathBuf::from("cv.json"));
        assert_eq!(cli.args.schema, Some(PathBuf::from("s.yaml")));
        assert_eq!(cli.args.theme.as_deref(), Some("fancy"));
        assert_eq!(cli.args.to, OutputFormat::Source);
        assert_eq!(cli.args.output, Some(PathBuf::from("site")));
        assert_eq!(cli.args.name, "ada");
    }

    #[test]
    fn cli_parse_text_output() {
        let cli = Cli::try_parse_from(["mycv", "--yaml", "cv.yaml", "--to", "text"]).unwrap();
        assert_eq!(cli.args.to, OutputFormat::Text);
    }

    #[test]
    fn cli_requires_data() {
        assert!(Cli::try_parse_from(["mycv", "--theme", "classic"]).is_err());
    }

    #[test]
    fn cli_rejects_theme_with_template() {
        let result = Cli::try_parse_from([
            "mycv", "--yaml", "cv.yaml", "--theme", "classic", "--template", "t.tex",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_rejects_unknown_output_format() {
        assert!(Cli::try_parse_from(["mycv", "--yaml", "cv.yaml", "--to", "docx"]).is_err());
    }

    #[test]
    fn cli_parse_config_and_flags() {
        let cli = Cli::try_parse_from([
            "mycv", "--config", "ci.yaml", "--yaml", "cv.yaml", "--validate-only",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("ci.yaml")));
        assert!(cli.args.validate_only);
        assert!(!cli.args.list_sections);
    }
}
