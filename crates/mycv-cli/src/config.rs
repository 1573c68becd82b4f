//! # CLI Configuration
//!
//! Optional YAML file holding defaults for the `mycv` command. Every field
//! is optional; unknown fields are rejected so typos surface early.
//!
//! ```yaml
//! themes_dir: themes
//! output_dir: build
//! default_theme: modern
//! schema: settings/schema.yaml
//! latex_compiler: xelatex
//! compile_timeout_secs: 120
//! font_dir: /usr/share/fonts/truetype/dejavu
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use mycv_render::{CompilerConfig, FontConfig};

/// File looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = ".mycv.yaml";

/// Defaults for the `mycv` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub themes_dir: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub default_theme: Option<String>,
    pub schema: Option<PathBuf>,
    pub latex_compiler: String,
    pub latex_args: Vec<String>,
    pub html_converter: String,
    pub html_args: Vec<String>,
    pub compile_timeout_secs: Option<u64>,
    pub font_dir: PathBuf,
    pub font_family: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        let compiler = CompilerConfig::default();
        let fonts = FontConfig::default();
        Self {
            themes_dir: PathBuf::from("themes"),
            output_dir: None,
            default_theme: None,
            schema: None,
            latex_compiler: compiler.latex_compiler,
            latex_args: compiler.latex_args,
            html_converter: compiler.html_converter,
            html_args: compiler.html_args,
            compile_timeout_secs: None,
            font_dir: fonts.dir,
            font_family: fonts.family,
        }
    }
}

impl CliConfig {
    /// Parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file: {}", path.display()))?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&text).with_context(|| format!("parsing config file: {}", path.display()))
    }

    /// Load `explicit` if given, else `<root>/.mycv.yaml` if present,
    /// else the built-in defaults.
    pub fn discover(explicit: Option<&Path>, root: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let implicit = root.join(CONFIG_FILE_NAME);
        if implicit.is_file() {
            tracing::debug!(path = %implicit.display(), "using config file");
            return Self::load(&implicit);
        }
        Ok(Self::default())
    }

    pub fn compiler(&self) -> CompilerConfig {
        CompilerConfig {
            latex_compiler: self.latex_compiler.clone(),
            latex_args: self.latex_args.clone(),
            html_converter: self.html_converter.clone(),
            html_args: self.html_args.clone(),
            timeout: self.compile_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn fonts(&self) -> FontConfig {
        FontConfig::new(&self.font_dir, &self.font_family)
    }
}
