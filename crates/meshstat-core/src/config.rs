//! Configuration loading for meshstat.
//!
//! Two TOML files are consulted. The project file (`--config <FILE>` or
//! `./meshstat.toml`) carries loader and report settings; the user file
//! (`<config_dir>/meshstat/config.toml`) only sets a preferred output mode.
//! Missing files fall back to defaults.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::env;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when no `--config` is given.
pub const PROJECT_CONFIG_FILE: &str = "meshstat.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProjectConfig {
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Edge-list parsing options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Discard the first line of the input.
    #[serde(default = "default_true")]
    pub header: bool,
    /// Let whitespace-only lines pass instead of failing the load.
    #[serde(default)]
    pub skip_blank_lines: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            header: default_true(),
            skip_blank_lines: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// How many `(node, coefficient)` pairs `analyze` prints.
    #[serde(default = "default_top")]
    pub top: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { top: default_top() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    /// One of `pretty`, `text` or `json`.
    pub resolved_output: String,
}

/// Load the project config.
///
/// An explicit `path` must exist. Without one, `meshstat.toml` in
/// `project_root` is used when present.
///
/// # Errors
///
/// Returns an error if an explicit path is missing or a file fails to
/// read or parse.
pub fn load_project_config(path: Option<&Path>, project_root: &Path) -> Result<ProjectConfig> {
    let path = match path {
        Some(explicit) => {
            if !explicit.exists() {
                bail!("config file {} does not exist", explicit.display());
            }
            explicit.to_path_buf()
        }
        None => {
            let implicit = project_root.join(PROJECT_CONFIG_FILE);
            if !implicit.exists() {
                return Ok(ProjectConfig::default());
            }
            implicit
        }
    };

    parse_file(&path)
}

/// Load the per-user config, defaulting when absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(path) = user_config_path() else {
        return Ok(UserConfig::default());
    };
    if !path.exists() {
        return Ok(UserConfig::default());
    }
    parse_file(&path)
}

/// Location of the per-user config file, if the platform has a config dir.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("meshstat/config.toml"))
}

/// Resolve all configuration sources into an [`EffectiveConfig`].
///
/// `cli_format` is the explicit `--format`/`--json` choice, which wins
/// over everything else.
///
/// # Errors
///
/// Returns an error if any config file fails to load.
pub fn resolve_config(
    config_path: Option<&Path>,
    project_root: &Path,
    cli_format: Option<&str>,
) -> Result<EffectiveConfig> {
    let project = load_project_config(config_path, project_root)?;
    let user = load_user_config()?;

    let env_format = env::var("FORMAT").ok();
    let resolved_output = resolve_output(
        cli_format,
        env_format.as_deref(),
        project.output.as_deref(),
        user.output.as_deref(),
        std::io::stdout().is_terminal(),
    )
    .to_string();

    Ok(EffectiveConfig {
        project,
        user,
        resolved_output,
    })
}

fn parse_file<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<T>(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn resolve_output(
    cli_format: Option<&str>,
    env_format: Option<&str>,
    project_output: Option<&str>,
    user_output: Option<&str>,
    is_tty: bool,
) -> &'static str {
    [cli_format, env_format, project_output, user_output]
        .into_iter()
        .flatten()
        .find_map(normalize_output_mode)
        .unwrap_or(if is_tty { "pretty" } else { "text" })
}

fn normalize_output_mode(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pretty" | "human" => Some("pretty"),
        "text" | "table" => Some("text"),
        "json" => Some("json"),
        _ => None,
    }
}

const fn default_true() -> bool {
    true
}

const fn default_top() -> usize {
    10
}
