use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::commit::DEFAULT_BREAKING_CHANGE_INDICATORS;
use crate::domain::TagPattern;
use crate::error::{MreleaserError, Result};

/// File name looked up in the working copy and in the user config directory
pub const CONFIG_FILE_NAME: &str = "mreleaser.toml";

/// Represents the complete configuration for mreleaser.
///
/// Contains the remote and tag settings, conventional commit rules, the tagger
/// identity fallback, and the CI environment captured at startup.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_push")]
    pub push: bool,

    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: String,

    #[serde(default)]
    pub output: OutputMode,

    #[serde(default)]
    pub conventional_commits: ConventionalCommitsConfig,

    #[serde(default)]
    pub tagger: TaggerConfig,

    /// Never read from or written to the config file.
    #[serde(skip)]
    pub ci: CiEnvironment,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_push() -> bool {
    true
}

fn default_tag_pattern() -> String {
    "{version}".to_string()
}

/// Returns the default list of commit types that trigger a minor bump.
fn default_minor_types() -> Vec<String> {
    vec!["feat".to_string()]
}

/// Returns the default list of commit types that trigger a patch bump.
fn default_patch_types() -> Vec<String> {
    vec!["fix".to_string()]
}

/// Returns the default list of breaking change indicators.
fn default_breaking_change_indicators() -> Vec<String> {
    DEFAULT_BREAKING_CHANGE_INDICATORS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Configuration for conventional commit analysis.
///
/// A `!` after the type/scope always marks a breaking change; the indicators
/// list only controls footer detection.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConventionalCommitsConfig {
    #[serde(default = "default_minor_types")]
    pub minor_types: Vec<String>,

    #[serde(default = "default_patch_types")]
    pub patch_types: Vec<String>,

    #[serde(default = "default_breaking_change_indicators")]
    pub breaking_change_indicators: Vec<String>,
}

impl Default for ConventionalCommitsConfig {
    fn default() -> Self {
        ConventionalCommitsConfig {
            minor_types: default_minor_types(),
            patch_types: default_patch_types(),
            breaking_change_indicators: default_breaking_change_indicators(),
        }
    }
}

fn default_tagger_name() -> String {
    "mreleaser".to_string()
}

fn default_tagger_email() -> String {
    "mreleaser@localhost".to_string()
}

/// Identity used for annotated tags when the repository has no `user.name`/`user.email`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TaggerConfig {
    #[serde(default = "default_tagger_name")]
    pub name: String,

    #[serde(default = "default_tagger_email")]
    pub email: String,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        TaggerConfig {
            name: default_tagger_name(),
            email: default_tagger_email(),
        }
    }
}

/// Which output sink reports results to the caller.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// GitHub annotations when running under GitHub Actions, plain text otherwise
    #[default]
    Auto,
    /// Plain `KEY=value` lines and styled messages
    Plain,
    /// GitHub Actions annotations, step outputs and environment exports
    Github,
}

/// CI host facts captured from the process environment once, at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CiEnvironment {
    pub github_actions: bool,
    pub github_output: Option<PathBuf>,
    pub github_env: Option<PathBuf>,
    pub token: Option<String>,
}

impl CiEnvironment {
    /// Read the CI variables from the current process environment.
    pub fn from_process() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        CiEnvironment {
            github_actions: lookup("GITHUB_ACTIONS").as_deref() == Some("true"),
            github_output: non_empty("GITHUB_OUTPUT").map(PathBuf::from),
            github_env: non_empty("GITHUB_ENV").map(PathBuf::from),
            token: non_empty("GH_TOKEN").or_else(|| non_empty("GITHUB_TOKEN")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            remote: default_remote(),
            push: default_push(),
            tag_pattern: default_tag_pattern(),
            output: OutputMode::default(),
            conventional_commits: ConventionalCommitsConfig::default(),
            tagger: TaggerConfig::default(),
            ci: CiEnvironment::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)
            .map_err(|e| MreleaserError::config(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Attach the CI environment snapshot.
    pub fn with_ci(mut self, ci: CiEnvironment) -> Self {
        self.ci = ci;
        self
    }

    /// Tag pattern parsed from `tag_pattern`.
    pub fn tag_pattern(&self) -> Result<TagPattern> {
        TagPattern::new(&self.tag_pattern)
    }

    /// Resolve `Auto` against the captured CI environment.
    pub fn effective_output(&self) -> OutputMode {
        match self.output {
            OutputMode::Auto if self.ci.github_actions => OutputMode::Github,
            OutputMode::Auto => OutputMode::Plain,
            other => other,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.remote.trim().is_empty() {
            return Err(MreleaserError::config("remote must not be empty"));
        }
        self.tag_pattern()?;
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `mreleaser.toml` in the working directory
/// 3. `mreleaser.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, working_dir: &Path) -> Result<Config> {
    let local = working_dir.join(CONFIG_FILE_NAME);

    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if local.exists() {
        local
    } else if let Some(user) = dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
    {
        user
    } else {
        tracing::debug!("no configuration file found, using defaults");
        return Ok(Config::default());
    };

    tracing::debug!(path = %path.display(), "loading configuration");
    let text = fs::read_to_string(&path).map_err(|e| {
        MreleaserError::config(format!("Cannot read {}: {}", path.display(), e))
    })?;
    Config::from_toml(&text)
}
