//! Run configuration loaded from TOML.
//!
//! Both sections are optional; an absent file or section gives the stock
//! behavior (nothing excluded, missing CSV cells become `N/A`).
//!
//! # Configuration File Format
//!
//! ```toml
//! [organizer.exclude]
//! filenames = ["Thumbs.db"]
//! patterns = ["projects/**", "*.lock"]
//! regex = ["^draft_"]
//!
//! [cleaner]
//! missing_value = "N/A"
//! ```
//!
//! Glob patterns are matched against the path relative to the organized
//! root; regexes are matched against the bare file name.

use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the organized root when no explicit path is given.
pub const ROOT_CONFIG_NAME: &str = ".tidyup.toml";

/// Value written into missing CSV cells unless configured otherwise.
pub const DEFAULT_MISSING_VALUE: &str = "N/A";

/// Errors that can occur during configuration loading and compilation.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or an unusable value.
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    InvalidRegexPattern { pattern: String, reason: String },
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TidyConfig {
    #[serde(default)]
    pub organizer: OrganizerSettings,
    #[serde(default)]
    pub cleaner: CleanerSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizerSettings {
    /// Files matching any of these rules are neither deleted nor moved.
    #[serde(default)]
    pub exclude: ExcludeRules,
}

/// Rules for leaving files where they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact file names (e.g. "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns relative to the root (e.g. "projects/**").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Regex patterns tested against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanerSettings {
    /// Sentinel written into every missing cell.
    #[serde(default = "default_missing_value")]
    pub missing_value: String,
}

fn default_missing_value() -> String {
    DEFAULT_MISSING_VALUE.to_string()
}

impl Default for CleanerSettings {
    fn default() -> Self {
        Self {
            missing_value: default_missing_value(),
        }
    }
}

impl TidyConfig {
    /// Load configuration, with fallback to defaults.
    ///
    /// Lookup order:
    /// 1. `config_path`, if provided
    /// 2. `.tidyup.toml` inside `root`
    /// 3. `~/.config/tidyup/config.toml`
    /// 4. Built-in defaults
    ///
    /// # Errors
    ///
    /// Returns an error if a file is found (or explicitly given) but cannot
    /// be read or parsed, or if it sets an empty `missing_value`.
    pub fn load(config_path: Option<&Path>, root: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let root_config = root.join(ROOT_CONFIG_NAME);
        if root_config.is_file() {
            return Self::load_from_file(&root_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("tidyup")
                .join("config.toml");
            if home_config.is_file() {
                return Self::load_from_file(&home_config);
            }
        }

        log::debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let config = Self::from_toml(&content)?;
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a configuration document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;

        // An empty sentinel would be read back as missing on the next run.
        if config.cleaner.missing_value.is_empty() {
            return Err(ConfigError::ConfigInvalid(
                "cleaner.missing_value must not be empty".to_string(),
            ));
        }

        Ok(config)
    }

    /// Compile the organizer exclusion rules for matching.
    pub fn exclude_matcher(&self) -> Result<ExcludeMatcher, ConfigError> {
        ExcludeMatcher::new(&self.organizer.exclude)
    }
}

/// Pre-compiled exclusion rules.
#[derive(Debug, Default)]
pub struct ExcludeMatcher {
    filenames: HashSet<String>,
    patterns: Vec<Pattern>,
    regexes: Vec<Regex>,
}

impl ExcludeMatcher {
    /// Compile rules, failing on the first invalid glob or regex.
    pub fn new(rules: &ExcludeRules) -> Result<Self, ConfigError> {
        let patterns = rules
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let regexes = rules
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            filenames: rules.filenames.iter().cloned().collect(),
            patterns,
            regexes,
        })
    }

    /// Returns true if the file at `path` (somewhere under `root`) is excluded.
    pub fn is_excluded(&self, root: &Path, path: &Path) -> bool {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.filenames.contains(file_name.as_ref()) {
            return true;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        if self
            .patterns
            .iter()
            .any(|pattern| pattern.matches_path(relative))
        {
            return true;
        }

        self.regexes.iter().any(|regex| regex.is_match(&file_name))
    }

    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty() && self.patterns.is_empty() && self.regexes.is_empty()
    }
}
