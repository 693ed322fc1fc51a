//! TOML parser for taskhook.toml files
//!
//! Handles discovering, reading and deserializing taskhook configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::ConfigError;
use super::env::substitute_with;
use crate::core::models::Options;
use crate::core::services::{ParallelConfig, RunnerConfig};

/// Configuration file names, in lookup order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["taskhook.toml", ".taskhook.toml"];

/// Sections placeholders are substituted in
const SUBSTITUTED_SECTIONS: [&str; 3] = ["settings", "testsuites", "tasks"];

/// A taskhook.toml file structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Runner settings
    #[serde(default)]
    pub settings: Settings,

    /// Variables available to `%env()%` placeholders
    #[serde(default)]
    pub environment: Environment,

    /// Named task selections
    #[serde(default)]
    pub testsuites: IndexMap<String, TestSuite>,

    /// Configured tasks, name to raw options
    #[serde(default)]
    pub tasks: IndexMap<String, Options>,
}

/// Runner-wide settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Stop after the first blocking failure
    pub stop_on_failure: bool,

    /// Seconds an external process may run, 0 disables the limit
    pub process_timeout: u64,

    /// Directory searched for executables before `PATH`
    pub bin_dir: Option<PathBuf>,

    /// Worker pool
    pub parallel: ParallelConfig,

    /// Automatic fixes
    pub fixer: FixerConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stop_on_failure: false,
            process_timeout: 60,
            bin_dir: None,
            parallel: ParallelConfig::default(),
            fixer: FixerConfig::default(),
        }
    }
}

impl Settings {
    /// Runner configuration derived from these settings
    #[must_use]
    pub const fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            stop_on_failure: self.stop_on_failure,
            parallel: self.parallel,
        }
    }

    /// Process timeout, `None` when disabled
    #[must_use]
    pub const fn process_timeout(&self) -> Option<Duration> {
        if self.process_timeout == 0 { None } else { Some(Duration::from_secs(self.process_timeout)) }
    }
}

/// Fixer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixerConfig {
    /// Whether fixes may be applied at all
    pub enabled: bool,
    /// Apply fixes without `--fix`
    pub fix_by_default: bool,
}

impl Default for FixerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fix_by_default: false,
        }
    }
}

/// `[environment]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Environment {
    /// Variables, looked up before the process environment
    pub variables: IndexMap<String, Value>,
}

impl Environment {
    /// Value of a configured variable as text
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<String> {
        self.variables.get(name).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// A named selection of tasks
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestSuite {
    /// Task names
    #[serde(default)]
    pub tasks: Vec<String>,
}

impl ConfigFile {
    /// Tasks of a test suite
    pub fn testsuite(&self, name: &str) -> Result<&TestSuite, ConfigError> {
        self.testsuites
            .get(name)
            .ok_or_else(|| ConfigError::UnknownTestSuite(name.to_string()))
    }
}

/// Find the configuration file from `from` up to the repository root
#[must_use]
pub fn find_config_file(from: &Path) -> Option<PathBuf> {
    let mut current = from.to_path_buf();

    // Normalize: if it's a file, start from parent
    if current.is_file() {
        current = current.parent().unwrap_or(from).to_path_buf();
    }

    loop {
        if let Some(found) = CONFIG_FILE_NAMES.iter().map(|name| current.join(name)).find(|path| path.is_file()) {
            return Some(found);
        }

        // Stop at repo root (.git) or filesystem root
        if current.join(".git").exists() {
            return None;
        }

        current = current.parent()?.to_path_buf();
    }
}

/// Load a configuration file
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Loading configuration from {}", path.display());
    parse_config(&content)
}

/// Parse configuration text, substituting placeholders from the process environment
///
/// # Errors
///
/// Returns an error if the text is not valid TOML, a placeholder cannot be
/// resolved or the structure is invalid.
pub fn parse_config(content: &str) -> Result<ConfigFile, ConfigError> {
    parse_config_with(content, |name| std::env::var(name).ok())
}

/// Parse configuration text with a custom fallback lookup for placeholders
///
/// `[environment.variables]` always take precedence over `fallback`.
///
/// # Errors
///
/// See [`parse_config`].
pub fn parse_config_with<F>(content: &str, fallback: F) -> Result<ConfigFile, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let table: toml::Table = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    let mut value = serde_json::to_value(table).map_err(|e| ConfigError::Invalid(e.to_string()))?;

    let environment: Environment = match value.get("environment") {
        Some(section) => serde_json::from_value(section.clone()).map_err(|e| ConfigError::Invalid(e.to_string()))?,
        None => Environment::default(),
    };
    let lookup = |name: &str| environment.variable(name).or_else(|| fallback(name));

    for section in SUBSTITUTED_SECTIONS {
        if let Some(section) = value.get_mut(section) {
            substitute_with(section, &lookup)?;
        }
    }

    serde_json::from_value(value).map_err(|e| ConfigError::Invalid(e.to_string()))
}
