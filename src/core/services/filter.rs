//! Shared file filtering policy
//!
//! Most tasks only care about some of the files in a context. The options read
//! here are the same for every task that declares them:
//!
//! - `triggered_by`: file extensions that make the task relevant
//! - `ignore_patterns`: paths to drop
//! - `whitelist_patterns` (or `paths`): paths to keep
//! - `always_execute` (or `run_always`): run even when no file is left

use serde_json::{Value, json};

use crate::core::models::options::normalize;
use crate::core::models::{
    Context, FilesCollection, OptionSpec, OptionType, Options, PathPattern, PatternError, compile_all,
};

/// Compiled filter of one configured task
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    triggered_by: Vec<String>,
    ignore: Vec<PathPattern>,
    whitelist: Vec<PathPattern>,
    always_execute: bool,
}

impl FileFilter {
    /// Read the filter options of a resolved option table
    pub fn from_options(options: &Options) -> Result<Self, PatternError> {
        let whitelist = strings(options, "whitelist_patterns")
            .or_else(|| strings(options, "paths"))
            .unwrap_or_default();

        Ok(Self {
            triggered_by: strings(options, "triggered_by").unwrap_or_default(),
            ignore: compile(&strings(options, "ignore_patterns").unwrap_or_default())?,
            whitelist: compile(&whitelist)?,
            always_execute: flag(options, "always_execute") || flag(options, "run_always"),
        })
    }

    /// Run even if no relevant file is left
    #[must_use]
    pub const fn always_execute(&self) -> bool {
        self.always_execute
    }

    /// Relevant files of a context: extensions, then ignores, then whitelist
    #[must_use]
    pub fn apply(&self, context: &Context) -> FilesCollection {
        context
            .files()
            .extensions(&self.triggered_by)
            .not_paths(&self.ignore)
            .paths(&self.whitelist)
    }

    /// Whether a task with these relevant files should be skipped
    #[must_use]
    pub fn should_skip(&self, files: &FilesCollection) -> bool {
        files.is_empty() && !self.always_execute
    }
}

fn strings(options: &Options, key: &str) -> Option<Vec<String>> {
    match options.get(key)? {
        Value::Array(items) => Some(items.iter().filter_map(Value::as_str).map(String::from).collect()),
        Value::String(s) => Some(vec![s.clone()]),
        _ => None,
    }
}

fn flag(options: &Options, key: &str) -> bool {
    options.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn compile(patterns: &[String]) -> Result<Vec<PathPattern>, PatternError> {
    compile_all(patterns.iter().map(String::as_str))
}

/// Option declarations for the filter keys
///
/// `triggered_by` defaults to the given extensions.
#[must_use]
pub fn filter_options(triggered_by: &[&str]) -> Vec<OptionSpec> {
    vec![
        OptionSpec::new("triggered_by")
            .with_default(json!(triggered_by))
            .with_types([OptionType::Array, OptionType::String])
            .normalized_by(normalize::string_list),
        OptionSpec::new("ignore_patterns")
            .with_default(json!([]))
            .with_types([OptionType::Array, OptionType::String])
            .normalized_by(normalize::pattern_list),
        OptionSpec::new("whitelist_patterns")
            .with_default(json!([]))
            .with_types([OptionType::Array, OptionType::String])
            .normalized_by(normalize::pattern_list),
    ]
}

/// Declaration of `always_execute`
#[must_use]
pub fn always_execute_option() -> OptionSpec {
    OptionSpec::new("always_execute").with_default(false).with_types([OptionType::Bool])
}
