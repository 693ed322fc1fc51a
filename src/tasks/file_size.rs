//! Large file detection

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use serde_json::{Value, json};

use crate::core::models::options::normalize;
use crate::core::models::{
    Context, OptionSpec, OptionType, OptionsSchema, Task, TaskConfig, TaskError, TaskResult,
};
use crate::core::services::FileFilter;

/// Registry identifier
pub const ID: &str = "file_size";

const DEFAULT_MAX_SIZE: &str = "10M";

/// Rejects files larger than `max_size`
#[derive(Debug, Clone)]
pub struct FileSize {
    config: TaskConfig,
    root: PathBuf,
}

impl FileSize {
    /// Unconfigured task
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            config: TaskConfig::empty(ID),
            root,
        }
    }

    fn max_size(&self) -> String {
        match self.config.option("max_size") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => DEFAULT_MAX_SIZE.to_string(),
        }
    }
}

/// Parse a size like `10M`, `512k` or `1Gi` into bytes
///
/// `k`, `m` and `g` are powers of 1000, `ki`, `mi` and `gi` powers of 1024.
/// Units are case-insensitive; a bare number is bytes.
pub fn parse_size(size: &str) -> Result<u64, String> {
    let size = size.trim();
    let split = size.find(|c: char| !c.is_ascii_digit()).unwrap_or(size.len());
    let (number, unit) = size.split_at(split);
    let number: u64 = number.parse().map_err(|_| format!("invalid size \"{size}\""))?;

    let multiplier: u64 = match unit.trim().to_ascii_lowercase().as_str() {
        "" => 1,
        "k" => 1000,
        "ki" => 1024,
        "m" => 1000 * 1000,
        "mi" => 1024 * 1024,
        "g" => 1000 * 1000 * 1000,
        "gi" => 1024 * 1024 * 1024,
        other => return Err(format!("unknown size unit \"{other}\" in \"{size}\"")),
    };

    number
        .checked_mul(multiplier)
        .ok_or_else(|| format!("size \"{size}\" is too large"))
}

fn normalize_max_size(value: Value) -> Result<Value, String> {
    let text = match &value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => return Err(format!("expected a size, got {other}")),
    };
    parse_size(&text)?;
    Ok(value)
}

impl Task for FileSize {
    fn configurable_options() -> OptionsSchema {
        OptionsSchema::builder()
            .option(
                OptionSpec::new("max_size")
                    .with_default(DEFAULT_MAX_SIZE)
                    .with_types([OptionType::String, OptionType::Int])
                    .normalized_by(normalize_max_size),
            )
            .option(
                OptionSpec::new("ignore_patterns")
                    .with_default(json!([]))
                    .with_types([OptionType::Array, OptionType::String])
                    .normalized_by(normalize::pattern_list),
            )
            .build()
    }

    fn config(&self) -> &TaskConfig {
        &self.config
    }

    fn with_config(&self, config: TaskConfig) -> Box<dyn Task> {
        Box::new(Self {
            config,
            ..self.clone()
        })
    }

    fn can_run_in_context(&self, context: &Context) -> bool {
        matches!(context, Context::Run(_) | Context::PreCommit(_))
    }

    fn run(&self, context: &Context) -> Result<TaskResult, TaskError> {
        let filter = FileFilter::from_options(self.config.options())?;
        let files = filter.apply(context);
        if filter.should_skip(&files) {
            return Ok(TaskResult::skipped(&self.config, context));
        }

        let max_size = self.max_size();
        let limit = parse_size(&max_size).map_err(|message| TaskError::Misconfigured {
            task: self.config.name().to_string(),
            message,
        })?;

        let mut large = Vec::new();
        for file in &files {
            let Ok(metadata) = fs::symlink_metadata(self.root.join(file)) else {
                log::debug!("{}: {} is missing, ignored", self.config.name(), file.display());
                continue;
            };
            if metadata.file_type().is_symlink() || !metadata.is_file() {
                continue;
            }
            if metadata.len() > limit {
                large.push(file);
            }
        }

        if large.is_empty() {
            return Ok(TaskResult::passed(&self.config, context));
        }

        let mut message = String::from("Large files detected:\n");
        for file in large {
            let _ = writeln!(message, "- {} exceeded the maximum size of {max_size}.", file.display());
        }
        Ok(TaskResult::failed(&self.config, context, message))
    }
}
