//! Shell scripts task
//!
//! Runs every configured script through `sh`. A script is either a single
//! string (`"bin/check"`) or a list of arguments (`["bin/check", "--fast"]`).
//! All scripts run even when an earlier one fails; the failures are reported
//! together.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{Value, json};

use crate::core::models::{
    Context, OptionSpec, OptionType, OptionsSchema, Task, TaskConfig, TaskError, TaskResult,
};
use crate::core::ports::{CommandLine, ProcessRunner};
use crate::core::services::FileFilter;
use crate::core::services::filter::filter_options;

/// Registry identifier
pub const ID: &str = "shell";

/// Runs shell scripts
#[derive(Debug, Clone)]
pub struct Shell {
    config: TaskConfig,
    process: Arc<dyn ProcessRunner>,
    root: PathBuf,
}

impl Shell {
    /// Unconfigured task
    #[must_use]
    pub fn new(process: Arc<dyn ProcessRunner>, root: PathBuf) -> Self {
        Self {
            config: TaskConfig::empty(ID),
            process,
            root,
        }
    }

    fn scripts(&self) -> Vec<Vec<String>> {
        self.config
            .option("scripts")
            .and_then(Value::as_array)
            .map(|scripts| {
                scripts
                    .iter()
                    .filter_map(Value::as_array)
                    .map(|args| args.iter().filter_map(Value::as_str).map(String::from).collect())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Turn every string script into a one-element argument list
fn normalize_scripts(value: Value) -> Result<Value, String> {
    let Value::Array(scripts) = value else {
        return Err("expected a list of scripts".to_string());
    };
    scripts
        .into_iter()
        .map(|script| match script {
            Value::String(s) => Ok(json!([s])),
            Value::Array(args) if args.iter().all(Value::is_string) => Ok(Value::Array(args)),
            other => Err(format!("a script must be a string or a list of strings, got {other}")),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

impl Task for Shell {
    fn configurable_options() -> OptionsSchema {
        OptionsSchema::builder()
            .option(
                OptionSpec::new("scripts")
                    .with_default(json!([]))
                    .with_types([OptionType::Array])
                    .normalized_by(normalize_scripts),
            )
            .options(filter_options(&["php"]))
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
            log::debug!("{}: no relevant files", self.config.name());
            return Ok(TaskResult::skipped(&self.config, context));
        }

        let mut failures = Vec::new();
        for script in self.scripts() {
            let command = CommandLine::new("sh").args(script).current_dir(&self.root);
            let output = self.process.run(&command)?;
            if !output.success() {
                failures.push(output.formatted());
            }
        }

        if failures.is_empty() {
            Ok(TaskResult::passed(&self.config, context))
        } else {
            Ok(TaskResult::failed(&self.config, context, failures.join("\n")))
        }
    }
}
