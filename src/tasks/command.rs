//! Generic external tool task
//!
//! Wraps any command line tool: `command args… files…`. When `fix_args` is set
//! a failure is reported as fixable, with `command fix_args… files…` as the fix.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{Value, json};

use super::{bool_option, string_list};
use crate::core::models::options::normalize;
use crate::core::models::{
    Context, FixSuggestion, OptionSpec, OptionType, OptionsSchema, Task, TaskConfig, TaskError, TaskResult,
};
use crate::core::ports::{CommandLine, ProcessRunner};
use crate::core::services::FileFilter;
use crate::core::services::filter::{always_execute_option, filter_options};

/// Registry identifier
pub const ID: &str = "command";

/// Runs an external tool over the relevant files
#[derive(Debug, Clone)]
pub struct ExternalCommand {
    config: TaskConfig,
    process: Arc<dyn ProcessRunner>,
    root: PathBuf,
}

impl ExternalCommand {
    /// Unconfigured task
    #[must_use]
    pub fn new(process: Arc<dyn ProcessRunner>, root: PathBuf) -> Self {
        Self {
            config: TaskConfig::empty(ID),
            process,
            root,
        }
    }

    fn program(&self) -> Result<&str, TaskError> {
        self.config
            .option("command")
            .and_then(Value::as_str)
            .filter(|command| !command.trim().is_empty())
            .ok_or_else(|| TaskError::Misconfigured {
                task: self.config.name().to_string(),
                message: "\"command\" must be a non-empty string".to_string(),
            })
    }

    fn fix_args(&self) -> Option<Vec<String>> {
        match self.config.option("fix_args") {
            Some(Value::Array(_)) => Some(string_list(self.config.options(), "fix_args")),
            _ => None,
        }
    }
}

impl Task for ExternalCommand {
    fn configurable_options() -> OptionsSchema {
        OptionsSchema::builder()
            .option(OptionSpec::new("command").with_types([OptionType::String]).required())
            .option(
                OptionSpec::new("args")
                    .with_default(json!([]))
                    .with_types([OptionType::Array, OptionType::String])
                    .normalized_by(normalize::string_list),
            )
            .option(
                OptionSpec::new("fix_args")
                    .with_default(Value::Null)
                    .with_types([OptionType::Array, OptionType::Null]),
            )
            .option(OptionSpec::new("pass_filenames").with_default(true).with_types([OptionType::Bool]))
            .options(filter_options(&[]))
            .option(always_execute_option())
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
        let options = self.config.options();
        let filter = FileFilter::from_options(options)?;
        let files = filter.apply(context);
        if filter.should_skip(&files) {
            log::debug!("{}: no relevant files", self.config.name());
            return Ok(TaskResult::skipped(&self.config, context));
        }

        let program = self.program()?;
        let executable = self.process.locate(program)?;
        let filenames = if bool_option(options, "pass_filenames", true) { files.to_strings() } else { Vec::new() };

        let command = CommandLine::new(executable.to_string_lossy())
            .args(string_list(options, "args"))
            .args(filenames.iter().cloned())
            .current_dir(&self.root);
        let output = self.process.run(&command)?;
        if output.success() {
            return Ok(TaskResult::passed(&self.config, context));
        }

        let mut message = output.formatted();
        if message.is_empty() {
            message = match output.code {
                Some(code) => format!("{program} exited with code {code}"),
                None => format!("{program} was terminated by a signal"),
            };
        }

        match self.fix_args() {
            Some(fix_args) => {
                let fix = FixSuggestion {
                    task: self.config.name().to_string(),
                    description: format!("Run {program} with its fix arguments"),
                    command: std::iter::once(program.to_string()).chain(fix_args).chain(filenames).collect(),
                };
                Ok(TaskResult::fixable(&self.config, context, message, fix))
            },
            None => Ok(TaskResult::failed(&self.config, context, message)),
        }
    }
}
