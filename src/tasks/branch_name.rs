//! Branch naming rules
//!
//! A branch must not match any blacklist rule and, when a whitelist is
//! configured, must match at least one whitelist rule. Rules are delimited
//! regexes or globs anchored on both ends.

use std::sync::Arc;

use serde_json::{Value, json};

use super::{bool_option, rule_regex, string_list};
use crate::core::models::options::normalize;
use crate::core::models::{
    Context, OptionSpec, OptionType, OptionsSchema, Task, TaskConfig, TaskError, TaskResult,
};
use crate::core::ports::VersionControl;

/// Registry identifier
pub const ID: &str = "git_branch_name";

/// Enforces branch naming rules
#[derive(Debug, Clone)]
pub struct BranchName {
    config: TaskConfig,
    vcs: Arc<dyn VersionControl>,
}

impl BranchName {
    /// Unconfigured task
    #[must_use]
    pub fn new(vcs: Arc<dyn VersionControl>) -> Self {
        Self {
            config: TaskConfig::empty(ID),
            vcs,
        }
    }

    /// Rule violations of `branch`, empty when the name is acceptable
    pub fn violations(&self, branch: &str) -> Result<Vec<String>, TaskError> {
        let options = self.config.options();
        let modifiers = options.get("additional_modifiers").and_then(Value::as_str).unwrap_or_default();

        let mut errors = Vec::new();
        let mut blacklisted = false;
        for rule in string_list(options, "blacklist") {
            if rule_regex(&rule, modifiers)?.is_match(branch) {
                errors.push(format!("Matched blacklist rule: {rule}"));
                blacklisted = true;
            }
        }

        for rule in string_list(options, "whitelist") {
            if rule_regex(&rule, modifiers)?.is_match(branch) {
                if blacklisted {
                    errors.push(format!("Matched whitelist rule: {rule} (IGNORED due to presence in blacklist)"));
                    continue;
                }
                return Ok(Vec::new());
            }
            errors.push(format!("Whitelist rule not matched: {rule}"));
        }

        Ok(errors)
    }
}

impl Task for BranchName {
    fn configurable_options() -> OptionsSchema {
        let rules = |name: &str| {
            OptionSpec::new(name)
                .with_default(json!([]))
                .with_types([OptionType::Array, OptionType::String])
                .normalized_by(normalize::string_list)
        };
        OptionsSchema::builder()
            .option(rules("blacklist"))
            .option(rules("whitelist"))
            .option(OptionSpec::new("additional_modifiers").with_default("").with_types([OptionType::String]))
            .option(OptionSpec::new("allow_detached_head").with_default(true).with_types([OptionType::Bool]))
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
        let Some(branch) = self.vcs.current_branch()? else {
            return Ok(if bool_option(self.config.options(), "allow_detached_head", true) {
                TaskResult::passed(&self.config, context)
            } else {
                TaskResult::failed(
                    &self.config,
                    context,
                    "Branch naming convention task is not allowed on a detached HEAD.",
                )
            });
        };

        let errors = self.violations(&branch)?;
        if errors.is_empty() {
            Ok(TaskResult::passed(&self.config, context))
        } else {
            Ok(TaskResult::failed(&self.config, context, errors.join("\n")))
        }
    }
}
