//! Commit message conventions
//!
//! Only applies to the commit-msg context. Lines starting with `#` are git
//! comments and are ignored, as is everything below the scissors line that
//! `git commit --verbose` adds.

use regex::Regex;
use serde_json::{Value, json};

use super::{bool_option, rule_regex, string_list};
use crate::core::models::{
    Context, OptionSpec, OptionType, Options, OptionsSchema, Task, TaskConfig, TaskError, TaskResult,
};

/// Registry identifier
pub const ID: &str = "git_commit_message";

const SCISSORS: &str = "# ------------------------ >8 ------------------------";
const TYPE_SCOPE_RULE: &str = "Invalid Type/Scope Format";
const DEFAULT_SUBJECT_PATTERN: &str = r#"([a-zA-Z0-9-_ #@'/\\"]+)"#;

const MERGE_PREFIXES: [&str; 4] = [
    "Merge branch '",
    "Merge remote-tracking branch '",
    "Merge pull request #",
    "Merge tag '",
];

/// Enforces commit message conventions
#[derive(Debug, Clone)]
pub struct CommitMessage {
    config: TaskConfig,
}

impl Default for CommitMessage {
    fn default() -> Self {
        Self::new()
    }
}

impl CommitMessage {
    /// Unconfigured task
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: TaskConfig::empty(ID),
        }
    }

    fn int(&self, key: &str) -> u64 {
        self.config.option(key).and_then(Value::as_u64).unwrap_or(0)
    }

    fn flag(&self, key: &str) -> bool {
        bool_option(self.config.options(), key, false)
    }

    fn check(&self, lines: &[&str], text: &str) -> Result<Vec<String>, TaskError> {
        let mut errors = Vec::new();
        let subject = lines.first().copied().unwrap_or_default();

        if self.flag("enforce_capitalized_subject") && !is_capitalized(subject) {
            errors.push("Subject should start with a capital letter.".to_string());
        }

        if self.flag("enforce_no_subject_punctuations") && subject.contains(|c: char| c.is_ascii_punctuation()) {
            errors.push("Please omit all punctuations from commit message subject.".to_string());
        }

        if self.flag("enforce_no_subject_trailing_period") && subject.trim_end().ends_with('.') {
            errors.push("Please omit trailing period from commit message subject.".to_string());
        }

        if self.flag("enforce_single_lined_subject") && lines.get(1).is_some_and(|line| !line.trim().is_empty()) {
            errors.push("Subject should be one line and followed by a blank line.".to_string());
        }

        let max_subject_width = self.int("max_subject_width");
        if max_subject_width > 0 && width(strip_autosquash(subject)) > max_subject_width {
            errors.push(format!("Please keep the subject <= {max_subject_width} characters."));
        }

        let max_body_width = self.int("max_body_width");
        if max_body_width > 0 {
            for (index, line) in lines.iter().enumerate().skip(1) {
                if width(line.trim_end()) > max_body_width {
                    errors.push(format!("Line {} of commit message has > {max_body_width} characters.", index + 1));
                }
            }
        }

        if !is_merge_commit(subject)
            && let Some(rule) = self.type_scope_rule()?
            && !rule.is_match(strip_autosquash(subject))
        {
            errors.push(format!("Rule not matched: \"{TYPE_SCOPE_RULE}\""));
        }

        let mut flags = String::new();
        if self.flag("case_insensitive") {
            flags.push('i');
        }
        if self.flag("multiline") {
            flags.push('m');
        }
        flags.push_str(self.config.option("additional_modifiers").and_then(Value::as_str).unwrap_or_default());

        for (name, rule) in self.matchers() {
            if !rule_regex(&rule, &flags)?.is_match(text) {
                errors.push(format!("Rule not matched: \"{name}\" {rule}"));
            }
        }

        Ok(errors)
    }

    /// Named matchers; list entries are named by their index
    fn matchers(&self) -> Vec<(String, String)> {
        match self.config.option("matchers") {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .filter_map(|(index, rule)| Some((index.to_string(), rule.as_str()?.to_string())))
                .collect(),
            Some(Value::Object(table)) => table
                .iter()
                .filter_map(|(name, rule)| Some((name.clone(), rule.as_str()?.to_string())))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Conventional commit rule, `None` when no convention is configured
    fn type_scope_rule(&self) -> Result<Option<Regex>, TaskError> {
        let Some(Value::Object(conventions)) = self.config.option("type_scope_conventions") else {
            return Ok(None);
        };
        if conventions.is_empty() {
            return Ok(None);
        }

        let alternatives = |key: &str, conventions: &Options| {
            let items = string_list(conventions, key);
            (!items.is_empty()).then(|| items.iter().map(String::as_str).map(regex::escape).collect::<Vec<_>>().join("|"))
        };

        let types = alternatives("types", conventions).unwrap_or_else(|| "[a-zA-Z0-9]+".to_string());
        let scopes = alternatives("scopes", conventions).unwrap_or_else(|| r"[a-zA-Z0-9-_ /]+".to_string());
        let subject = conventions
            .get("subject_pattern")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_SUBJECT_PATTERN);

        let pattern = format!(r"^({types})(:\s|\(({scopes})\):\s){subject}");
        Regex::new(&pattern).map(Some).map_err(|e| TaskError::Misconfigured {
            task: self.config.name().to_string(),
            message: format!("invalid type_scope_conventions: {e}"),
        })
    }
}

/// Message lines with comments removed, stopping at the scissors line
fn message_lines(message: &str) -> Vec<&str> {
    message
        .lines()
        .take_while(|line| line.trim_end() != SCISSORS)
        .filter(|line| !line.starts_with('#'))
        .collect()
}

fn is_merge_commit(subject: &str) -> bool {
    MERGE_PREFIXES.iter().any(|prefix| subject.starts_with(prefix))
}

fn strip_autosquash(subject: &str) -> &str {
    subject
        .strip_prefix("fixup! ")
        .or_else(|| subject.strip_prefix("squash! "))
        .unwrap_or(subject)
}

fn is_capitalized(subject: &str) -> bool {
    if subject.starts_with("fixup! ") || subject.starts_with("squash! ") {
        return true;
    }
    subject
        .trim_start_matches(|c: char| c.is_ascii_punctuation())
        .chars()
        .next()
        .is_some_and(char::is_uppercase)
}

fn width(line: &str) -> u64 {
    u64::try_from(line.chars().count()).unwrap_or(u64::MAX)
}

impl Task for CommitMessage {
    fn configurable_options() -> OptionsSchema {
        let flag = |name: &str, default: bool| OptionSpec::new(name).with_default(default).with_types([OptionType::Bool]);
        OptionsSchema::builder()
            .option(flag("allow_empty_message", false))
            .option(flag("enforce_capitalized_subject", true))
            .option(flag("enforce_no_subject_punctuations", false))
            .option(flag("enforce_no_subject_trailing_period", true))
            .option(flag("enforce_single_lined_subject", true))
            .option(OptionSpec::new("max_body_width").with_default(72).with_types([OptionType::Int]))
            .option(OptionSpec::new("max_subject_width").with_default(60).with_types([OptionType::Int]))
            .option(flag("case_insensitive", true))
            .option(flag("multiline", true))
            .option(
                OptionSpec::new("type_scope_conventions")
                    .with_default(json!({}))
                    .with_types([OptionType::Table, OptionType::Array]),
            )
            .option(flag("skip_on_merge_commit", true))
            .option(
                OptionSpec::new("matchers")
                    .with_default(json!([]))
                    .with_types([OptionType::Array, OptionType::Table]),
            )
            .option(OptionSpec::new("additional_modifiers").with_default("").with_types([OptionType::String]))
            .build()
    }

    fn config(&self) -> &TaskConfig {
        &self.config
    }

    fn with_config(&self, config: TaskConfig) -> Box<dyn Task> {
        Box::new(Self { config })
    }

    fn can_run_in_context(&self, context: &Context) -> bool {
        matches!(context, Context::CommitMsg(_))
    }

    fn run(&self, context: &Context) -> Result<TaskResult, TaskError> {
        let message = context.commit_message().unwrap_or_default();
        let lines = message_lines(message);
        let text = lines.join("\n");

        if self.flag("skip_on_merge_commit") && lines.first().is_some_and(|subject| is_merge_commit(subject)) {
            log::debug!("{}: merge commit, skipped", self.config.name());
            return Ok(TaskResult::skipped(&self.config, context));
        }

        if text.trim().is_empty() {
            return Ok(if self.flag("allow_empty_message") {
                TaskResult::passed(&self.config, context)
            } else {
                TaskResult::failed(&self.config, context, "Commit message should not be empty.")
            });
        }

        let errors = self.check(&lines, &text)?;
        if errors.is_empty() {
            Ok(TaskResult::passed(&self.config, context))
        } else {
            Ok(TaskResult::failed(
                &self.config,
                context,
                format!("{}\nOriginal commit message:\n{message}", errors.join("\n")),
            ))
        }
    }
}
