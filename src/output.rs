//! Output formatting for human and JSON modes
//!
//! This module provides structured output that can be rendered either as
//! human-readable text or machine-parseable JSON.

use std::fmt::Write as _;

use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

use crate::core::models::{ContextKind, FixSuggestion, OptionsSchema, RunCounts, RunResult, TaskResult, TaskStatus};

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

/// Result of a task run
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Context the tasks ran in
    pub context: ContextKind,
    /// Whether no blocking task failed
    pub success: bool,
    /// Whether the run stopped early
    pub aborted: bool,
    /// Status tallies
    pub counts: RunCounts,
    /// Individual task results
    pub results: Vec<TaskResult>,
    /// Fixes that could be applied
    pub fix_suggestions: Vec<FixSuggestion>,
    /// RFC 3339 timestamp
    pub finished_at: String,
}

impl RunReport {
    /// Build a report from a run result
    #[must_use]
    pub fn new(context: ContextKind, run: &RunResult) -> Self {
        Self {
            context,
            success: run.is_success(),
            aborted: run.aborted,
            counts: run.counts(),
            results: run.results.clone(),
            fix_suggestions: run.fix_suggestions().into_iter().cloned().collect(),
            finished_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => print!("{}", self.format_human()),
            OutputMode::Json => self.render_json(),
        }
    }

    /// Human readable rendering
    #[must_use]
    pub fn format_human(&self) -> String {
        let mut out = String::new();

        if self.results.is_empty() {
            let _ = writeln!(out, "No tasks to run.");
            return out;
        }

        let _ = writeln!(out, "Running tasks ({})...\n", self.context);
        for result in &self.results {
            let tag = match &result.status {
                TaskStatus::Passed => "PASS".green().bold(),
                TaskStatus::Skipped => "SKIP".dimmed(),
                TaskStatus::Failed { .. } => "FAIL".red().bold(),
                TaskStatus::FailedFixable { .. } => "FIX ".yellow().bold(),
                TaskStatus::NonBlockingFailed { .. } => "WARN".yellow(),
            };
            let _ = writeln!(out, "  [{tag}] {}", result.label);
            if let Some(message) = result.message() {
                for line in message.lines() {
                    let _ = writeln!(out, "         {line}");
                }
            }
        }

        let counts = self.counts;
        let _ = writeln!(
            out,
            "\n{} passed, {} failed, {} skipped, {} warning(s)",
            counts.passed, counts.failed, counts.skipped, counts.warnings
        );

        if self.aborted {
            let _ = writeln!(out, "Stopped after the first failure.");
        }

        if !self.fix_suggestions.is_empty() {
            let _ = writeln!(out, "\n{}", "Fixes available:".bold());
            for fix in &self.fix_suggestions {
                let _ = writeln!(out, "  {}: {}", fix.task, fix.command_line());
            }
            let _ = writeln!(out, "Run with --fix to apply them.");
        }

        if self.success {
            let _ = writeln!(out, "\n{}", "All tasks passed.".green());
        } else {
            let _ = writeln!(out, "\n{}", "Some tasks failed.".red().bold());
        }
        out
    }

    fn render_json(&self) {
        println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
    }
}

/// Description of one accepted option
#[derive(Debug, Serialize)]
pub struct OptionInfo {
    /// Option name
    pub name: String,
    /// Accepted types, empty for any
    pub types: Vec<String>,
    /// Default value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Whether the option must be set
    pub required: bool,
}

impl OptionInfo {
    /// Describe every option of a schema
    #[must_use]
    pub fn from_schema(schema: &OptionsSchema) -> Vec<Self> {
        schema
            .specs()
            .iter()
            .map(|spec| Self {
                name: spec.name().to_string(),
                types: spec.types().iter().map(ToString::to_string).collect(),
                default: spec.default_value().cloned(),
                required: spec.is_required(),
            })
            .collect()
    }
}

/// Information about a configured task
#[derive(Debug, Serialize)]
pub struct TaskInfo {
    /// Configured name
    pub name: String,
    /// Implementation identifier
    pub implementation: String,
    /// Resolved priority
    pub priority: i64,
    /// Whether failures fail the run
    pub blocking: bool,
    /// Accepted options
    pub options: Vec<OptionInfo>,
}

/// Result of a task list operation
#[derive(Debug, Serialize)]
pub struct TaskListReport {
    /// Configured tasks, in declaration order
    pub tasks: Vec<TaskInfo>,
}

impl TaskListReport {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => print!("{}", self.format_human()),
            OutputMode::Json => self.render_json(),
        }
    }

    /// Human readable rendering
    #[must_use]
    pub fn format_human(&self) -> String {
        let mut out = String::new();
        if self.tasks.is_empty() {
            let _ = writeln!(out, "No tasks configured.");
            return out;
        }

        let _ = writeln!(out, "Tasks:\n");
        for task in &self.tasks {
            let _ = write!(out, "  {} ({})", task.name.bold(), task.implementation);
            let _ = write!(out, " priority {}", task.priority);
            if !task.blocking {
                let _ = write!(out, ", non-blocking");
            }
            let _ = writeln!(out);
            for option in &task.options {
                let types = if option.types.is_empty() { "any".to_string() } else { option.types.join("|") };
                let detail = match (&option.default, option.required) {
                    (_, true) => "required".to_string(),
                    (Some(default), false) => format!("default {default}"),
                    (None, false) => "optional".to_string(),
                };
                let _ = writeln!(out, "      {} <{types}> {detail}", option.name);
            }
            let _ = writeln!(out);
        }
        out
    }

    fn render_json(&self) {
        println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
    }
}

/// Generic operation result for simple commands
#[derive(Debug, Serialize)]
pub struct OperationResult {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable message
    pub message: String,
}

impl OperationResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => println!("{}", self.message),
            OutputMode::Json => {
                println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
            },
        }
    }
}
