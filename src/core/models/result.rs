//! Task and run results

use serde::Serialize;

use super::config::TaskConfig;
use super::context::{Context, ContextKind};

/// Process exit code for a successful run
pub const EXIT_SUCCESS: u8 = 0;
/// Process exit code when at least one blocking task failed
pub const EXIT_TASK_FAILURE: u8 = 1;
/// Process exit code for configuration errors
pub const EXIT_CONFIG_ERROR: u8 = 2;

/// A command that would fix the reported problems
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixSuggestion {
    /// Task that produced the suggestion
    pub task: String,
    /// Human readable description
    pub description: String,
    /// Program followed by its arguments
    pub command: Vec<String>,
}

impl FixSuggestion {
    /// Command rendered as a single shell line
    #[must_use]
    pub fn command_line(&self) -> String {
        self.command
            .iter()
            .map(|part| {
                if part.is_empty() || part.contains(char::is_whitespace) {
                    format!("'{}'", part.replace('\'', "'\\''"))
                } else {
                    part.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Outcome of a single task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskStatus {
    /// The task ran and succeeded
    Passed,
    /// The task did not apply (wrong context or no relevant files)
    Skipped,
    /// The task failed
    Failed {
        /// Diagnostic output
        message: String,
    },
    /// The task failed and can be fixed automatically
    FailedFixable {
        /// Diagnostic output
        message: String,
        /// How to fix it
        fix: FixSuggestion,
    },
    /// The task failed but is configured as non-blocking
    NonBlockingFailed {
        /// Diagnostic output
        message: String,
        /// How to fix it, if known
        #[serde(skip_serializing_if = "Option::is_none")]
        fix: Option<FixSuggestion>,
    },
}

/// Result of running one configured task in one context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskResult {
    /// Configured task name
    pub task: String,
    /// Display label
    pub label: String,
    /// Context the task ran in
    pub context: ContextKind,
    /// Outcome
    #[serde(flatten)]
    pub status: TaskStatus,
}

impl TaskResult {
    fn new(config: &TaskConfig, context: &Context, status: TaskStatus) -> Self {
        Self {
            task: config.name().to_string(),
            label: config.label().to_string(),
            context: context.kind(),
            status,
        }
    }

    /// Successful result
    #[must_use]
    pub fn passed(config: &TaskConfig, context: &Context) -> Self {
        Self::new(config, context, TaskStatus::Passed)
    }

    /// Skipped result
    #[must_use]
    pub fn skipped(config: &TaskConfig, context: &Context) -> Self {
        Self::new(config, context, TaskStatus::Skipped)
    }

    /// Failed result
    #[must_use]
    pub fn failed(config: &TaskConfig, context: &Context, message: impl Into<String>) -> Self {
        Self::new(config, context, TaskStatus::Failed { message: message.into() })
    }

    /// Failed result that carries a fix
    #[must_use]
    pub fn fixable(config: &TaskConfig, context: &Context, message: impl Into<String>, fix: FixSuggestion) -> Self {
        Self::new(
            config,
            context,
            TaskStatus::FailedFixable {
                message: message.into(),
                fix,
            },
        )
    }

    /// Downgrade a failure to a non-blocking failure; other outcomes are unchanged
    #[must_use]
    pub fn into_non_blocking(self) -> Self {
        let status = match self.status {
            TaskStatus::Failed { message } => TaskStatus::NonBlockingFailed { message, fix: None },
            TaskStatus::FailedFixable { message, fix } => TaskStatus::NonBlockingFailed {
                message,
                fix: Some(fix),
            },
            other => other,
        };
        Self { status, ..self }
    }

    /// Whether this result fails the run
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self.status, TaskStatus::Failed { .. } | TaskStatus::FailedFixable { .. })
    }

    /// Whether this result is any kind of failure, blocking or not
    #[must_use]
    pub const fn has_failed(&self) -> bool {
        self.is_failure() || matches!(self.status, TaskStatus::NonBlockingFailed { .. })
    }

    /// Diagnostic message of a failure
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match &self.status {
            TaskStatus::Failed { message }
            | TaskStatus::FailedFixable { message, .. }
            | TaskStatus::NonBlockingFailed { message, .. } => Some(message),
            TaskStatus::Passed | TaskStatus::Skipped => None,
        }
    }

    /// Fix suggestion of a failure
    #[must_use]
    pub const fn fix(&self) -> Option<&FixSuggestion> {
        match &self.status {
            TaskStatus::FailedFixable { fix, .. } => Some(fix),
            TaskStatus::NonBlockingFailed { fix, .. } => fix.as_ref(),
            _ => None,
        }
    }
}

/// Per-status tallies of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunCounts {
    /// Passed tasks
    pub passed: usize,
    /// Skipped tasks
    pub skipped: usize,
    /// Blocking failures
    pub failed: usize,
    /// Non-blocking failures
    pub warnings: usize,
}

/// Aggregate of all task results of one run, in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunResult {
    /// Individual results
    pub results: Vec<TaskResult>,
    /// Whether the run stopped early after a failure
    pub aborted: bool,
}

impl RunResult {
    /// Create a run result
    #[must_use]
    pub const fn new(results: Vec<TaskResult>, aborted: bool) -> Self {
        Self { results, aborted }
    }

    /// True when no blocking task failed
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.results.iter().any(TaskResult::is_failure)
    }

    /// Fix suggestions of every failed task
    #[must_use]
    pub fn fix_suggestions(&self) -> Vec<&FixSuggestion> {
        self.results.iter().filter_map(TaskResult::fix).collect()
    }

    /// Status tallies
    #[must_use]
    pub fn counts(&self) -> RunCounts {
        self.results.iter().fold(RunCounts::default(), |mut counts, result| {
            match result.status {
                TaskStatus::Passed => counts.passed += 1,
                TaskStatus::Skipped => counts.skipped += 1,
                TaskStatus::Failed { .. } | TaskStatus::FailedFixable { .. } => counts.failed += 1,
                TaskStatus::NonBlockingFailed { .. } => counts.warnings += 1,
            }
            counts
        })
    }

    /// Process exit code for this run
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        if self.is_success() { EXIT_SUCCESS } else { EXIT_TASK_FAILURE }
    }
}
