//! The task contract
//!
//! A task is a unit of QA work. Registered implementations act as prototypes:
//! [`Task::with_config`] never mutates the receiver, it returns a fresh
//! configured instance, so two configured names backed by the same
//! implementation never share state.

use std::fmt::Debug;

use thiserror::Error;

use super::config::TaskConfig;
use super::context::Context;
use super::options::OptionsSchema;
use super::pattern::PatternError;
use super::result::TaskResult;
use crate::core::ports::ProcessError;

/// Errors a task may raise instead of producing a result
///
/// The runner turns every error into a failed result for that task.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Option values are inconsistent in a way the schema cannot express
    #[error("task \"{task}\" is misconfigured: {message}")]
    Misconfigured {
        /// Task name
        task: String,
        /// What is wrong
        message: String,
    },

    /// A configured pattern does not compile
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// An external process could not be run
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// Filesystem access failed
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Version control access failed
    #[error(transparent)]
    Vcs(#[from] anyhow::Error),
}

/// A configurable, context-aware unit of QA work
pub trait Task: Send + Sync + Debug {
    /// Options this implementation understands
    fn configurable_options() -> OptionsSchema
    where
        Self: Sized;

    /// Current configuration
    fn config(&self) -> &TaskConfig;

    /// A new instance carrying `config`; the receiver is left unchanged
    fn with_config(&self, config: TaskConfig) -> Box<dyn Task>;

    /// Whether this task applies to the given context
    fn can_run_in_context(&self, context: &Context) -> bool;

    /// Execute the task; only called when [`Task::can_run_in_context`] is true
    fn run(&self, context: &Context) -> Result<TaskResult, TaskError>;
}
