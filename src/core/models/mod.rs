//! Domain models for taskhook
//!
//! Pure data structures with no I/O dependencies.
//!
//! - [`OptionsSchema`] - Declared options of a task implementation
//! - [`TaskConfig`] - Resolved options and metadata of one configured task
//! - [`Context`] - Why tasks are running and over which files
//! - [`TaskResult`] - What one task reported
//! - [`Task`] - The task contract

mod config;
mod context;
mod files;
pub mod options;
mod pattern;
mod result;
mod task;

pub use config::{DeclarationTable, Metadata, TaskConfig, TaskDeclaration};
pub use context::{Context, ContextKind, GitCommitMsgContext, GitPreCommitContext, RunContext};
pub use files::FilesCollection;
pub use options::{OptionSpec, OptionType, Options, OptionsSchema, OptionsSchemaBuilder, SchemaError};
pub use pattern::{PathPattern, PatternError, compile_all, split_delimited};
pub use result::{
    EXIT_CONFIG_ERROR, EXIT_SUCCESS, EXIT_TASK_FAILURE, FixSuggestion, RunCounts, RunResult, TaskResult, TaskStatus,
};
pub use task::{Task, TaskError};
