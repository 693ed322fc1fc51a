//! Business logic services
//!
//! Orchestration over the domain models. I/O only happens through the tasks
//! themselves and the ports they hold.
//!
//! - [`registry`] - Known task implementations
//! - [`resolver`] - Resolve declared tasks into configurations
//! - [`configurator`] - Bind a configuration to a task instance
//! - [`filter`] - Shared file filtering policy
//! - [`loader`] - Build configured tasks from configuration tables
//! - [`runner`] - Execute tasks and aggregate results

pub mod configurator;
pub mod filter;
pub mod loader;
pub mod registry;
pub mod resolver;
pub mod runner;

pub use configurator::configure;
pub use filter::FileFilter;
pub use loader::{LoadedTasks, TaskLoader};
pub use registry::{RegisteredTask, TaskFactory, TaskRegistry, TaskServices};
pub use resolver::{ResolveError, TaskConfigResolver};
pub use runner::{ParallelConfig, RunnerConfig, TaskRunner, execute, order_by_priority};
