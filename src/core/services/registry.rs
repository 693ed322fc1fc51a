//! Static task registry
//!
//! Maps implementation identifiers to the implementation's option schema and
//! a factory. Schemas are obtained through a function pointer, so they can be
//! inspected without building a task.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::core::models::{OptionsSchema, Task};
use crate::core::ports::{ProcessRunner, VersionControl};

/// Collaborators handed to task factories
#[derive(Debug, Clone)]
pub struct TaskServices {
    /// Runs external programs
    pub process: Arc<dyn ProcessRunner>,
    /// Git access
    pub vcs: Arc<dyn VersionControl>,
    /// Repository root, file paths in contexts are relative to it
    pub root: PathBuf,
}

/// Builds a fresh, unconfigured task instance
pub type TaskFactory = Arc<dyn Fn(&TaskServices) -> Box<dyn Task> + Send + Sync>;

/// A registered task implementation
#[derive(Clone)]
pub struct RegisteredTask {
    id: String,
    priority: i64,
    schema: fn() -> OptionsSchema,
    factory: TaskFactory,
}

impl RegisteredTask {
    /// Implementation identifier
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Priority used when the configuration does not set one
    #[must_use]
    pub const fn default_priority(&self) -> i64 {
        self.priority
    }

    /// Option schema of the implementation
    #[must_use]
    pub fn schema(&self) -> OptionsSchema {
        (self.schema)()
    }

    /// Build a fresh unconfigured instance
    #[must_use]
    pub fn build(&self, services: &TaskServices) -> Box<dyn Task> {
        (self.factory)(services)
    }
}

impl fmt::Debug for RegisteredTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredTask")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Registry of known task implementations, in registration order
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: IndexMap<String, RegisteredTask>,
}

impl TaskRegistry {
    /// An empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in task
    #[must_use]
    pub fn with_builtin_tasks() -> Self {
        let mut registry = Self::new();
        crate::tasks::register_builtin(&mut registry);
        registry
    }

    /// Register an implementation under `id`, replacing any earlier registration
    pub fn register<T, F>(&mut self, id: impl Into<String>, default_priority: i64, factory: F)
    where
        T: Task + 'static,
        F: Fn(&TaskServices) -> T + Send + Sync + 'static,
    {
        let id = id.into();
        log::debug!("Registering task implementation {id}");
        let task = RegisteredTask {
            id: id.clone(),
            priority: default_priority,
            schema: T::configurable_options,
            factory: Arc::new(move |services| Box::new(factory(services))),
        };
        self.tasks.insert(id, task);
    }

    /// Look up an implementation
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RegisteredTask> {
        self.tasks.get(id)
    }

    /// Whether `id` is registered
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.tasks.contains_key(id)
    }

    /// Registered identifiers, in registration order
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.tasks.keys().map(String::as_str).collect()
    }

    /// Schema of an implementation, without building it
    #[must_use]
    pub fn schema(&self, id: &str) -> Option<OptionsSchema> {
        self.get(id).map(RegisteredTask::schema)
    }

    /// Build a fresh unconfigured instance of an implementation
    #[must_use]
    pub fn build(&self, id: &str, services: &TaskServices) -> Option<Box<dyn Task>> {
        self.get(id).map(|task| task.build(services))
    }
}
