//! Building configured tasks from the configuration file's task tables
//!
//! Each configured name maps to an implementation: `metadata.task` when set,
//! otherwise the name itself. Every configured name gets its own instance,
//! even when several names share one implementation.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::core::models::{DeclarationTable, Metadata, Options, Task, TaskDeclaration};
use crate::core::services::configurator::configure;
use crate::core::services::registry::{TaskRegistry, TaskServices};
use crate::core::services::resolver::{ResolveError, TaskConfigResolver};

/// Builds declaration tables and configured task instances
#[derive(Debug, Clone, Copy)]
pub struct TaskLoader;

impl TaskLoader {
    /// Turn configured task tables into a declaration table
    ///
    /// The registry's default priority is merged under the configured metadata.
    pub fn declarations(
        registry: &TaskRegistry,
        configured: &IndexMap<String, Options>,
    ) -> Result<DeclarationTable, ResolveError> {
        let mut table = DeclarationTable::new();
        for (name, raw) in configured {
            let mut config = raw.clone();
            let metadata = match config.get(Metadata::KEY) {
                Some(Value::Object(metadata)) => Some(metadata.clone()),
                _ => None,
            };

            let class = metadata
                .as_ref()
                .and_then(|m| m.get("task"))
                .and_then(Value::as_str)
                .unwrap_or(name)
                .to_string();

            let registered = registry.get(&class).ok_or_else(|| ResolveError::UnknownTask(class.clone()))?;

            if let Some(mut metadata) = metadata {
                metadata
                    .entry("priority")
                    .or_insert_with(|| Value::from(registered.default_priority()));
                config.insert(Metadata::KEY.to_string(), Value::Object(metadata));
            } else if !config.contains_key(Metadata::KEY) {
                let mut metadata = Options::new();
                metadata.insert("priority".to_string(), Value::from(registered.default_priority()));
                config.insert(Metadata::KEY.to_string(), Value::Object(metadata));
            }

            if class != *name {
                log::debug!("Task {name} uses implementation {class}");
            }
            table.insert(name.clone(), TaskDeclaration::new(class, config));
        }
        Ok(table)
    }

    /// Resolve and build every declared task
    ///
    /// Any resolution failure aborts before a single task is returned.
    pub fn load(
        registry: Arc<TaskRegistry>,
        services: &TaskServices,
        configured: &IndexMap<String, Options>,
    ) -> Result<LoadedTasks, ResolveError> {
        let declarations = Self::declarations(&registry, configured)?;
        let resolver = TaskConfigResolver::new(registry, declarations);

        let mut tasks = Vec::new();
        for name in resolver.list_available_task_names() {
            let class = resolver
                .declaration(&name)
                .map(|declaration| declaration.class.clone())
                .unwrap_or_default();
            let prototype = resolver
                .registry()
                .build(&class, services)
                .ok_or_else(|| ResolveError::UnknownClass(class.clone()))?;
            tasks.push(configure(prototype.as_ref(), &resolver, &name)?);
        }

        Ok(LoadedTasks { resolver, tasks })
    }
}

/// Configured tasks together with the resolver that produced them
#[derive(Debug)]
pub struct LoadedTasks {
    resolver: TaskConfigResolver,
    tasks: Vec<Box<dyn Task>>,
}

impl LoadedTasks {
    /// The resolver
    #[must_use]
    pub const fn resolver(&self) -> &TaskConfigResolver {
        &self.resolver
    }

    /// Configured tasks, in declaration order
    #[must_use]
    pub fn tasks(&self) -> &[Box<dyn Task>] {
        &self.tasks
    }

    /// Consume into the configured tasks
    #[must_use]
    pub fn into_tasks(self) -> Vec<Box<dyn Task>> {
        self.tasks
    }

    /// Keep only the named tasks
    ///
    /// `None` keeps everything; an empty selection keeps nothing.
    /// Fails when a name is not configured.
    pub fn select<S: AsRef<str>>(self, names: Option<&[S]>) -> Result<Self, ResolveError> {
        let Some(names) = names else {
            return Ok(self);
        };
        if let Some(missing) = names
            .iter()
            .map(AsRef::as_ref)
            .find(|name| !self.tasks.iter().any(|task| task.config().name() == *name))
        {
            return Err(ResolveError::UnknownTask(missing.to_string()));
        }

        let Self { resolver, tasks } = self;
        let tasks = tasks
            .into_iter()
            .filter(|task| names.iter().any(|name| name.as_ref() == task.config().name()))
            .collect();
        Ok(Self { resolver, tasks })
    }
}
