//! Task configuration resolution
//!
//! Turns a raw declaration (implementation id + option table) into a validated
//! [`TaskConfig`]: the implementation's schema is looked up in the registry,
//! the `metadata` sub-table is split off and validated on its own, and the
//! remaining options are resolved against the schema.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::core::models::{
    DeclarationTable, Metadata, OptionType, Options, OptionsSchema, SchemaError, TaskConfig, TaskDeclaration,
};
use crate::core::services::registry::TaskRegistry;

/// Errors raised while resolving task configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No task is declared under this name
    #[error("unknown task \"{0}\"")]
    UnknownTask(String),

    /// The declared implementation is not a registered task
    #[error("unknown task implementation \"{0}\"")]
    UnknownClass(String),

    /// The task's options do not match its schema
    #[error("invalid options for task \"{task}\": {source}")]
    InvalidOptions {
        /// Task name
        task: String,
        /// Schema failure
        #[source]
        source: SchemaError,
    },

    /// The task's metadata table is invalid
    #[error("invalid metadata for task \"{task}\": {source}")]
    InvalidMetadata {
        /// Task name
        task: String,
        /// Schema failure
        #[source]
        source: SchemaError,
    },
}

impl ResolveError {
    /// Name of the task the error is about, when known
    #[must_use]
    pub fn task(&self) -> Option<&str> {
        match self {
            Self::UnknownTask(task) | Self::InvalidOptions { task, .. } | Self::InvalidMetadata { task, .. } => {
                Some(task)
            },
            Self::UnknownClass(_) => None,
        }
    }
}

/// Resolves declared task names into configurations
#[derive(Debug, Clone)]
pub struct TaskConfigResolver {
    registry: Arc<TaskRegistry>,
    declarations: DeclarationTable,
    metadata_schema: OptionsSchema,
}

impl TaskConfigResolver {
    /// Create a resolver over a declaration table
    #[must_use]
    pub fn new(registry: Arc<TaskRegistry>, declarations: DeclarationTable) -> Self {
        Self {
            registry,
            declarations,
            metadata_schema: Metadata::schema(),
        }
    }

    /// Declared task names, in declaration order
    #[must_use]
    pub fn list_available_task_names(&self) -> Vec<String> {
        self.declarations.keys().cloned().collect()
    }

    /// Raw declaration of a task
    #[must_use]
    pub fn declaration(&self, name: &str) -> Option<&TaskDeclaration> {
        self.declarations.get(name)
    }

    /// The registry implementations are looked up in
    #[must_use]
    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// Option schema of a declared task's implementation
    pub fn fetch_by_name(&self, name: &str) -> Result<OptionsSchema, ResolveError> {
        let declaration = self
            .declarations
            .get(name)
            .ok_or_else(|| ResolveError::UnknownTask(name.to_string()))?;

        if declaration.class.is_empty() {
            return Err(ResolveError::UnknownClass(declaration.class.clone()));
        }

        self.registry
            .schema(&declaration.class)
            .ok_or_else(|| ResolveError::UnknownClass(declaration.class.clone()))
    }

    /// Fully resolve a declared task
    pub fn resolve(&self, name: &str) -> Result<TaskConfig, ResolveError> {
        let schema = self.fetch_by_name(name)?;
        let mut options = self
            .declarations
            .get(name)
            .map(|declaration| declaration.config.clone())
            .unwrap_or_default();

        let raw_metadata = match options.remove(Metadata::KEY) {
            None => Options::new(),
            Some(Value::Object(table)) => table,
            Some(other) => {
                return Err(ResolveError::InvalidMetadata {
                    task: name.to_string(),
                    source: SchemaError::InvalidType {
                        name: Metadata::KEY.to_string(),
                        expected: vec![OptionType::Table],
                        actual: OptionType::of(&other),
                    },
                });
            },
        };

        let metadata =
            Metadata::from_options(&self.metadata_schema, &raw_metadata).map_err(|source| {
                ResolveError::InvalidMetadata {
                    task: name.to_string(),
                    source,
                }
            })?;

        let options = schema.resolve(&options).map_err(|source| ResolveError::InvalidOptions {
            task: name.to_string(),
            source,
        })?;

        log::debug!("Resolved task {name} (priority {})", metadata.priority());
        Ok(TaskConfig::new(name, options, metadata))
    }

    /// Resolve every declared task, in declaration order
    ///
    /// The first failure aborts the whole resolution.
    pub fn resolve_all(&self) -> Result<Vec<TaskConfig>, ResolveError> {
        self.declarations.keys().map(|name| self.resolve(name)).collect()
    }
}
