//! Task declarations, metadata and resolved configurations

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::options::{OptionSpec, OptionType, Options, OptionsSchema, SchemaError};

/// One configured task entry: which implementation to use and its raw options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDeclaration {
    /// Registered implementation identifier
    pub class: String,
    /// Raw options, `metadata` sub-table included
    pub config: Options,
}

impl TaskDeclaration {
    /// Create a declaration
    #[must_use]
    pub fn new(class: impl Into<String>, config: Options) -> Self {
        Self {
            class: class.into(),
            config,
        }
    }
}

/// Configured task name to declaration, in configuration order
pub type DeclarationTable = IndexMap<String, TaskDeclaration>;

/// Execution metadata attached to every configured task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    priority: i64,
    blocking: bool,
    label: Option<String>,
    task: Option<String>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            priority: 0,
            blocking: true,
            label: None,
            task: None,
        }
    }
}

impl Metadata {
    /// Key of the metadata sub-table inside a task's options
    pub const KEY: &'static str = "metadata";

    /// Schema metadata tables are resolved against
    #[must_use]
    pub fn schema() -> OptionsSchema {
        OptionsSchema::builder()
            .option(OptionSpec::new("priority").with_default(0).with_types([OptionType::Int]))
            .option(OptionSpec::new("blocking").with_default(true).with_types([OptionType::Bool]))
            .option(OptionSpec::new("label").with_types([OptionType::String, OptionType::Null]))
            .option(OptionSpec::new("task").with_types([OptionType::String, OptionType::Null]))
            .build()
    }

    /// Resolve a raw metadata table
    pub fn from_options(schema: &OptionsSchema, raw: &Options) -> Result<Self, SchemaError> {
        let resolved = schema.resolve(raw)?;
        let defaults = Self::default();
        Ok(Self {
            priority: resolved.get("priority").and_then(Value::as_i64).unwrap_or(defaults.priority),
            blocking: resolved.get("blocking").and_then(Value::as_bool).unwrap_or(defaults.blocking),
            label: resolved.get("label").and_then(Value::as_str).map(String::from),
            task: resolved.get("task").and_then(Value::as_str).map(String::from),
        })
    }

    /// Higher runs first
    #[must_use]
    pub const fn priority(&self) -> i64 {
        self.priority
    }

    /// Whether a failure fails the whole run
    #[must_use]
    pub const fn blocking(&self) -> bool {
        self.blocking
    }

    /// Display label
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Implementation alias, when the configured name differs from the implementation
    #[must_use]
    pub fn task(&self) -> Option<&str> {
        self.task.as_deref()
    }
}

/// Fully resolved configuration of one task instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskConfig {
    name: String,
    options: Options,
    metadata: Metadata,
}

impl TaskConfig {
    /// Create a configuration
    #[must_use]
    pub fn new(name: impl Into<String>, options: Options, metadata: Metadata) -> Self {
        Self {
            name: name.into(),
            options,
            metadata,
        }
    }

    /// Placeholder configuration carried by unconfigured prototypes
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Options::new(), Metadata::default())
    }

    /// Configured task name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved options
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// Single option value
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Resolved metadata
    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Label if set, otherwise the task name
    #[must_use]
    pub fn label(&self) -> &str {
        self.metadata.label().unwrap_or(&self.name)
    }
}
