//! Options schema
//!
//! A schema declares the option names a task understands together with their
//! defaults, accepted types, accepted values and normalizers. Resolving a raw
//! option table against a schema either yields a complete table (every declared
//! option with a default is present) or fails with a [`SchemaError`]. Partial
//! results never escape.

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

/// An option table as read from configuration
pub type Options = Map<String, Value>;

/// Pure transform applied to a value once it passed validation
pub type Normalizer = fn(Value) -> Result<Value, String>;

/// Semantic type of an option value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionType {
    /// Explicit null
    Null,
    /// Boolean
    Bool,
    /// Integer number
    Int,
    /// Floating point number
    Float,
    /// Integer or floating point number
    Number,
    /// String
    String,
    /// List of values
    Array,
    /// Nested table
    Table,
    /// Anything
    Any,
}

impl OptionType {
    /// Determine the concrete type of a value
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(n) if n.is_f64() => Self::Float,
            Value::Number(_) => Self::Int,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Table,
        }
    }

    /// Check whether a value is accepted by this type
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        let actual = Self::of(value);
        match self {
            Self::Any => true,
            Self::Number => matches!(actual, Self::Int | Self::Float),
            expected => expected == actual,
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Table => "table",
            Self::Any => "any",
        };
        f.write_str(name)
    }
}

/// Errors raised while resolving options against a schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// An option is not declared by a strict schema
    #[error("the option \"{name}\" does not exist, defined options are: {}", .known.join(", "))]
    UndefinedOption {
        /// The unknown option
        name: String,
        /// Options the schema declares
        known: Vec<String>,
    },

    /// A required option has no value
    #[error("the required option \"{0}\" is missing")]
    MissingRequired(String),

    /// The value has a type the option does not accept
    #[error("the option \"{name}\" is expected to be of type {}, but is of type {actual}", join_types(.expected))]
    InvalidType {
        /// The option name
        name: String,
        /// Accepted types
        expected: Vec<OptionType>,
        /// Type of the given value
        actual: OptionType,
    },

    /// The value is not in the accepted value list
    #[error("the option \"{name}\" has the value {value}, accepted values are: {}", join_values(.allowed))]
    InvalidValue {
        /// The option name
        name: String,
        /// The given value
        value: Value,
        /// Accepted values
        allowed: Vec<Value>,
    },

    /// The normalizer rejected the value
    #[error("the option \"{name}\" could not be normalized: {message}")]
    Normalization {
        /// The option name
        name: String,
        /// Normalizer diagnostic
        message: String,
    },
}

fn join_types(types: &[OptionType]) -> String {
    types.iter().map(ToString::to_string).collect::<Vec<_>>().join("\" or \"")
}

fn join_values(values: &[Value]) -> String {
    values.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Declaration of a single option
#[derive(Debug, Clone)]
pub struct OptionSpec {
    name: String,
    default: Option<Value>,
    types: Vec<OptionType>,
    allowed_values: Option<Vec<Value>>,
    required: bool,
    normalizer: Option<Normalizer>,
}

impl OptionSpec {
    /// Declare an option with no default, accepting any type
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            types: Vec::new(),
            allowed_values: None,
            required: false,
            normalizer: None,
        }
    }

    /// Set the default value
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Restrict the accepted types
    #[must_use]
    pub fn with_types(mut self, types: impl IntoIterator<Item = OptionType>) -> Self {
        self.types = types.into_iter().collect();
        self
    }

    /// Restrict the accepted values
    #[must_use]
    pub fn with_allowed_values(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.allowed_values = Some(values.into_iter().collect());
        self
    }

    /// Mark the option as required
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a normalizer, run after validation
    #[must_use]
    pub fn normalized_by(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    /// Option name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default value, if any
    #[must_use]
    pub const fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Accepted types (empty means any)
    #[must_use]
    pub fn types(&self) -> &[OptionType] {
        &self.types
    }

    /// Whether the option must be provided
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    fn validate(&self, value: Value) -> Result<Value, SchemaError> {
        if !self.types.is_empty() && !self.types.iter().any(|t| t.accepts(&value)) {
            return Err(SchemaError::InvalidType {
                name: self.name.clone(),
                expected: self.types.clone(),
                actual: OptionType::of(&value),
            });
        }

        if let Some(allowed) = &self.allowed_values
            && !allowed.contains(&value)
        {
            return Err(SchemaError::InvalidValue {
                name: self.name.clone(),
                value,
                allowed: allowed.clone(),
            });
        }

        match self.normalizer {
            Some(normalize) => normalize(value).map_err(|message| SchemaError::Normalization {
                name: self.name.clone(),
                message,
            }),
            None => Ok(value),
        }
    }
}

/// Immutable set of option declarations for one task implementation
#[derive(Debug, Clone)]
pub struct OptionsSchema {
    specs: Vec<OptionSpec>,
    strict: bool,
}

impl Default for OptionsSchema {
    fn default() -> Self {
        Self::empty()
    }
}

impl OptionsSchema {
    /// A strict schema that declares no options
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            specs: Vec::new(),
            strict: true,
        }
    }

    /// Start building a schema
    #[must_use]
    pub fn builder() -> OptionsSchemaBuilder {
        OptionsSchemaBuilder {
            schema: Self::empty(),
        }
    }

    /// Whether undeclared options are rejected
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict
    }

    /// Declared options, in declaration order
    #[must_use]
    pub fn specs(&self) -> &[OptionSpec] {
        &self.specs
    }

    /// Declared option names, in declaration order
    #[must_use]
    pub fn option_names(&self) -> Vec<String> {
        self.specs.iter().map(|s| s.name.clone()).collect()
    }

    /// Look up a declared option
    #[must_use]
    pub fn spec(&self, name: &str) -> Option<&OptionSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    /// Validate, default and normalize a raw option table
    ///
    /// The output lists declared options in declaration order. Declared
    /// options without a default that are not required and not given are left
    /// out. A lenient schema appends undeclared options unchanged.
    pub fn resolve(&self, raw: &Options) -> Result<Options, SchemaError> {
        if self.strict
            && let Some(name) = raw.keys().find(|key| self.spec(key).is_none())
        {
            return Err(SchemaError::UndefinedOption {
                name: name.clone(),
                known: self.option_names(),
            });
        }

        let mut resolved = Options::new();
        for spec in &self.specs {
            let value = match (raw.get(&spec.name), &spec.default) {
                (Some(value), _) | (None, Some(value)) => value.clone(),
                (None, None) if spec.required => {
                    return Err(SchemaError::MissingRequired(spec.name.clone()));
                },
                (None, None) => continue,
            };
            resolved.insert(spec.name.clone(), spec.validate(value)?);
        }

        if !self.strict {
            for (key, value) in raw {
                if !resolved.contains_key(key) {
                    resolved.insert(key.clone(), value.clone());
                }
            }
        }

        Ok(resolved)
    }
}

/// Builder for [`OptionsSchema`]
#[derive(Debug, Clone)]
pub struct OptionsSchemaBuilder {
    schema: OptionsSchema,
}

impl OptionsSchemaBuilder {
    /// Declare an option, replacing any earlier declaration with the same name
    #[must_use]
    pub fn option(mut self, spec: OptionSpec) -> Self {
        self.schema.specs.retain(|s| s.name != spec.name);
        self.schema.specs.push(spec);
        self
    }

    /// Declare several options
    #[must_use]
    pub fn options(self, specs: impl IntoIterator<Item = OptionSpec>) -> Self {
        specs.into_iter().fold(self, Self::option)
    }

    /// Accept undeclared options and pass them through unchanged
    #[must_use]
    pub const fn lenient(mut self) -> Self {
        self.schema.strict = false;
        self
    }

    /// Finish the schema
    #[must_use]
    pub fn build(self) -> OptionsSchema {
        self.schema
    }
}

/// Reusable normalizers
pub mod normalize {
    use serde_json::Value;

    use crate::core::models::PathPattern;

    /// Turn a single string into a one-element list and require list items to be strings
    pub fn string_list(value: Value) -> Result<Value, String> {
        let items = match value {
            Value::String(s) => vec![Value::String(s)],
            Value::Array(items) => items,
            other => return Err(format!("expected a string or a list of strings, got {other}")),
        };
        if let Some(bad) = items.iter().find(|item| !item.is_string()) {
            return Err(format!("expected a list of strings, found {bad}"));
        }
        Ok(Value::Array(items))
    }

    /// Like [`string_list`], additionally requiring every item to be a valid path pattern
    pub fn pattern_list(value: Value) -> Result<Value, String> {
        let value = string_list(value)?;
        if let Value::Array(items) = &value {
            for pattern in items.iter().filter_map(Value::as_str) {
                PathPattern::parse(pattern).map_err(|e| e.to_string())?;
            }
        }
        Ok(value)
    }
}
