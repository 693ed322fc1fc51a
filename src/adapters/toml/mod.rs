//! TOML configuration
//!
//! Discovers and loads `taskhook.toml`.
//!
//! - [`parser`] - Read and deserialize configuration files
//! - [`env`] - `%env()%` placeholder substitution

pub mod env;
pub mod parser;

use std::path::PathBuf;

use thiserror::Error;

pub use parser::{
    CONFIG_FILE_NAMES, ConfigFile, Environment, FixerConfig, Settings, TestSuite, find_config_file, load_file,
    parse_config, parse_config_with,
};

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found
    #[error("no taskhook.toml found in {0} or its parents")]
    NotFound(PathBuf),

    /// The file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML
    #[error("invalid TOML: {0}")]
    Parse(String),

    /// The structure does not match the expected layout
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// A placeholder names an undefined variable
    #[error("environment variable \"{0}\" is not defined")]
    MissingVariable(String),

    /// A placeholder's value cannot be converted to the requested type
    #[error("environment variable \"{name}\" cannot be read as {kind}: \"{value}\"")]
    InvalidVariable {
        /// Variable name
        name: String,
        /// Requested type
        kind: String,
        /// Raw value
        value: String,
    },

    /// A requested test suite is not configured
    #[error("unknown testsuite \"{0}\"")]
    UnknownTestSuite(String),
}
