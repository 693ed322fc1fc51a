//! taskhook - Run code quality tasks from git hooks
//!
//! Loads the tasks declared in `taskhook.toml`, runs the ones that apply to
//! the current context (manual run, pre-commit, commit-msg) and reports
//! the aggregated result through the process exit code.

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

mod cli;

use std::process::ExitCode;

use colored::Colorize;
use taskhook::adapters::toml::ConfigError;
use taskhook::core::models::{EXIT_CONFIG_ERROR, EXIT_TASK_FAILURE, SchemaError};
use taskhook::core::services::ResolveError;

/// Main entry point for the taskhook CLI
fn main() -> ExitCode {
    match cli::run() {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::from(exit_code_for(&err))
        },
    }
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    let configuration = err
        .chain()
        .any(|cause| cause.is::<ResolveError>() || cause.is::<ConfigError>() || cause.is::<SchemaError>());
    if configuration { EXIT_CONFIG_ERROR } else { EXIT_TASK_FAILURE }
}
