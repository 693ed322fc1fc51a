//! Remove taskhook from a repository

use taskhook::adapters::git::GitVersionControl;
use taskhook::core::models::EXIT_SUCCESS;
use taskhook::core::ports::VersionControl;
use taskhook::output::{OperationResult, OutputMode};

/// Remove the taskhook sections from the git hooks
///
/// The configuration file is left in place.
pub fn deinit(mode: OutputMode) -> anyhow::Result<u8> {
    GitVersionControl::current_dir()?.remove_hooks()?;

    OperationResult {
        success: true,
        message: "Removed taskhook from the git hooks".to_string(),
    }
    .render(mode);
    Ok(EXIT_SUCCESS)
}
