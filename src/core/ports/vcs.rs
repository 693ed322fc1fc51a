//! Version control system port
//!
//! Defines the interface for interacting with version control.

use std::fmt::Debug;
use std::path::PathBuf;

/// Version control system abstraction
///
/// Implementations handle interactions with git or other VCS systems.
pub trait VersionControl: Send + Sync + Debug {
    /// Get list of staged files (added, copied, modified or renamed)
    fn staged_files(&self) -> anyhow::Result<Vec<String>>;

    /// Get list of all tracked files
    fn tracked_files(&self) -> anyhow::Result<Vec<String>>;

    /// Get the repository root path
    fn repo_root(&self) -> anyhow::Result<PathBuf>;

    /// Get the current branch name, `None` on a detached HEAD
    fn current_branch(&self) -> anyhow::Result<Option<String>>;

    /// Install the pre-commit and commit-msg hooks
    fn install_hooks(&self, force: bool) -> anyhow::Result<()>;

    /// Remove the sections added by [`VersionControl::install_hooks`]
    fn remove_hooks(&self) -> anyhow::Result<()>;
}
