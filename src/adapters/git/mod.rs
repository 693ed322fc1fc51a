//! Git adapter
//!
//! Implements [`VersionControl`] by shelling out to the `git` binary.
//!
//! - [`hooks`] - hook installation and removal
//! - [`staging`] - staged and tracked file listing

pub mod hooks;
pub mod staging;

use std::path::PathBuf;

use crate::core::ports::VersionControl;

pub use hooks::{install_commit_msg, install_pre_commit, remove_hook_sections, remove_taskhook_hooks};
use staging::git_stdout;

/// [`VersionControl`] backed by the repository containing `workdir`
#[derive(Debug, Clone)]
pub struct GitVersionControl {
    workdir: PathBuf,
}

impl GitVersionControl {
    /// Adapter for the repository containing `workdir`
    #[must_use]
    pub const fn new(workdir: PathBuf) -> Self {
        Self { workdir }
    }

    /// Adapter for the repository containing the current directory
    pub fn current_dir() -> anyhow::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// Directory git reads hooks from, honouring `core.hooksPath` and worktrees
    pub fn hooks_dir(&self) -> anyhow::Result<PathBuf> {
        let path = PathBuf::from(git_stdout(&self.workdir, &["rev-parse", "--git-path", "hooks"])?);
        Ok(if path.is_absolute() { path } else { self.workdir.join(path) })
    }
}

impl VersionControl for GitVersionControl {
    fn staged_files(&self) -> anyhow::Result<Vec<String>> {
        staging::staged_files(&self.workdir)
    }

    fn tracked_files(&self) -> anyhow::Result<Vec<String>> {
        staging::tracked_files(&self.workdir)
    }

    fn repo_root(&self) -> anyhow::Result<PathBuf> {
        git_stdout(&self.workdir, &["rev-parse", "--show-toplevel"]).map(PathBuf::from)
    }

    fn current_branch(&self) -> anyhow::Result<Option<String>> {
        // Empty output means a detached HEAD
        let branch = git_stdout(&self.workdir, &["branch", "--show-current"])?;
        Ok(Some(branch).filter(|b| !b.is_empty()))
    }

    fn install_hooks(&self, force: bool) -> anyhow::Result<()> {
        let hooks_dir = self.hooks_dir()?;
        if force {
            remove_taskhook_hooks(&hooks_dir)?;
        }
        install_pre_commit(&hooks_dir)?;
        install_commit_msg(&hooks_dir)
    }

    fn remove_hooks(&self) -> anyhow::Result<()> {
        remove_taskhook_hooks(&self.hooks_dir()?)
    }
}
