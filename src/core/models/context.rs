//! Run contexts
//!
//! A context describes why tasks are running (manual run, pre-commit hook,
//! commit-msg hook) and carries the files under consideration.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::files::FilesCollection;

/// The kind of event that triggered a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextKind {
    /// Manual `taskhook run`
    Run,
    /// Git pre-commit hook
    #[serde(rename = "git-pre-commit")]
    PreCommit,
    /// Git commit-msg hook
    #[serde(rename = "git-commit-msg")]
    CommitMsg,
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Run => "run",
            Self::PreCommit => "git-pre-commit",
            Self::CommitMsg => "git-commit-msg",
        };
        f.write_str(name)
    }
}

/// Manual run over the whole repository
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunContext {
    /// Tracked files
    pub files: FilesCollection,
}

/// Pre-commit run over staged files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitPreCommitContext {
    /// Staged files
    pub files: FilesCollection,
}

/// Commit-msg run over the message being committed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitCommitMsgContext {
    /// Staged files
    pub files: FilesCollection,
    /// Raw commit message, comments included
    pub message: String,
}

/// The context tasks run in
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Context {
    /// See [`RunContext`]
    Run(RunContext),
    /// See [`GitPreCommitContext`]
    PreCommit(GitPreCommitContext),
    /// See [`GitCommitMsgContext`]
    CommitMsg(GitCommitMsgContext),
}

impl Context {
    /// Manual run context
    #[must_use]
    pub const fn run(files: FilesCollection) -> Self {
        Self::Run(RunContext { files })
    }

    /// Pre-commit context
    #[must_use]
    pub const fn pre_commit(files: FilesCollection) -> Self {
        Self::PreCommit(GitPreCommitContext { files })
    }

    /// Commit-msg context
    #[must_use]
    pub fn commit_msg(files: FilesCollection, message: impl Into<String>) -> Self {
        Self::CommitMsg(GitCommitMsgContext {
            files,
            message: message.into(),
        })
    }

    /// Kind of this context
    #[must_use]
    pub const fn kind(&self) -> ContextKind {
        match self {
            Self::Run(_) => ContextKind::Run,
            Self::PreCommit(_) => ContextKind::PreCommit,
            Self::CommitMsg(_) => ContextKind::CommitMsg,
        }
    }

    /// Files under consideration
    #[must_use]
    pub const fn files(&self) -> &FilesCollection {
        match self {
            Self::Run(ctx) => &ctx.files,
            Self::PreCommit(ctx) => &ctx.files,
            Self::CommitMsg(ctx) => &ctx.files,
        }
    }

    /// Commit message, only present in the commit-msg context
    #[must_use]
    pub fn commit_message(&self) -> Option<&str> {
        match self {
            Self::CommitMsg(ctx) => Some(&ctx.message),
            _ => None,
        }
    }
}
