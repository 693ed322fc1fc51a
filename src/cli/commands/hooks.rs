//! Entry points invoked by the installed git hooks

use std::fs;
use std::path::Path;

use anyhow::Context as _;
use taskhook::core::models::Context;
use taskhook::output::OutputMode;

use super::session::Session;

const PRE_COMMIT_SUITE: &str = "git_pre_commit";
const COMMIT_MSG_SUITE: &str = "git_commit_msg";

/// Run tasks against the staged files
pub fn git_pre_commit(config: Option<&Path>, fix: bool, mode: OutputMode) -> anyhow::Result<u8> {
    let session = Session::open(config)?;
    let tasks = session.load_selected(session.optional_suite(PRE_COMMIT_SUITE).as_deref())?;
    let context = Context::pre_commit(session.staged_files()?);

    Ok(session.execute(&tasks, &context, fix, mode))
}

/// Run tasks against the message git is about to commit
pub fn git_commit_msg(config: Option<&Path>, commit_msg_file: &Path, mode: OutputMode) -> anyhow::Result<u8> {
    let message = fs::read_to_string(commit_msg_file)
        .with_context(|| format!("failed to read commit message from {}", commit_msg_file.display()))?;

    let session = Session::open(config)?;
    let tasks = session.load_selected(session.optional_suite(COMMIT_MSG_SUITE).as_deref())?;
    let context = Context::commit_msg(session.staged_files()?, message);

    Ok(session.execute(&tasks, &context, false, mode))
}
