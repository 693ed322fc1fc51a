//! Manual run over the whole repository

use std::path::Path;

use taskhook::core::models::Context;
use taskhook::output::OutputMode;

use super::session::Session;

/// Run the selected tasks (all by default) in the run context
pub fn run(
    config: Option<&Path>,
    tasks: &[String],
    testsuite: Option<&str>,
    fix: bool,
    mode: OutputMode,
) -> anyhow::Result<u8> {
    let session = Session::open(config)?;

    let selection = match testsuite {
        Some(suite) => Some(session.suite(suite)?),
        None if tasks.is_empty() => None,
        None => Some(tasks.to_vec()),
    };
    let tasks = session.load_selected(selection.as_deref())?;
    let context = Context::run(session.tracked_files()?);

    Ok(session.execute(&tasks, &context, fix, mode))
}
