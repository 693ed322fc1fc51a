//! List configured tasks

use std::path::Path;

use taskhook::core::models::EXIT_SUCCESS;
use taskhook::output::{OptionInfo, OutputMode, TaskInfo, TaskListReport};

use super::session::Session;

/// Print every configured task with its resolved metadata and accepted options
pub fn tasks(config: Option<&Path>, mode: OutputMode) -> anyhow::Result<u8> {
    let session = Session::open(config)?;
    let loaded = session.load()?;
    let resolver = loaded.resolver();

    let tasks = loaded
        .tasks()
        .iter()
        .map(|task| {
            let config = task.config();
            let implementation = resolver
                .declaration(config.name())
                .map(|declaration| declaration.class.clone())
                .unwrap_or_default();
            let options = resolver
                .registry()
                .schema(&implementation)
                .map(|schema| OptionInfo::from_schema(&schema))
                .unwrap_or_default();
            TaskInfo {
                name: config.name().to_string(),
                implementation,
                priority: config.metadata().priority(),
                blocking: config.metadata().blocking(),
                options,
            }
        })
        .collect();

    TaskListReport { tasks }.render(mode);
    Ok(EXIT_SUCCESS)
}
