//! Initialize taskhook in a repository

use std::fs;
use std::path::Path;

use taskhook::adapters::git::GitVersionControl;
use taskhook::adapters::toml::{CONFIG_FILE_NAMES, find_config_file};
use taskhook::core::models::EXIT_SUCCESS;
use taskhook::core::ports::VersionControl;
use taskhook::output::{OperationResult, OutputMode};

const STARTER_CONFIG: &str = r#"# taskhook configuration

[settings]
stop_on_failure = false
process_timeout = 60

# Run tasks on several threads:
# [settings.parallel]
# enabled = true
# max_workers = 4

[tasks.file_size]
max_size = "10M"

[tasks.git_commit_message]
max_subject_width = 72

# Any external tool can run as a task:
# [tasks.lint]
# command = "eslint"
# args = ["--max-warnings=0"]
# fix_args = ["--fix"]
# triggered_by = ["js", "ts"]
#
# [tasks.lint.metadata]
# task = "command"
# priority = 100
"#;

/// Install the hooks and write a starter configuration if none exists
pub fn init(force: bool, config: Option<&Path>, mode: OutputMode) -> anyhow::Result<u8> {
    let vcs = GitVersionControl::current_dir()?;
    let root = vcs.repo_root()?;

    vcs.install_hooks(force)?;
    let mut message = String::from("Installed pre-commit and commit-msg hooks");

    let existing = config.map(Path::to_path_buf).or_else(|| find_config_file(&root));
    if existing.is_none() {
        let path = root.join(CONFIG_FILE_NAMES[0]);
        fs::write(&path, STARTER_CONFIG)?;
        log::info!("Wrote {}", path.display());
        message.push_str(&format!("\nCreated {}", CONFIG_FILE_NAMES[0]));
    }

    OperationResult {
        success: true,
        message,
    }
    .render(mode);
    Ok(EXIT_SUCCESS)
}
