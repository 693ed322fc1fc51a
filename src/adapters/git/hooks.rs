//! Git hooks installation
//!
//! This module handles installation of git hooks for taskhook:
//! - pre-commit: Runs the configured tasks against staged files
//! - commit-msg: Runs the configured tasks against the commit message
//!
//! Hook content is wrapped in marker lines so it can be appended to an
//! existing hook and removed again without touching foreign content.

use std::fs;
use std::path::Path;

const SECTION_START: &str = "# >>> taskhook >>>";
const SECTION_END: &str = "# <<< taskhook <<<";

/// Hook file names managed by taskhook
pub const MANAGED_HOOKS: [&str; 2] = ["pre-commit", "commit-msg"];

fn section(body: &str) -> String {
    format!("{SECTION_START}\n{body}\n{SECTION_END}\n")
}

/// Install the pre-commit hook
///
/// # Errors
///
/// Returns an error if the hooks directory is missing or the hook cannot be written.
pub fn install_pre_commit(hooks_dir: &Path) -> anyhow::Result<()> {
    install_hook(hooks_dir, "pre-commit", "taskhook git-pre-commit || exit 1")
}

/// Install the commit-msg hook
///
/// # Errors
///
/// Returns an error if the hooks directory is missing or the hook cannot be written.
pub fn install_commit_msg(hooks_dir: &Path) -> anyhow::Result<()> {
    install_hook(hooks_dir, "commit-msg", r#"taskhook git-commit-msg "$1" || exit 1"#)
}

fn install_hook(hooks_dir: &Path, name: &str, command: &str) -> anyhow::Result<()> {
    if !hooks_dir.exists() {
        anyhow::bail!("Not a git repository ({} not found)", hooks_dir.display());
    }

    let hook_path = hooks_dir.join(name);
    let hook_section = section(command);

    if hook_path.exists() {
        let existing = fs::read_to_string(&hook_path)?;
        if existing.contains(SECTION_START) {
            log::debug!("{name} hook already installed");
            return Ok(());
        }
        // Append to existing hook
        let new_content = format!("{}\n\n{hook_section}", existing.trim_end());
        fs::write(&hook_path, new_content)?;
    } else {
        fs::write(&hook_path, format!("#!/bin/sh\n\n{hook_section}"))?;
    }
    log::info!("Installed {name} hook at {}", hook_path.display());

    // Make executable
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&hook_path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&hook_path, perms)?;
    }

    Ok(())
}

/// Strip taskhook sections from hook content
///
/// Returns `None` when nothing but the shebang would remain.
#[must_use]
pub fn remove_hook_sections(content: &str) -> Option<String> {
    let mut kept = Vec::new();
    let mut inside = false;
    for line in content.lines() {
        match line.trim() {
            SECTION_START => inside = true,
            SECTION_END => inside = false,
            _ if !inside => kept.push(line),
            _ => {},
        }
    }

    let remaining = kept.join("\n");
    let remaining = remaining.trim_end();
    let meaningful = remaining.lines().any(|l| {
        let l = l.trim();
        !l.is_empty() && !l.starts_with("#!")
    });
    meaningful.then(|| format!("{remaining}\n"))
}

/// Remove taskhook sections from every managed hook
///
/// Hooks that contain nothing else are deleted.
///
/// # Errors
///
/// Returns an error if a hook cannot be read, written or deleted.
pub fn remove_taskhook_hooks(hooks_dir: &Path) -> anyhow::Result<()> {
    for name in MANAGED_HOOKS {
        let hook_path = hooks_dir.join(name);
        if !hook_path.exists() {
            continue;
        }
        let existing = fs::read_to_string(&hook_path)?;
        if !existing.contains(SECTION_START) {
            continue;
        }
        match remove_hook_sections(&existing) {
            Some(rest) => fs::write(&hook_path, rest)?,
            None => fs::remove_file(&hook_path)?,
        }
        log::info!("Removed taskhook from {name} hook");
    }
    Ok(())
}
