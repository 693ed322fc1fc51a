//! Staged and tracked file listing

use std::path::Path;
use std::process::Command;

/// Files added, copied, modified or renamed in the index
///
/// # Errors
///
/// Returns an error if git fails, e.g. outside a repository.
pub fn staged_files(workdir: &Path) -> anyhow::Result<Vec<String>> {
    Ok(lines(&git_stdout(workdir, &["diff", "--cached", "--name-only", "--diff-filter=ACMR"])?))
}

/// Every file in the index
///
/// # Errors
///
/// Returns an error if git fails, e.g. outside a repository.
pub fn tracked_files(workdir: &Path) -> anyhow::Result<Vec<String>> {
    Ok(lines(&git_stdout(workdir, &["ls-files"])?))
}

/// Run git in `workdir` and return its trimmed stdout
pub(super) fn git_stdout(workdir: &Path, args: &[&str]) -> anyhow::Result<String> {
    let output = Command::new("git").current_dir(workdir).args(args).output()?;
    if !output.status.success() {
        anyhow::bail!(
            "git {} failed: {}",
            args.first().copied().unwrap_or_default(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn lines(stdout: &str) -> Vec<String> {
    stdout.lines().filter(|line| !line.is_empty()).map(String::from).collect()
}
