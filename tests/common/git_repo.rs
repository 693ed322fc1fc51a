//! Temporary git repository helper for integration tests

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// A git repository in a temporary directory, removed on drop
pub struct TempGitRepo {
    dir: TempDir,
}

impl TempGitRepo {
    /// Initialise an empty repository with a committer identity
    pub fn new() -> Self {
        let repo = Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        };
        repo.git(&["init", "--quiet"]);
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo
    }

    /// Repository root
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file, creating parent directories
    pub fn write_file(&self, name: &str, content: &str) {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Read a file relative to the root
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.path().join(name)).expect("Failed to read file")
    }

    /// `git add <name>`
    pub fn stage(&self, name: &str) {
        self.git(&["add", name]);
    }

    /// `git commit -m <message>`, returning the output so hook failures can be inspected
    pub fn commit(&self, message: &str) -> Output {
        self.git(&["commit", "-m", message])
    }

    /// Run any git command in the repository
    pub fn git(&self, args: &[&str]) -> Output {
        Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()
            .expect("Failed to run git")
    }
}

impl Default for TempGitRepo {
    fn default() -> Self {
        Self::new()
    }
}
