//! Tests for the built-in tasks

use std::sync::Arc;

use serde_json::json;
use taskhook::core::models::{
    Context, DeclarationTable, FilesCollection, SchemaError, Task, TaskDeclaration, TaskStatus,
};
use taskhook::core::services::{ResolveError, TaskConfigResolver, TaskRegistry, configure, execute};
use taskhook::tasks::{BranchName, CommitMessage, ExternalCommand, FileSize, Shell};

use crate::common::{MockProcessRunner, MockVersionControl, TestRepo, options};

fn configured(prototype: &dyn Task, id: &str, raw: serde_json::Value) -> Result<Box<dyn Task>, ResolveError> {
    let mut table = DeclarationTable::new();
    table.insert(id.to_string(), TaskDeclaration::new(id, options(raw)));
    let resolver = TaskConfigResolver::new(Arc::new(TaskRegistry::with_builtin_tasks()), table);
    configure(prototype, &resolver, id)
}

fn files(paths: &[&str]) -> FilesCollection {
    FilesCollection::from(paths.iter().map(ToString::to_string).collect::<Vec<_>>())
}

// =============================================================================
// shell
// =============================================================================

#[test]
fn test_shell_reports_failing_script_output() {
    let repo = TestRepo::new();
    let process = Arc::new(MockProcessRunner::new().with_output(1, "", "phpunit: 2 tests failed"));
    let shell = Shell::new(process.clone(), repo.path().to_path_buf());
    let task = configured(&shell, "shell", json!({"scripts": ["phpunit"], "triggered_by": ["php"]})).unwrap();

    let result = execute(task.as_ref(), &Context::run(files(&["hello.php"])));
    assert_eq!(
        result.status,
        TaskStatus::Failed {
            message: "phpunit: 2 tests failed".to_string()
        }
    );

    let commands = process.commands();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].to_vec(), vec!["sh", "phpunit"]);
}

#[test]
fn test_shell_passes_when_script_succeeds() {
    let repo = TestRepo::new();
    let process = Arc::new(MockProcessRunner::new().with_output(0, "OK (3 tests)", ""));
    let shell = Shell::new(process, repo.path().to_path_buf());
    let task = configured(&shell, "shell", json!({"scripts": ["phpunit"], "triggered_by": ["php"]})).unwrap();

    let result = execute(task.as_ref(), &Context::run(files(&["hello.php"])));
    assert_eq!(result.status, TaskStatus::Passed);
}

#[test]
fn test_shell_skips_without_triggering_files() {
    let repo = TestRepo::new();
    let process = Arc::new(MockProcessRunner::new());
    let shell = Shell::new(process.clone(), repo.path().to_path_buf());
    let task = configured(&shell, "shell", json!({"scripts": ["phpunit"], "triggered_by": ["php"]})).unwrap();

    let result = execute(task.as_ref(), &Context::pre_commit(files(&["notes.txt"])));
    assert_eq!(result.status, TaskStatus::Skipped);
    assert!(process.commands().is_empty());
}

#[test]
fn test_shell_runs_every_script_and_joins_failures() {
    let repo = TestRepo::new();
    let process = Arc::new(
        MockProcessRunner::new()
            .with_output(1, "first broke", "")
            .with_output(0, "", "")
            .with_output(2, "", "third broke"),
    );
    let shell = Shell::new(process.clone(), repo.path().to_path_buf());
    let task = configured(&shell, "shell", json!({"scripts": ["a.sh", ["b.sh", "--fast"], "c.sh"]})).unwrap();

    let result = execute(task.as_ref(), &Context::run(files(&["index.php"])));
    assert_eq!(result.message(), Some("first broke\nthird broke"));
    assert_eq!(process.commands()[1].to_vec(), vec!["sh", "b.sh", "--fast"]);
}

#[test]
fn test_shell_rejects_malformed_scripts() {
    let shell = Shell::new(Arc::new(MockProcessRunner::new()), TestRepo::new().path().to_path_buf());
    let err = configured(&shell, "shell", json!({"scripts": [42]})).unwrap_err();
    assert!(matches!(err, ResolveError::InvalidOptions { .. }));
}

// =============================================================================
// command
// =============================================================================

#[test]
fn test_command_passes_filenames_and_offers_fix() {
    let repo = TestRepo::new();
    let process = Arc::new(MockProcessRunner::new().with_output(1, "", ""));
    let command = ExternalCommand::new(process.clone(), repo.path().to_path_buf());
    let task = configured(
        &command,
        "command",
        json!({"command": "eslint", "args": ["--quiet"], "fix_args": ["--fix"], "triggered_by": "js"}),
    )
    .unwrap();

    let result = execute(task.as_ref(), &Context::pre_commit(files(&["app.js", "README.md"])));
    assert_eq!(process.commands()[0].to_vec(), vec!["eslint", "--quiet", "app.js"]);
    assert_eq!(result.message(), Some("eslint exited with code 1"));
    let fix = result.fix().unwrap();
    assert_eq!(fix.command, vec!["eslint", "--fix", "app.js"]);
    assert!(result.is_failure());
}

#[test]
fn test_command_requires_a_command() {
    let command = ExternalCommand::new(Arc::new(MockProcessRunner::new()), TestRepo::new().path().to_path_buf());
    let err = configured(&command, "command", json!({"args": []})).unwrap_err();
    assert!(matches!(
        err,
        ResolveError::InvalidOptions {
            source: SchemaError::MissingRequired(_),
            ..
        }
    ));
}

#[test]
fn test_command_missing_executable_fails_the_task() {
    let process = Arc::new(MockProcessRunner::new().without_program("phpstan"));
    let command = ExternalCommand::new(process, TestRepo::new().path().to_path_buf());
    let task = configured(&command, "command", json!({"command": "phpstan", "always_execute": true})).unwrap();

    let result = execute(task.as_ref(), &Context::run(FilesCollection::default()));
    assert!(result.message().unwrap().contains("could not be found"));
}

// =============================================================================
// file_size
// =============================================================================

#[test]
fn test_file_size_reports_large_files() {
    let repo = TestRepo::new();
    repo.add_file("small.txt", &[b'a'; 10]);
    repo.add_file("assets/big.bin", &[0; 2000]);
    let task = configured(&FileSize::new(repo.path().to_path_buf()), "file_size", json!({"max_size": "1K"})).unwrap();

    let result = execute(task.as_ref(), &Context::pre_commit(files(&["small.txt", "assets/big.bin", "gone.txt"])));
    assert_eq!(
        result.message(),
        Some("Large files detected:\n- assets/big.bin exceeded the maximum size of 1K.\n")
    );
}

#[test]
fn test_file_size_honours_ignore_patterns() {
    let repo = TestRepo::new();
    repo.add_file("assets/big.bin", &[0; 2000]);
    let task = configured(
        &FileSize::new(repo.path().to_path_buf()),
        "file_size",
        json!({"max_size": "1K", "ignore_patterns": ["assets/"]}),
    )
    .unwrap();

    let result = execute(task.as_ref(), &Context::run(files(&["assets/big.bin"])));
    assert_eq!(result.status, TaskStatus::Skipped);
}

#[test]
fn test_file_size_rejects_bad_limit() {
    let err = configured(&FileSize::new(TestRepo::new().path().to_path_buf()), "file_size", json!({"max_size": "ten"}))
        .unwrap_err();
    assert!(matches!(err, ResolveError::InvalidOptions { .. }));
}

// =============================================================================
// git_commit_message
// =============================================================================

fn commit_msg(message: &str) -> Context {
    Context::commit_msg(FilesCollection::default(), message)
}

#[test]
fn test_commit_message_only_runs_on_commit_msg() {
    let task = configured(&CommitMessage::new(), "git_commit_message", json!({})).unwrap();
    assert!(!task.can_run_in_context(&Context::run(FilesCollection::default())));
    assert!(task.can_run_in_context(&commit_msg("Fix it")));
}

#[test]
fn test_commit_message_accepts_conventional_message() {
    let task = configured(&CommitMessage::new(), "git_commit_message", json!({})).unwrap();
    let result = execute(task.as_ref(), &commit_msg("Add login form\n\nValidates input on submit.\n"));
    assert_eq!(result.status, TaskStatus::Passed);
}

#[test]
fn test_commit_message_lists_violations_and_original() {
    let task = configured(&CommitMessage::new(), "git_commit_message", json!({})).unwrap();
    let message = "lowercase subject.\nno blank line\n";
    let result = execute(task.as_ref(), &commit_msg(message));

    let text = result.message().unwrap();
    assert!(text.contains("Subject should start with a capital letter."));
    assert!(text.contains("Please omit trailing period from commit message subject."));
    assert!(text.contains("Subject should be one line and followed by a blank line."));
    assert!(text.ends_with(&format!("Original commit message:\n{message}")));
}

#[test]
fn test_commit_message_empty_and_merge() {
    let task = configured(&CommitMessage::new(), "git_commit_message", json!({})).unwrap();
    let result = execute(task.as_ref(), &commit_msg("# only a comment\n"));
    assert_eq!(result.message(), Some("Commit message should not be empty."));

    let result = execute(task.as_ref(), &commit_msg("Merge branch 'feature' into main\n"));
    assert_eq!(result.status, TaskStatus::Skipped);
}

#[test]
fn test_commit_message_matchers() {
    let task = configured(
        &CommitMessage::new(),
        "git_commit_message",
        json!({"matchers": {"Must reference ticket": "/JIRA-\\d+/"}}),
    )
    .unwrap();

    assert_eq!(execute(task.as_ref(), &commit_msg("Fix JIRA-12 crash")).status, TaskStatus::Passed);
    let result = execute(task.as_ref(), &commit_msg("Fix crash"));
    assert!(result.message().unwrap().contains("Rule not matched: \"Must reference ticket\""));
}

#[test]
fn test_commit_message_subject_width() {
    let task = configured(&CommitMessage::new(), "git_commit_message", json!({"max_subject_width": 10})).unwrap();
    let result = execute(task.as_ref(), &commit_msg("A subject that is far too long"));
    assert!(result.message().unwrap().contains("Please keep the subject <= 10 characters."));
}

// =============================================================================
// git_branch_name
// =============================================================================

fn branch_task(vcs: MockVersionControl, raw: serde_json::Value) -> Box<dyn Task> {
    configured(&BranchName::new(Arc::new(vcs)), "git_branch_name", raw).unwrap()
}

#[test]
fn test_branch_name_whitelist() {
    let raw = json!({"whitelist": ["feature/*", "/^JIRA-\\d+$/"]});

    let ok = branch_task(MockVersionControl::on_branch("feature/login"), raw.clone());
    assert_eq!(execute(ok.as_ref(), &Context::run(FilesCollection::default())).status, TaskStatus::Passed);

    let bad = branch_task(MockVersionControl::on_branch("hotfix"), raw);
    let result = execute(bad.as_ref(), &Context::run(FilesCollection::default()));
    assert_eq!(
        result.message(),
        Some("Whitelist rule not matched: feature/*\nWhitelist rule not matched: /^JIRA-\\d+$/")
    );
}

#[test]
fn test_branch_name_blacklist_wins() {
    let raw = json!({"whitelist": ["feature/*"], "blacklist": ["feature/wip*"]});
    let task = branch_task(MockVersionControl::on_branch("feature/wip-login"), raw);
    let result = execute(task.as_ref(), &Context::pre_commit(FilesCollection::default()));
    let text = result.message().unwrap();
    assert!(text.contains("Matched blacklist rule: feature/wip*"));
    assert!(text.contains("IGNORED due to presence in blacklist"));
}

#[test]
fn test_branch_name_detached_head() {
    let allowed = branch_task(MockVersionControl::detached(), json!({"whitelist": ["main"]}));
    assert_eq!(execute(allowed.as_ref(), &Context::run(FilesCollection::default())).status, TaskStatus::Passed);

    let denied = branch_task(MockVersionControl::detached(), json!({"allow_detached_head": false}));
    let result = execute(denied.as_ref(), &Context::run(FilesCollection::default()));
    assert_eq!(result.message(), Some("Branch naming convention task is not allowed on a detached HEAD."));
}
