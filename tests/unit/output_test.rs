//! Tests for report rendering

use taskhook::core::models::{
    Context, ContextKind, FilesCollection, FixSuggestion, RunResult, Task, TaskConfig, TaskResult,
};
use taskhook::output::{OptionInfo, RunReport, TaskInfo, TaskListReport};
use taskhook::tasks::FileSize;

fn fix() -> FixSuggestion {
    FixSuggestion {
        task: "lint".to_string(),
        description: "Run eslint with its fix arguments".to_string(),
        command: vec!["eslint".to_string(), "--fix".to_string(), "app.js".to_string()],
    }
}

fn run() -> RunResult {
    let context = Context::pre_commit(FilesCollection::default());
    RunResult::new(
        vec![
            TaskResult::fixable(&TaskConfig::empty("lint"), &context, "2 problems", fix()),
            TaskResult::skipped(&TaskConfig::empty("phpunit"), &context),
        ],
        true,
    )
}

#[test]
fn test_human_report_mentions_fixes_and_abort() {
    colored::control::set_override(false);
    let text = RunReport::new(ContextKind::PreCommit, &run()).format_human();

    assert!(text.contains("Running tasks (git-pre-commit)"));
    assert!(text.contains("[FIX ] lint"));
    assert!(text.contains("[SKIP] phpunit"));
    assert!(text.contains("0 passed, 1 failed, 1 skipped, 0 warning(s)"));
    assert!(text.contains("Stopped after the first failure."));
    assert!(text.contains("lint: eslint --fix app.js"));
    assert!(text.contains("Some tasks failed."));
}

#[test]
fn test_empty_run() {
    let text = RunReport::new(ContextKind::Run, &RunResult::default()).format_human();
    assert_eq!(text, "No tasks to run.\n");
}

#[test]
fn test_json_report() {
    let report = RunReport::new(ContextKind::PreCommit, &run());
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["context"], "git-pre-commit");
    assert_eq!(json["aborted"], true);
    assert_eq!(json["counts"]["failed"], 1);
    assert_eq!(json["results"][0]["status"], "failed_fixable");
    assert_eq!(json["results"][0]["fix"]["command"][1], "--fix");
    assert_eq!(json["fix_suggestions"][0]["task"], "lint");
    assert!(chrono::DateTime::parse_from_rfc3339(json["finished_at"].as_str().unwrap()).is_ok());
}

#[test]
fn test_task_list_report() {
    colored::control::set_override(false);
    let report = TaskListReport {
        tasks: vec![TaskInfo {
            name: "big_files".to_string(),
            implementation: "file_size".to_string(),
            priority: 5,
            blocking: false,
            options: OptionInfo::from_schema(&FileSize::configurable_options()),
        }],
    };

    let text = report.format_human();
    assert!(text.contains("big_files (file_size) priority 5, non-blocking"));
    assert!(text.contains("max_size <string|int> default \"10M\""));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["tasks"][0]["options"][0]["name"], "max_size");
    assert_eq!(json["tasks"][0]["options"][0]["required"], false);
}
