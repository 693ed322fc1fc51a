//! Tests for taskhook.toml loading

use std::fs;
use std::sync::Arc;

use serde_json::json;
use serial_test::serial;
use taskhook::adapters::toml::{ConfigError, find_config_file, load_file, parse_config, parse_config_with};
use taskhook::core::services::{ResolveError, TaskLoader, TaskRegistry};
use tempfile::TempDir;

use crate::common::{MockProcessRunner, MockVersionControl, services};

const FULL_CONFIG: &str = r#"
[settings]
stop_on_failure = true
process_timeout = 0
bin_dir = "vendor/bin"

[settings.parallel]
enabled = true
max_workers = 4

[settings.fixer]
fix_by_default = true

[environment.variables]
SUBJECT_WIDTH = "50"

[testsuites.git_pre_commit]
tasks = ["lint"]

[tasks.lint]
command = "eslint"
args = ["--max-warnings=0"]

[tasks.lint.metadata]
task = "command"
priority = 100

[tasks.git_commit_message]
max_subject_width = "%env(int:SUBJECT_WIDTH)%"
"#;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn test_full_config() {
    let config = parse_config_with(FULL_CONFIG, no_env).unwrap();

    assert!(config.settings.stop_on_failure);
    assert_eq!(config.settings.process_timeout(), None);
    assert!(config.settings.parallel.enabled);
    assert_eq!(config.settings.parallel.max_workers, 4);
    assert!(config.settings.fixer.enabled);
    assert!(config.settings.fixer.fix_by_default);
    assert_eq!(config.testsuite("git_pre_commit").unwrap().tasks, vec!["lint"]);

    let names: Vec<_> = config.tasks.keys().cloned().collect();
    assert_eq!(names, vec!["lint", "git_commit_message"]);
    assert_eq!(config.tasks["git_commit_message"]["max_subject_width"], json!(50));
}

#[test]
fn test_defaults_for_empty_file() {
    let config = parse_config_with("", no_env).unwrap();
    assert!(!config.settings.stop_on_failure);
    assert_eq!(config.settings.process_timeout, 60);
    assert!(!config.settings.parallel.enabled);
    assert!(config.tasks.is_empty());
}

#[test]
fn test_config_variables_win_over_fallback() {
    let content = r#"
[environment.variables]
NAME = "from-config"

[tasks.shell]
scripts = ["%env(NAME)%", "run-%env(OTHER)%"]
"#;
    let config = parse_config_with(content, |name| Some(format!("fallback-{name}"))).unwrap();
    assert_eq!(config.tasks["shell"]["scripts"], json!(["from-config", "run-fallback-OTHER"]));
}

#[test]
fn test_unknown_variable_is_an_error() {
    let content = "[tasks.shell]\nscripts = [\"%env(MISSING)%\"]\n";
    assert!(matches!(
        parse_config_with(content, no_env),
        Err(ConfigError::MissingVariable(name)) if name == "MISSING"
    ));
}

#[test]
fn test_substituted_values_are_still_type_checked() {
    let content = r#"
[environment.variables]
FLAG = "yes"

[tasks.git_commit_message]
max_subject_width = "%env(bool:FLAG)%"
"#;
    let config = parse_config_with(content, no_env).unwrap();
    let dir = TempDir::new().unwrap();
    let services = services(Arc::new(MockProcessRunner::new()), MockVersionControl::default(), dir.path());

    let err = TaskLoader::load(Arc::new(TaskRegistry::with_builtin_tasks()), &services, &config.tasks).unwrap_err();
    assert!(matches!(err, ResolveError::InvalidOptions { ref task, .. } if task == "git_commit_message"));
}

#[test]
fn test_invalid_documents() {
    assert!(matches!(parse_config_with("[tasks", no_env), Err(ConfigError::Parse(_))));
    assert!(matches!(parse_config_with("[unknown]\n", no_env), Err(ConfigError::Invalid(_))));
    assert!(matches!(
        parse_config_with("[settings]\nretries = 3\n", no_env),
        Err(ConfigError::Invalid(_))
    ));
    let config = parse_config_with("", no_env).unwrap();
    assert!(matches!(config.testsuite("nope"), Err(ConfigError::UnknownTestSuite(_))));
}

#[test]
#[serial(env)]
fn test_process_environment_is_the_fallback() {
    // SAFETY: serialized with every other test touching the environment
    unsafe { std::env::set_var("TASKHOOK_TEST_MAX_SIZE", "5M") };
    let config = parse_config("[tasks.file_size]\nmax_size = \"%env(TASKHOOK_TEST_MAX_SIZE)%\"\n");
    unsafe { std::env::remove_var("TASKHOOK_TEST_MAX_SIZE") };

    assert_eq!(config.unwrap().tasks["file_size"]["max_size"], json!("5M"));
}

#[test]
fn test_find_config_file_walks_up_to_repo_root() {
    let dir = TempDir::new().unwrap();
    let repo = dir.path().join("repo");
    let nested = repo.join("src/deep");
    fs::create_dir_all(&nested).unwrap();
    fs::create_dir_all(repo.join(".git")).unwrap();

    assert_eq!(find_config_file(&nested), None);

    fs::write(dir.path().join("taskhook.toml"), "").unwrap();
    assert_eq!(find_config_file(&nested), None, "does not look above the repository");

    fs::write(repo.join(".taskhook.toml"), "").unwrap();
    assert_eq!(find_config_file(&nested), Some(repo.join(".taskhook.toml")));

    fs::write(repo.join("taskhook.toml"), "").unwrap();
    assert_eq!(find_config_file(&nested), Some(repo.join("taskhook.toml")));
}

#[test]
fn test_load_file_errors() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(load_file(&dir.path().join("missing.toml")), Err(ConfigError::Read { .. })));

    let path = dir.path().join("taskhook.toml");
    fs::write(&path, "[tasks.file_size]\nmax_size = \"1M\"\n").unwrap();
    assert!(load_file(&path).unwrap().tasks.contains_key("file_size"));
}
