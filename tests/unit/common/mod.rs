//! Shared test fixtures and helpers
//!
//! Hand-written mocks of the task contract and the port traits, plus a
//! temporary directory fixture.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;
use taskhook::core::models::{
    Context, DeclarationTable, OptionSpec, Options, OptionsSchema, Task, TaskConfig, TaskDeclaration, TaskError,
    TaskResult,
};
use taskhook::core::ports::{CommandLine, ProcessError, ProcessOutput, ProcessRunner, VersionControl};
use taskhook::core::services::{TaskRegistry, TaskServices};
use tempfile::TempDir;

/// What a [`MockTask`] does when run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Pass,
    Fail,
    Error,
    Panic,
}

/// A task that records how often it ran
#[derive(Debug, Clone)]
pub struct MockTask {
    config: TaskConfig,
    runnable: bool,
    behavior: Behavior,
    calls: Arc<AtomicUsize>,
}

impl MockTask {
    pub fn new() -> Self {
        Self {
            config: TaskConfig::empty("mock"),
            runnable: true,
            behavior: Behavior::Pass,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn not_runnable(mut self) -> Self {
        self.runnable = false;
        self
    }

    pub fn behaving(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Shared call counter, survives `with_config`
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    /// A configured task named `name` with the given metadata
    pub fn configured(self, name: &str, metadata: serde_json::Value) -> Box<dyn Task> {
        let mut raw = Options::new();
        raw.insert("metadata".to_string(), metadata);
        let registry = Arc::new(mock_registry());
        let mut table = DeclarationTable::new();
        table.insert(name.to_string(), TaskDeclaration::new("mock", raw));
        let resolver = taskhook::core::services::TaskConfigResolver::new(registry, table);
        let config = resolver.resolve(name).expect("mock declaration resolves");
        self.with_config(config)
    }
}

impl Default for MockTask {
    fn default() -> Self {
        Self::new()
    }
}

impl Task for MockTask {
    fn configurable_options() -> OptionsSchema {
        OptionsSchema::builder()
            .option(OptionSpec::new("foo").with_default("bar"))
            .build()
    }

    fn config(&self) -> &TaskConfig {
        &self.config
    }

    fn with_config(&self, config: TaskConfig) -> Box<dyn Task> {
        Box::new(Self {
            config,
            ..self.clone()
        })
    }

    fn can_run_in_context(&self, _context: &Context) -> bool {
        self.runnable
    }

    fn run(&self, context: &Context) -> Result<TaskResult, TaskError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::Pass => Ok(TaskResult::passed(&self.config, context)),
            Behavior::Fail => Ok(TaskResult::failed(&self.config, context, "mock failure")),
            Behavior::Error => Err(TaskError::Misconfigured {
                task: self.config.name().to_string(),
                message: "broken".to_string(),
            }),
            Behavior::Panic => panic!("mock panic"),
        }
    }
}

/// Registry with [`MockTask`] registered as `mock`
pub fn mock_registry() -> TaskRegistry {
    let mut registry = TaskRegistry::new();
    registry.register("mock", 0, |_| MockTask::new());
    registry
}

/// Declaration table with one `mock` declaration per name
pub fn declarations(entries: &[(&str, serde_json::Value)]) -> DeclarationTable {
    entries
        .iter()
        .map(|(name, config)| {
            let config = config.as_object().cloned().unwrap_or_default();
            ((*name).to_string(), TaskDeclaration::new("mock", config))
        })
        .collect()
}

/// Convert a JSON object literal into an option table
pub fn options(value: serde_json::Value) -> Options {
    value.as_object().cloned().unwrap_or_default()
}

/// Process runner replaying canned outputs and recording commands
#[derive(Debug, Default)]
pub struct MockProcessRunner {
    outputs: Mutex<VecDeque<ProcessOutput>>,
    commands: Mutex<Vec<CommandLine>>,
    missing: Vec<String>,
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an output for the next `run`
    pub fn with_output(self, code: i32, stdout: &str, stderr: &str) -> Self {
        self.outputs.lock().unwrap().push_back(ProcessOutput {
            code: Some(code),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        });
        self
    }

    /// Make `locate` fail for `program`
    pub fn without_program(mut self, program: &str) -> Self {
        self.missing.push(program.to_string());
        self
    }

    /// Commands run so far
    pub fn commands(&self) -> Vec<CommandLine> {
        self.commands.lock().unwrap().clone()
    }
}

impl ProcessRunner for MockProcessRunner {
    fn run(&self, command: &CommandLine) -> Result<ProcessOutput, ProcessError> {
        self.commands.lock().unwrap().push(command.clone());
        Ok(self.outputs.lock().unwrap().pop_front().unwrap_or(ProcessOutput {
            code: Some(0),
            ..ProcessOutput::default()
        }))
    }

    fn locate(&self, program: &str) -> Result<PathBuf, ProcessError> {
        if self.missing.iter().any(|m| m == program) {
            Err(ProcessError::ExecutableNotFound(program.to_string()))
        } else {
            Ok(PathBuf::from(program))
        }
    }
}

/// Version control returning fixed answers
#[derive(Debug, Default)]
pub struct MockVersionControl {
    pub staged: Vec<String>,
    pub tracked: Vec<String>,
    pub branch: Option<String>,
}

impl MockVersionControl {
    pub fn on_branch(branch: &str) -> Self {
        Self {
            branch: Some(branch.to_string()),
            ..Self::default()
        }
    }

    pub fn detached() -> Self {
        Self::default()
    }
}

impl VersionControl for MockVersionControl {
    fn staged_files(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.staged.clone())
    }

    fn tracked_files(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.tracked.clone())
    }

    fn repo_root(&self) -> anyhow::Result<PathBuf> {
        Ok(PathBuf::from("/repo"))
    }

    fn current_branch(&self) -> anyhow::Result<Option<String>> {
        Ok(self.branch.clone())
    }

    fn install_hooks(&self, _force: bool) -> anyhow::Result<()> {
        Ok(())
    }

    fn remove_hooks(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Services backed by mocks
pub fn services(process: Arc<MockProcessRunner>, vcs: MockVersionControl, root: &Path) -> TaskServices {
    TaskServices {
        process,
        vcs: Arc::new(vcs),
        root: root.to_path_buf(),
    }
}

/// A temporary directory with helpers for writing files
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file, creating parent directories
    pub fn add_file(&self, path: &str, content: &[u8]) {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

/// `{"metadata": {...}}` shorthand
pub fn with_metadata(metadata: serde_json::Value) -> serde_json::Value {
    json!({ "metadata": metadata })
}
