//! Shared plumbing for the commands that run tasks
//!
//! Loads the configuration, wires the adapters into [`TaskServices`], builds
//! the configured tasks and renders the run.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use taskhook::adapters::file::list_files;
use taskhook::adapters::git::GitVersionControl;
use taskhook::adapters::process::SystemProcessRunner;
use taskhook::adapters::toml::{ConfigError, ConfigFile, find_config_file, load_file};
use taskhook::core::models::{Context, FilesCollection, RunResult, Task};
use taskhook::core::ports::{CommandLine, ProcessRunner, VersionControl};
use taskhook::core::services::{LoadedTasks, TaskLoader, TaskRegistry, TaskRunner, TaskServices};
use taskhook::output::{OutputMode, RunReport};

/// Configuration and services for one invocation
#[derive(Debug)]
pub struct Session {
    pub config: ConfigFile,
    registry: Arc<TaskRegistry>,
    services: TaskServices,
}

impl Session {
    /// Load the configuration and set up the adapters
    pub fn open(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        let config_path = match config_path {
            Some(path) => cwd.join(path),
            None => find_config_file(&cwd).ok_or_else(|| ConfigError::NotFound(cwd.clone()))?,
        };
        let config = load_file(&config_path)?;
        log::debug!("Using configuration {}", config_path.display());

        let root = GitVersionControl::new(cwd.clone())
            .repo_root()
            .ok()
            .or_else(|| config_path.parent().map(Path::to_path_buf))
            .unwrap_or(cwd);
        log::debug!("Repository root: {}", root.display());

        let mut process = SystemProcessRunner::new()
            .with_working_dir(&root)
            .with_timeout(config.settings.process_timeout());
        if let Some(bin_dir) = &config.settings.bin_dir {
            process = process.with_bin_dir(root.join(bin_dir));
        }

        let services = TaskServices {
            process: Arc::new(process),
            vcs: Arc::new(GitVersionControl::new(root.clone())),
            root,
        };

        Ok(Self {
            config,
            registry: Arc::new(TaskRegistry::with_builtin_tasks()),
            services,
        })
    }

    /// Resolve and build every configured task
    pub fn load(&self) -> anyhow::Result<LoadedTasks> {
        Ok(TaskLoader::load(Arc::clone(&self.registry), &self.services, &self.config.tasks)?)
    }

    /// Build the selected tasks; no selection means all of them
    pub fn load_selected(&self, names: Option<&[String]>) -> anyhow::Result<Vec<Box<dyn Task>>> {
        Ok(self.load()?.select(names)?.into_tasks())
    }

    /// Task names of a testsuite, if it is configured
    pub fn optional_suite(&self, name: &str) -> Option<Vec<String>> {
        self.config.testsuites.get(name).map(|suite| suite.tasks.clone())
    }

    /// Task names of a testsuite that must exist
    pub fn suite(&self, name: &str) -> anyhow::Result<Vec<String>> {
        Ok(self.config.testsuite(name)?.tasks.clone())
    }

    /// Files tracked by git, or every non-hidden file outside a repository
    pub fn tracked_files(&self) -> anyhow::Result<FilesCollection> {
        let files = match self.services.vcs.tracked_files() {
            Ok(files) => files,
            Err(err) => {
                log::debug!("Not listing from git ({err}), walking {}", self.services.root.display());
                list_files(&self.services.root)?
            },
        };
        Ok(FilesCollection::from(files))
    }

    /// Files staged for the next commit
    pub fn staged_files(&self) -> anyhow::Result<FilesCollection> {
        Ok(FilesCollection::from(self.services.vcs.staged_files()?))
    }

    /// Run the tasks, render the report and apply fixes when asked to
    pub fn execute(
        &self,
        tasks: &[Box<dyn Task>],
        context: &Context,
        fix_requested: bool,
        mode: OutputMode,
    ) -> u8 {
        let runner = TaskRunner::new(self.config.settings.runner_config());
        let run = runner.run(tasks, context);

        RunReport::new(context.kind(), &run).render(mode);

        let fixer = self.config.settings.fixer;
        if fix_requested && !fixer.enabled {
            log::warn!("Fixes were requested but the fixer is disabled");
        } else if fixer.enabled && (fix_requested || fixer.fix_by_default) {
            self.apply_fixes(&run, mode);
        }

        run.exit_code()
    }

    fn apply_fixes(&self, run: &RunResult, mode: OutputMode) {
        for fix in run.fix_suggestions() {
            let Some((program, args)) = fix.command.split_first() else {
                continue;
            };
            let command = CommandLine::new(program.as_str())
                .args(args.iter().map(String::as_str))
                .current_dir(&self.services.root);

            let outcome = self
                .services
                .process
                .run(&command)
                .with_context(|| format!("failed to run fix for {}", fix.task));
            let message = match outcome {
                Ok(output) if output.success() => format!("Fixed {}: {}", fix.task, fix.command_line()),
                Ok(output) => format!("Fix for {} failed:\n{}", fix.task, output.formatted()),
                Err(err) => format!("{err:#}"),
            };
            log::info!("{message}");
            if mode == OutputMode::Human {
                println!("{message}");
            }
        }
    }
}
