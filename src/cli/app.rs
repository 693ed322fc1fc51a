//! CLI definitions and entry point

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::commands;
use taskhook::core::models::EXIT_SUCCESS;
use taskhook::output::OutputMode;

/// taskhook - Code quality tasks for git hooks
#[derive(Parser, Debug)]
#[command(
    name = "taskhook",
    version,
    about = "Code quality tasks for git hooks",
    long_about = "Run linters, test suites and commit checks from git hooks.\n\n\
                  Tasks are declared in taskhook.toml. Each hook runs the tasks\n\
                  that apply to it and blocks the commit when one fails."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file, discovered from the current directory when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install the git hooks in the current repository
    Init {
        /// Reinstall hooks and overwrite managed sections
        #[arg(short, long)]
        force: bool,
    },

    /// Remove the git hooks
    Deinit,

    /// Run tasks over every tracked file
    Run {
        /// Only run these tasks (comma separated)
        #[arg(long, value_delimiter = ',')]
        tasks: Vec<String>,

        /// Only run the tasks of this testsuite
        #[arg(long, conflicts_with = "tasks")]
        testsuite: Option<String>,

        /// Apply available fixes
        #[arg(long)]
        fix: bool,
    },

    /// Run tasks over staged files (used by pre-commit hook)
    #[command(hide = true)]
    GitPreCommit {
        /// Apply available fixes
        #[arg(long)]
        fix: bool,
    },

    /// Check the commit message (used by commit-msg hook)
    #[command(hide = true)]
    GitCommitMsg {
        /// Path to commit message file
        commit_msg_file: PathBuf,
    },

    /// List configured tasks and their options
    Tasks,

    /// Show version
    Version,
}

/// Run the CLI, returning the process exit code
pub fn run() -> anyhow::Result<u8> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };
    let config = cli.config.as_deref();

    match cli.command {
        Some(Command::Init { force }) => commands::init(force, config, output_mode),
        Some(Command::Deinit) => commands::deinit(output_mode),
        Some(Command::Run { tasks, testsuite, fix }) => {
            commands::run(config, &tasks, testsuite.as_deref(), fix, output_mode)
        },
        Some(Command::GitPreCommit { fix }) => commands::git_pre_commit(config, fix, output_mode),
        Some(Command::GitCommitMsg { commit_msg_file }) => {
            commands::git_commit_msg(config, &commit_msg_file, output_mode)
        },
        Some(Command::Tasks) => commands::tasks(config, output_mode),
        Some(Command::Version) => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": taskhook::VERSION
                    })
                );
            } else {
                println!("taskhook v{}", taskhook::VERSION);
            }
            Ok(EXIT_SUCCESS)
        },
        None => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": taskhook::VERSION,
                        "hint": "Use --help for usage"
                    })
                );
            } else {
                println!("taskhook v{}", taskhook::VERSION);
                println!("\nRun 'taskhook --help' for usage");
                println!("Run 'taskhook init' to get started");
            }
            Ok(EXIT_SUCCESS)
        },
    }
}
