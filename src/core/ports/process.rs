//! Process execution port
//!
//! Tasks never spawn processes directly; they describe a [`CommandLine`] and
//! hand it to a [`ProcessRunner`].

use std::fmt::{self, Debug};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// A program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Program name or path
    pub program: String,
    /// Arguments
    pub args: Vec<String>,
    /// Working directory, defaults to the runner's
    pub cwd: Option<PathBuf>,
}

impl CommandLine {
    /// Start a command line
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Append one argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Program followed by arguments
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        std::iter::once(self.program.clone()).chain(self.args.iter().cloned()).collect()
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_vec().join(" "))
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the process exited with code 0
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    /// Combined output, stdout first, trimmed
    #[must_use]
    pub fn formatted(&self) -> String {
        [self.stdout.trim_end(), self.stderr.trim_end()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Errors raised while running a process
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The program could not be located
    #[error("executable \"{0}\" could not be found")]
    ExecutableNotFound(String),

    /// The process could not be started
    #[error("failed to start {command}: {source}")]
    Spawn {
        /// Rendered command
        command: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The process exceeded its time budget and was killed
    #[error("{command} timed out after {timeout:?}")]
    Timeout {
        /// Rendered command
        command: String,
        /// Time budget
        timeout: Duration,
    },

    /// Waiting for the process failed
    #[error("failed waiting for {command}: {source}")]
    Wait {
        /// Rendered command
        command: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Runs external programs
pub trait ProcessRunner: Send + Sync + Debug {
    /// Run a command to completion and capture its output
    ///
    /// A non-zero exit is not an error; it is reported through [`ProcessOutput::code`].
    fn run(&self, command: &CommandLine) -> Result<ProcessOutput, ProcessError>;

    /// Locate an executable, looking in the configured bin directory first
    fn locate(&self, program: &str) -> Result<PathBuf, ProcessError>;
}
