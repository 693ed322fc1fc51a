//! Process execution adapter
//!
//! Implements `ProcessRunner` on top of `std::process`, with an optional
//! per-process timeout and a configurable bin directory searched before `PATH`.
//!
//! On unix every child leads its own process group, so a timeout kills
//! whatever the child started as well.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::core::ports::{CommandLine, ProcessError, ProcessOutput, ProcessRunner};

const POLL_INTERVAL: Duration = Duration::from_millis(40);

/// Runs commands as child processes of the current process
#[derive(Debug, Clone, Default)]
pub struct SystemProcessRunner {
    bin_dir: Option<PathBuf>,
    working_dir: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl SystemProcessRunner {
    /// Runner with no bin directory and no timeout
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Search this directory before `PATH`
    #[must_use]
    pub fn with_bin_dir(mut self, bin_dir: impl Into<PathBuf>) -> Self {
        self.bin_dir = Some(bin_dir.into());
        self
    }

    /// Default working directory of spawned processes
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Kill processes running longer than `timeout`
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn base_dir(&self) -> PathBuf {
        self.working_dir
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn wait(&self, mut child: Child, command: &CommandLine) -> Result<Option<i32>, ProcessError> {
        let Some(timeout) = self.timeout else {
            return child.wait().map(|status| status.code()).map_err(|source| ProcessError::Wait {
                command: command.to_string(),
                source,
            });
        };

        let deadline = Instant::now() + timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status.code()),
                Ok(None) if Instant::now() >= deadline => {
                    log::warn!("{command} exceeded {timeout:?}, killing it");
                    kill_process_group(&mut child);
                    return Err(ProcessError::Timeout {
                        command: command.to_string(),
                        timeout,
                    });
                },
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(source) => {
                    return Err(ProcessError::Wait {
                        command: command.to_string(),
                        source,
                    });
                },
            }
        }
    }
}

/// Kill the child and every process in its group, then reap the child
fn kill_process_group(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{Signal, kill};
        use nix::unistd::Pid;

        if let Ok(pid) = i32::try_from(child.id())
            && let Err(err) = kill(Pid::from_raw(-pid), Signal::SIGKILL)
        {
            log::debug!("Could not kill process group {pid}: {err}");
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}

fn drain<R: Read + Send + 'static>(stream: Option<R>) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut stream) = stream {
            let _ = stream.read_to_end(&mut buffer);
        }
        String::from_utf8_lossy(&buffer).into_owned()
    })
}

fn is_path_like(program: &str) -> bool {
    program.contains(['/', '\\'])
}

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, command: &CommandLine) -> Result<ProcessOutput, ProcessError> {
        let program = self.locate(&command.program)?;
        let cwd = command.cwd.clone().unwrap_or_else(|| self.base_dir());
        log::debug!("Running {command} in {}", cwd.display());

        let mut process = Command::new(&program);
        process
            .args(&command.args)
            .current_dir(&cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            process.process_group(0);
        }

        let mut child = process.spawn().map_err(|source| ProcessError::Spawn {
            command: command.to_string(),
            source,
        })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let code = self.wait(child, command);
        // Pipes close once the whole group is gone
        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();

        Ok(ProcessOutput {
            code: code?,
            stdout,
            stderr,
        })
    }

    fn locate(&self, program: &str) -> Result<PathBuf, ProcessError> {
        if is_path_like(program) {
            let path = Path::new(program);
            let path = if path.is_absolute() { path.to_path_buf() } else { self.base_dir().join(path) };
            return if path.is_file() {
                Ok(path)
            } else {
                Err(ProcessError::ExecutableNotFound(program.to_string()))
            };
        }

        let cwd = self.base_dir();
        if let Some(bin_dir) = &self.bin_dir {
            let bin_dir = if bin_dir.is_absolute() { bin_dir.clone() } else { cwd.join(bin_dir) };
            if let Ok(path) = which::which_in(program, Some(&bin_dir), &cwd) {
                return Ok(path);
            }
        }

        which::which(program).map_err(|_| ProcessError::ExecutableNotFound(program.to_string()))
    }
}
