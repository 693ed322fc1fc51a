//! Task execution and result aggregation
//!
//! Tasks run in priority order (higher first, ties keep declaration order).
//! A task that returns an error or panics is recorded as failed and the sweep
//! continues with the remaining tasks.

use std::any::Any;
use std::cmp::Reverse;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use serde::{Deserialize, Serialize};

use crate::core::models::{Context, RunResult, Task, TaskResult};

/// Worker pool settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParallelConfig {
    /// Run tasks on several worker threads
    pub enabled: bool,
    /// Upper bound on worker threads
    pub max_workers: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_workers: 32,
        }
    }
}

/// Runner settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Stop scheduling tasks after the first blocking failure
    pub stop_on_failure: bool,
    /// Worker pool settings
    pub parallel: ParallelConfig,
}

/// Executes configured tasks against a context
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskRunner {
    config: RunnerConfig,
}

impl TaskRunner {
    /// Create a runner
    #[must_use]
    pub const fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Run every task and aggregate the results
    #[must_use]
    pub fn run(&self, tasks: &[Box<dyn Task>], context: &Context) -> RunResult {
        let ordered = order_by_priority(tasks);
        log::info!("Running {} task(s) in {} context", ordered.len(), context.kind());

        let parallel = self.config.parallel;
        if parallel.enabled && parallel.max_workers > 1 && ordered.len() > 1 {
            self.run_parallel(&ordered, context)
        } else {
            self.run_sequential(&ordered, context)
        }
    }

    fn run_sequential(&self, tasks: &[&dyn Task], context: &Context) -> RunResult {
        let mut results = Vec::with_capacity(tasks.len());
        for (index, task) in tasks.iter().enumerate() {
            let result = execute(*task, context);
            let failed = result.is_failure();
            results.push(result);

            if failed && self.config.stop_on_failure && index + 1 < tasks.len() {
                log::warn!("Stopping after {} failed, {} task(s) not run", task.config().name(), tasks.len() - index - 1);
                return RunResult::new(results, true);
            }
        }
        RunResult::new(results, false)
    }

    fn run_parallel(&self, tasks: &[&dyn Task], context: &Context) -> RunResult {
        let workers = self.config.parallel.max_workers.min(tasks.len());
        log::debug!("Using {workers} worker(s)");

        let queue = Mutex::new((0..tasks.len()).collect::<VecDeque<_>>());
        let stop = AtomicBool::new(false);
        let stop_on_failure = self.config.stop_on_failure;

        let mut indexed = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    scope.spawn(|| {
                        let mut local = Vec::new();
                        loop {
                            if stop.load(Ordering::SeqCst) {
                                break;
                            }
                            let job = queue.lock().ok().and_then(|mut q| q.pop_front());
                            let Some(index) = job else {
                                break;
                            };
                            let result = execute(tasks[index], context);
                            if stop_on_failure && result.is_failure() {
                                stop.store(true, Ordering::SeqCst);
                            }
                            local.push((index, result));
                        }
                        local
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| worker_results(handle.join()))
                .collect::<Vec<_>>()
        });

        indexed.sort_by_key(|(index, _)| *index);
        let aborted = indexed.len() < tasks.len();
        if aborted {
            log::warn!("Stopped after a failure, {} task(s) not run", tasks.len() - indexed.len());
        }
        RunResult::new(indexed.into_iter().map(|(_, result)| result).collect(), aborted)
    }
}

/// Stable sort by descending priority
#[must_use]
pub fn order_by_priority(tasks: &[Box<dyn Task>]) -> Vec<&dyn Task> {
    let mut ordered: Vec<&dyn Task> = tasks.iter().map(AsRef::as_ref).collect();
    ordered.sort_by_key(|task| Reverse(task.config().metadata().priority()));
    ordered
}

/// Run one task, turning errors and panics into failed results
#[must_use]
pub fn execute(task: &dyn Task, context: &Context) -> TaskResult {
    let config = task.config();

    if !task.can_run_in_context(context) {
        log::debug!("Skipping {}: not applicable in {} context", config.name(), context.kind());
        return TaskResult::skipped(config, context);
    }

    log::info!("Running {}", config.label());
    let result = match panic::catch_unwind(AssertUnwindSafe(|| task.run(context))) {
        Ok(Ok(result)) => result,
        Ok(Err(error)) => TaskResult::failed(config, context, error.to_string()),
        Err(payload) => TaskResult::failed(config, context, format!("task panicked: {}", panic_message(&*payload))),
    };

    if config.metadata().blocking() {
        result
    } else {
        if result.is_failure() {
            log::warn!("{} failed but is non-blocking", config.name());
        }
        result.into_non_blocking()
    }
}

/// Results of a finished worker; a worker that panicked contributes none
fn worker_results(joined: thread::Result<Vec<(usize, TaskResult)>>) -> Vec<(usize, TaskResult)> {
    joined.unwrap_or_else(|payload| {
        log::error!("Task worker panicked, its results are lost: {}", panic_message(&*payload));
        Vec::new()
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
