//! Task configuration glue

use crate::core::models::Task;
use crate::core::services::resolver::{ResolveError, TaskConfigResolver};

/// Resolve `name` and return a configured copy of `task`
///
/// `task` itself is left unchanged.
pub fn configure(task: &dyn Task, resolver: &TaskConfigResolver, name: &str) -> Result<Box<dyn Task>, ResolveError> {
    let config = resolver.resolve(name)?;
    Ok(task.with_config(config))
}
