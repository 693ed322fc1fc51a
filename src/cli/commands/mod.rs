//! Command implementations

mod deinit;
mod hooks;
mod init;
mod run;
mod session;
mod tasks;

pub use deinit::deinit;
pub use hooks::{git_commit_msg, git_pre_commit};
pub use init::init;
pub use run::run;
pub use tasks::tasks;
