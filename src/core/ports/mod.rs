//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundaries between core logic and external
//! systems (processes, git). Implementations live in the `adapters` module.
//!
//! The core depends only on these traits, never on concrete implementations,
//! so tests can substitute mocks.

mod process;
mod vcs;

pub use process::{CommandLine, ProcessError, ProcessOutput, ProcessRunner};
pub use vcs::VersionControl;
