//! Adapter implementations for port traits
//!
//! This module contains concrete implementations that handle I/O:
//!
//! - `toml/` - `taskhook.toml` discovery and parsing
//! - `git/` - Git operations (hooks, staged and tracked files)
//! - `process/` - Running external programs
//! - `file/` - Filesystem listing outside git

pub mod file;
pub mod git;
pub mod process;
pub mod toml;
