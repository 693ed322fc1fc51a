//! Common test utilities shared by the integration tests
//!
//! - `git_repo.rs` - Temporary git repository helper

pub mod git_repo;
