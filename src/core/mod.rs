//! Core domain logic for taskhook
//!
//! This module contains the task model and the resolution/execution pipeline.
//! All external interactions are abstracted through port traits.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (options schema, task configuration, contexts, results)
//! - `services/` - Resolution, configuration and run orchestration
//! - `ports/` - Trait definitions for external dependencies (processes, git)

pub mod models;
pub mod ports;
pub mod services;
