//! File-backed iteration planning for AI-assisted development.
//!
//! An iteration is a tree of goals, requirements and tasks stored as JSON under
//! `<project>/.cursor/devplan`. [`store::IterationStore`] owns those documents;
//! [`mcp`] and the `devplan` binary are thin surfaces over it.

pub mod config;
pub mod error;
pub mod guidance;
pub mod mcp;
pub mod models;
pub mod render;
pub mod store;
