//! Domain models for devplan.
//!
//! # Core Concepts
//!
//! An [`Iteration`] is one development cycle identified by a semantic version.
//! It owns a tree of work:
//!
//! - [`Goal`]: top-level objective within the iteration.
//! - [`Requirement`]: a testable capability a goal is decomposed into.
//! - [`Task`]: an executable unit of work under a requirement.
//!
//! Ids are unique within an iteration across the whole tree. Lookups scan the
//! tree in order and the first match wins.
//!
//! ## Bookkeeping Records
//!
//! - [`ActivePointer`]: which iteration mutations target, if any.
//! - [`IndexEntry`]: denormalized per-version status cache. Never authoritative.

mod context;
mod goal;
mod iteration;
mod phase;
mod report;
mod task;

pub use context::*;
pub use goal::*;
pub use iteration::*;
pub use phase::*;
pub use report::*;
pub use task::*;

/// Error returned when parsing one of the string-valued enums fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} '{value}', expected one of: {expected}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected,
        }
    }
}
