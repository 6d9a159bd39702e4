use serde::{Deserialize, Serialize};

use super::task::Task;

/// Title given to goals created on the fly by decomposition.
pub const DEFAULT_GOAL_TITLE: &str = "Primary development goal";

/// A top-level objective within an iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

impl Goal {
    pub fn new(id: String, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            requirements: Vec::new(),
        }
    }
}

/// A testable capability that a goal is decomposed into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Requirement {
    pub fn new(id: String, input: RequirementInput) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            tasks: Vec::new(),
        }
    }
}

/// Input for adding a requirement to a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementInput {
    pub title: String,
    pub description: String,
}
