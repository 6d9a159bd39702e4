use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ParseEnumError;

/// An executable unit of work under a requirement.
///
/// `completed_at` is set when the task moves into `Done` and cleared when it
/// moves back to `Todo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub complexity: Complexity,
    pub status: TaskStatus,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(id: String, input: TaskInput) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            complexity: input.complexity,
            status: TaskStatus::Todo,
            completed_at: None,
        }
    }

    /// Move the task to `status`, returning the previous status.
    ///
    /// Entering `Done` from any other state stamps `completed_at` with `now`;
    /// re-marking a done task leaves the existing stamp alone. `Todo` clears it.
    pub fn transition(&mut self, status: TaskStatus, now: DateTime<Utc>) -> TaskStatus {
        let old = self.status;
        self.status = status;
        match status {
            TaskStatus::Done if old != TaskStatus::Done => self.completed_at = Some(now),
            TaskStatus::Todo => self.completed_at = None,
            TaskStatus::Done => {}
        }
        old
    }
}

/// The execution status of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Done => "done",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(Self::Todo),
            "done" => Ok(Self::Done),
            _ => Err(ParseEnumError::new("task status", s, "todo, done")),
        }
    }
}

/// Rough effort rating for a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for Complexity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseEnumError::new("complexity", s, "low, medium, high")),
        }
    }
}

/// Input for adding a task to a requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInput {
    pub title: String,
    pub description: String,
    pub complexity: Complexity,
}

/// Result of changing a task's status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatusChange {
    pub task_id: String,
    pub title: String,
    pub old_status: TaskStatus,
    pub new_status: TaskStatus,
    pub completed_at: Option<DateTime<Utc>>,
}
