use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::goal::{Goal, Requirement};
use super::task::{Task, TaskStatus};
use super::ParseEnumError;

/// One development cycle, identified by a semantic version.
///
/// The iteration is the root of the goal → requirement → task tree and is
/// persisted as a single JSON document per version.
///
/// # Lifecycle
/// `Planning` → `InProgress` (first time tasks are generated) → `Completed`
/// (explicit completion only). Status never moves backward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Iteration {
    pub version: String,
    /// Product requirements document the iteration was started from.
    pub prd: String,
    pub status: IterationStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

impl Iteration {
    pub fn new(version: impl Into<String>, prd: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            version: version.into(),
            prd: prd.into(),
            status: IterationStatus::Planning,
            created_at: now,
            completed_at: None,
            goals: Vec::new(),
        }
    }

    pub fn find_goal_mut(&mut self, goal_id: &str) -> Option<&mut Goal> {
        self.goals.iter_mut().find(|g| g.id == goal_id)
    }

    pub fn find_requirement_mut(&mut self, requirement_id: &str) -> Option<&mut Requirement> {
        self.goals
            .iter_mut()
            .flat_map(|g| g.requirements.iter_mut())
            .find(|r| r.id == requirement_id)
    }

    pub fn find_task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.goals
            .iter_mut()
            .flat_map(|g| g.requirements.iter_mut())
            .flat_map(|r| r.tasks.iter_mut())
            .find(|t| t.id == task_id)
    }

    /// Walk the tree and count goals, requirements, tasks and completed tasks.
    pub fn counts(&self) -> TreeCounts {
        let mut counts = TreeCounts {
            goals: self.goals.len(),
            ..TreeCounts::default()
        };
        for goal in &self.goals {
            counts.requirements += goal.requirements.len();
            for req in &goal.requirements {
                counts.tasks += req.tasks.len();
                counts.completed_tasks += req
                    .tasks
                    .iter()
                    .filter(|t| t.status == TaskStatus::Done)
                    .count();
            }
        }
        counts
    }
}

/// Aggregate sizes of an iteration's tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeCounts {
    pub goals: usize,
    pub requirements: usize,
    pub tasks: usize,
    pub completed_tasks: usize,
}

impl TreeCounts {
    /// Completed share of tasks as a percentage, `None` when there are no tasks.
    pub fn progress_percent(&self) -> Option<f64> {
        if self.tasks == 0 {
            return None;
        }
        Some(self.completed_tasks as f64 / self.tasks as f64 * 100.0)
    }
}

/// The lifecycle status of an iteration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IterationStatus {
    Planning,
    InProgress,
    Completed,
}

impl IterationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for IterationStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planning" => Ok(Self::Planning),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseEnumError::new(
                "iteration status",
                s,
                "planning, in_progress, completed",
            )),
        }
    }
}

/// Listing row for one iteration, with counts computed from its tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationSummary {
    pub version: String,
    pub status: IterationStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub goals_count: usize,
    pub requirements_count: usize,
    pub tasks_count: usize,
    pub completed_tasks_count: usize,
}

impl From<&Iteration> for IterationSummary {
    fn from(iteration: &Iteration) -> Self {
        let counts = iteration.counts();
        Self {
            version: iteration.version.clone(),
            status: iteration.status,
            created_at: iteration.created_at,
            completed_at: iteration.completed_at,
            goals_count: counts.goals,
            requirements_count: counts.requirements,
            tasks_count: counts.tasks,
            completed_tasks_count: counts.completed_tasks,
        }
    }
}
