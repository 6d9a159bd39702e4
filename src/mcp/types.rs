//! Request and response types for MCP tools.

use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::IterationSummary;

// ============================================================
// Request Types
// ============================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct StartNewIterationRequest {
    #[schemars(description = "Semantic version of the new iteration, e.g. '1.0.0' or '2.1.0-beta.1'")]
    pub version: String,
    #[schemars(description = "Product requirements document describing what this iteration delivers")]
    pub prd: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CompleteIterationRequest {
    #[schemars(description = "Version of the iteration to complete")]
    pub version: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DecomposeGoalRequest {
    #[schemars(
        description = "Id of the goal to decompose. An unknown id creates the goal, described by the iteration's PRD"
    )]
    pub goal_id: String,
    #[schemars(description = "Requirements to add to the goal, in order")]
    pub requirements: Vec<RequirementItem>,
}

/// A requirement to add, as provided by the caller.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RequirementItem {
    #[schemars(description = "Short name of the capability")]
    pub title: String,
    #[schemars(description = "What the capability does and how it is verified")]
    pub description: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GenerateTasksRequest {
    #[schemars(description = "Id of the requirement the tasks implement")]
    pub requirement_id: String,
    #[schemars(description = "Tasks to add to the requirement, in order")]
    pub tasks: Vec<TaskItem>,
}

/// A task to add, as provided by the caller.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TaskItem {
    #[schemars(description = "Short title of the task")]
    pub title: String,
    #[schemars(description = "Concrete description of the work, including acceptance criteria")]
    pub description: String,
    #[schemars(description = "Estimated complexity: 'low', 'medium', or 'high'")]
    pub complexity: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateTaskStatusRequest {
    #[schemars(description = "Id of the task to update")]
    pub task_id: String,
    #[schemars(description = "New status: 'todo' or 'done'")]
    pub status: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateReportRequest {
    #[schemars(description = "Markdown content to write to the development report")]
    pub content: String,
    #[schemars(
        description = "'append' (default) adds a timestamped entry; 'overwrite' replaces the whole report"
    )]
    #[serde(default = "default_mode")]
    pub mode: String,
}

fn default_mode() -> String {
    "append".to_string()
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetGuidanceRequest {
    #[schemars(
        description = "Workflow phase: 'planning', 'decomposition', 'task_generation', or 'reporting'"
    )]
    pub phase: String,
}

// ============================================================
// Response Types
// ============================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct IterationListResponse {
    /// Iterations ordered newest version first
    pub iterations: Vec<IterationSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DecomposeGoalResponse {
    pub goal_id: String,
    pub requirements_added: usize,
}
