//! MCP server exposing the iteration store as tools.

mod types;

use std::str::FromStr;
use std::sync::{Arc, Mutex};

pub use types::*;

use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::Serialize;

use crate::error::StoreError;
use crate::guidance;
use crate::models::*;
use crate::store::IterationStore;

#[derive(Clone)]
pub struct McpServer {
    store: Arc<Mutex<IterationStore>>,
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    pub fn new(store: IterationStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            tool_router: Self::tool_router(),
        }
    }

    /// Run `f` against the store, serializing calls within this process.
    fn with_store<T>(
        &self,
        f: impl FnOnce(&IterationStore) -> Result<T, StoreError>,
    ) -> Result<T, McpError> {
        let store = self
            .store
            .lock()
            .map_err(|_| McpError::internal_error("store lock poisoned", None))?;
        f(&store).map_err(Self::store_err)
    }

    fn store_err(e: StoreError) -> McpError {
        if e.is_caller_error() {
            McpError::invalid_params(e.to_string(), None)
        } else {
            McpError::internal_error(e.to_string(), None)
        }
    }

    fn parse<T>(s: &str) -> Result<T, McpError>
    where
        T: FromStr<Err = ParseEnumError>,
    {
        T::from_str(s).map_err(|e| McpError::invalid_params(e.to_string(), None))
    }

    fn json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    fn text(text: String) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    fn task_inputs(items: Vec<TaskItem>) -> Result<Vec<TaskInput>, McpError> {
        items
            .into_iter()
            .map(|item| -> Result<TaskInput, McpError> {
                Ok(TaskInput {
                    complexity: Self::parse(&item.complexity)?,
                    title: item.title,
                    description: item.description,
                })
            })
            .collect()
    }

    fn requirement_inputs(items: Vec<RequirementItem>) -> Vec<RequirementInput> {
        items
            .into_iter()
            .map(|item| RequirementInput {
                title: item.title,
                description: item.description,
            })
            .collect()
    }

    // ============================================================
    // Test helpers - expose tool logic for testing
    // ============================================================

    pub fn test_get_project_context(&self) -> Result<ProjectContext, McpError> {
        self.with_store(|s| s.project_context())
    }

    pub fn test_start_new_iteration(&self, version: &str, prd: &str) -> Result<String, McpError> {
        self.with_store(|s| s.create(version, prd))
    }

    pub fn test_list_iterations(&self) -> Result<IterationListResponse, McpError> {
        let iterations = self.with_store(|s| s.list_summaries())?;
        Ok(IterationListResponse { iterations })
    }

    pub fn test_complete_iteration(&self, version: &str) -> Result<String, McpError> {
        self.with_store(|s| s.complete(version))
    }

    pub fn test_decompose_goal(
        &self,
        goal_id: &str,
        requirements: Vec<RequirementItem>,
    ) -> Result<DecomposeGoalResponse, McpError> {
        let inputs = Self::requirement_inputs(requirements);
        let requirements_added = self.with_store(|s| s.decompose_goal(goal_id, inputs))?;
        Ok(DecomposeGoalResponse {
            goal_id: goal_id.to_string(),
            requirements_added,
        })
    }

    pub fn test_generate_tasks(
        &self,
        requirement_id: &str,
        tasks: Vec<TaskItem>,
    ) -> Result<String, McpError> {
        let inputs = Self::task_inputs(tasks)?;
        self.with_store(|s| s.generate_tasks(requirement_id, inputs))
    }

    pub fn test_update_task_status(
        &self,
        task_id: &str,
        status: &str,
    ) -> Result<TaskStatusChange, McpError> {
        let status: TaskStatus = Self::parse(status)?;
        self.with_store(|s| s.update_task_status(task_id, status))
    }

    pub fn test_update_development_report(
        &self,
        content: &str,
        mode: &str,
    ) -> Result<String, McpError> {
        let mode: ReportMode = Self::parse(mode)?;
        self.with_store(|s| s.update_report(content, mode))
    }

    pub fn test_view_current_iteration_plan(&self) -> Result<String, McpError> {
        self.with_store(|s| s.render_plan())
    }

    pub fn test_view_development_report(&self) -> Result<String, McpError> {
        self.with_store(|s| s.render_report())
    }

    pub fn test_get_guidance(&self, phase: &str) -> Result<String, McpError> {
        let phase: Phase = Self::parse(phase)?;
        Ok(guidance::for_phase(phase).to_string())
    }
}

#[tool_router]
impl McpServer {
    // ============================================================
    // Context Tools
    // ============================================================

    #[tool(
        description = "Get the project context: the project root, the plan directory under .cursor/devplan, and the version of the active iteration (null when none is active). Call this first to see where planning stands."
    )]
    async fn get_project_context(&self) -> Result<CallToolResult, McpError> {
        let context = self.with_store(|s| s.project_context())?;
        Self::json(&context)
    }

    #[tool(
        description = "Get guidance for a workflow phase: 'planning', 'decomposition', 'task_generation', or 'reporting'. Returns the steps and recommended tools for that phase."
    )]
    async fn get_guidance(
        &self,
        params: Parameters<GetGuidanceRequest>,
    ) -> Result<CallToolResult, McpError> {
        let phase: Phase = Self::parse(&params.0.phase)?;
        Self::text(guidance::for_phase(phase).to_string())
    }

    // ============================================================
    // Iteration Tools
    // ============================================================

    #[tool(
        description = "Start a new iteration identified by a semantic version (e.g. '1.0.0'). Fails if the version is malformed or already exists. Side effects: creates the version directory with iteration.json and report.md, and makes this iteration the active one."
    )]
    async fn start_new_iteration(
        &self,
        params: Parameters<StartNewIterationRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let message = self.with_store(|s| s.create(&req.version, &req.prd))?;
        Self::text(message)
    }

    #[tool(
        description = "List all iterations, newest version first. Each entry has version, status, timestamps, and goal/requirement/task/completed-task counts."
    )]
    async fn list_iterations(&self) -> Result<CallToolResult, McpError> {
        let iterations = self.with_store(|s| s.list_summaries())?;
        Self::json(&IterationListResponse { iterations })
    }

    #[tool(
        description = "Mark an iteration as completed. Completing an already completed iteration is a no-op. Side effect: if this is the active iteration, no iteration is active afterwards."
    )]
    async fn complete_iteration(
        &self,
        params: Parameters<CompleteIterationRequest>,
    ) -> Result<CallToolResult, McpError> {
        let message = self.with_store(|s| s.complete(&params.0.version))?;
        Self::text(message)
    }

    // ============================================================
    // Planning Tools - operate on the active iteration
    // ============================================================

    #[tool(
        description = "Decompose a goal of the active iteration into requirements. If no goal has the given id, it is created and described by the iteration's PRD. Requirement ids are generated; use view_current_iteration_plan to see them."
    )]
    async fn decompose_goal_into_requirements(
        &self,
        params: Parameters<DecomposeGoalRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let inputs = Self::requirement_inputs(req.requirements);
        let requirements_added = self.with_store(|s| s.decompose_goal(&req.goal_id, inputs))?;
        Self::json(&DecomposeGoalResponse {
            goal_id: req.goal_id,
            requirements_added,
        })
    }

    #[tool(
        description = "Add tasks to a requirement of the active iteration. Each task needs a title, description, and complexity ('low', 'medium', or 'high'). Fails if the requirement id is unknown. Side effect: a planning iteration moves to 'in_progress'."
    )]
    async fn generate_tasks_for_requirement(
        &self,
        params: Parameters<GenerateTasksRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let inputs = Self::task_inputs(req.tasks)?;
        let message = self.with_store(|s| s.generate_tasks(&req.requirement_id, inputs))?;
        Self::text(message)
    }

    #[tool(
        description = "Set a task's status to 'todo' or 'done' in the active iteration. Marking a task done records its completion time; moving it back to todo clears it. Returns the task id, title, old and new status, and completion time."
    )]
    async fn update_task_status(
        &self,
        params: Parameters<UpdateTaskStatusRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let status: TaskStatus = Self::parse(&req.status)?;
        let change = self.with_store(|s| s.update_task_status(&req.task_id, status))?;
        Self::json(&change)
    }

    // ============================================================
    // Report and View Tools
    // ============================================================

    #[tool(
        description = "Write to the active iteration's development report. mode='append' (default) adds a timestamped entry at the end; mode='overwrite' replaces the whole report."
    )]
    async fn update_development_report(
        &self,
        params: Parameters<UpdateReportRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let mode: ReportMode = Self::parse(&req.mode)?;
        let message = self.with_store(|s| s.update_report(&req.content, mode))?;
        Self::text(message)
    }

    #[tool(
        description = "View the active iteration's plan as Markdown: PRD, goals, requirements and tasks with their ids, status and complexity, and overall progress."
    )]
    async fn view_current_iteration_plan(&self) -> Result<CallToolResult, McpError> {
        let plan = self.with_store(|s| s.render_plan())?;
        Self::text(plan)
    }

    #[tool(description = "View the active iteration's development report as Markdown.")]
    async fn view_development_report(&self) -> Result<CallToolResult, McpError> {
        let report = self.with_store(|s| s.render_report())?;
        Self::text(report)
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: rmcp::model::Implementation {
                name: "devplan".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            instructions: Some(
                r#"devplan tracks development iterations as a tree of goals, requirements and tasks.

Plans live in .cursor/devplan under the project root. One iteration is active at a
time; planning tools act on it.

WORKFLOW:
1. get_project_context - see whether an iteration is active
2. start_new_iteration - open a version with its PRD
3. decompose_goal_into_requirements - split goals into requirements
4. view_current_iteration_plan - look up generated requirement ids
5. generate_tasks_for_requirement - add tasks with complexity ratings
6. update_task_status - mark tasks done as work finishes
7. update_development_report - log progress and decisions
8. complete_iteration - close the version when every task is done

Call get_guidance with a phase name for detailed advice on each step."#
                    .into(),
            ),
            ..Default::default()
        }
    }
}

pub async fn run_stdio_server(store: IterationStore) -> anyhow::Result<()> {
    use tokio::io::{stdin, stdout};

    tracing::info!("Starting MCP server via stdio");

    let service = McpServer::new(store);
    let server = service.serve((stdin(), stdout())).await?;

    let quit_reason = server.waiting().await?;
    tracing::info!("MCP server stopped: {:?}", quit_reason);

    Ok(())
}
