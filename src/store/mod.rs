//! File-backed iteration store.
//!
//! Layout under the project root:
//!
//! ```text
//! <root>/.cursor/devplan/
//!   active_iteration.json      {"version": "<semver>"} or {}
//!   iterations_index.json      {"<semver>": {"status": ..., "updated_at": ...}}
//!   v<semver>/
//!     iteration.json           full Iteration tree
//!     report.md                free-text development report
//! ```
//!
//! Every operation reads the whole document, mutates it in memory and writes it
//! back atomically. There is no locking; a single caller is assumed.

mod files;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::models::*;
use crate::render;

pub use files::{read_json, read_text, write_atomic, write_json};

const PLAN_DIR: [&str; 2] = [".cursor", "devplan"];
const ACTIVE_FILE: &str = "active_iteration.json";
const INDEX_FILE: &str = "iterations_index.json";
const ITERATION_FILE: &str = "iteration.json";
const REPORT_FILE: &str = "report.md";

/// Returned by the view operations when there is nothing to show.
pub const NO_ACTIVE_ITERATION: &str =
    "No active iteration. Use start_new_iteration to begin a new iteration.";

/// Version → status cache stored in `iterations_index.json`.
pub type IterationIndex = BTreeMap<String, IndexEntry>;

/// Owns the on-disk iteration documents below one project root.
#[derive(Debug, Clone)]
pub struct IterationStore {
    project_root: PathBuf,
    plan_dir: PathBuf,
}

impl IterationStore {
    /// Open the store rooted at `project_root`, creating the plan directory.
    pub fn open(project_root: impl Into<PathBuf>) -> Result<Self> {
        let project_root = project_root.into();
        let project_root = project_root.canonicalize().unwrap_or(project_root);
        let plan_dir = PLAN_DIR
            .iter()
            .fold(project_root.clone(), |path, part| path.join(part));
        fs::create_dir_all(&plan_dir).map_err(|e| StoreError::io(&plan_dir, e))?;
        tracing::debug!("Opened iteration store at {}", plan_dir.display());
        Ok(Self {
            project_root,
            plan_dir,
        })
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn plan_directory(&self) -> &Path {
        &self.plan_dir
    }

    fn active_file(&self) -> PathBuf {
        self.plan_dir.join(ACTIVE_FILE)
    }

    fn index_file(&self) -> PathBuf {
        self.plan_dir.join(INDEX_FILE)
    }

    fn iteration_dir(&self, version: &str) -> PathBuf {
        self.plan_dir.join(format!("v{}", version))
    }

    fn report_file(&self, version: &str) -> PathBuf {
        self.iteration_dir(version).join(REPORT_FILE)
    }

    // ============================================================
    // Bookkeeping records
    // ============================================================

    /// Read the active-iteration pointer. A missing file means nothing is active.
    pub fn active_pointer(&self) -> Result<ActivePointer> {
        Ok(read_json(&self.active_file())?.unwrap_or_default())
    }

    fn set_active_pointer(&self, pointer: &ActivePointer) -> Result<()> {
        write_json(&self.active_file(), pointer)
    }

    /// Read the denormalized status index.
    pub fn index(&self) -> Result<IterationIndex> {
        Ok(read_json(&self.index_file())?.unwrap_or_default())
    }

    fn record_index(&self, version: &str, status: IterationStatus) -> Result<()> {
        let mut index = self.index()?;
        index.insert(
            version.to_string(),
            IndexEntry {
                status,
                updated_at: Utc::now(),
            },
        );
        write_json(&self.index_file(), &index)
    }

    // ============================================================
    // Iteration documents
    // ============================================================

    /// Load the document for `version`, `None` if it was never created.
    pub fn load_iteration(&self, version: &str) -> Result<Option<Iteration>> {
        if semver::Version::parse(version).is_err() {
            return Ok(None);
        }
        read_json(&self.iteration_dir(version).join(ITERATION_FILE))
    }

    fn save_iteration(&self, iteration: &Iteration) -> Result<()> {
        let path = self.iteration_dir(&iteration.version).join(ITERATION_FILE);
        write_json(&path, iteration)
    }

    /// Resolve the active version or fail with [`StoreError::NoActiveIteration`].
    fn active_version(&self) -> Result<String> {
        self.active_pointer()?
            .version
            .ok_or(StoreError::NoActiveIteration)
    }

    fn load_active(&self) -> Result<Iteration> {
        let version = self.active_version()?;
        self.load_iteration(&version)?
            .ok_or_else(|| StoreError::not_found("iteration", version))
    }

    // ============================================================
    // Operations
    // ============================================================

    pub fn project_context(&self) -> Result<ProjectContext> {
        Ok(ProjectContext {
            project_root: self.project_root.display().to_string(),
            plan_directory: self.plan_dir.display().to_string(),
            active_iteration: self.active_pointer()?.version,
        })
    }

    /// Start a new iteration and make it the active one.
    pub fn create(&self, version: &str, prd: &str) -> Result<String> {
        semver::Version::parse(version).map_err(|e| StoreError::Validation {
            version: version.to_string(),
            reason: e.to_string(),
        })?;

        let dir = self.iteration_dir(version);
        if dir.exists() {
            return Err(StoreError::Conflict(version.to_string()));
        }
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let iteration = Iteration::new(version, prd, Utc::now());
        self.save_iteration(&iteration)?;
        write_atomic(
            &self.report_file(version),
            render::report_header(&iteration).as_bytes(),
        )?;
        self.set_active_pointer(&ActivePointer::to(version))?;
        self.record_index(version, IterationStatus::Planning)?;

        tracing::info!("Created iteration v{}", version);
        Ok(format!("Created new iteration v{}", version))
    }

    /// Mark an iteration completed. Completing twice is a no-op.
    pub fn complete(&self, version: &str) -> Result<String> {
        let mut iteration = self
            .load_iteration(version)?
            .ok_or_else(|| StoreError::not_found("iteration", version))?;

        if iteration.status == IterationStatus::Completed {
            return Ok(format!("Iteration v{} is already completed", version));
        }

        iteration.status = IterationStatus::Completed;
        iteration.completed_at = Some(Utc::now());
        self.save_iteration(&iteration)?;
        self.record_index(version, IterationStatus::Completed)?;

        if self.active_pointer()?.is(version) {
            self.set_active_pointer(&ActivePointer::default())?;
            tracing::info!("Cleared active iteration v{}", version);
        }

        tracing::info!("Completed iteration v{}", version);
        Ok(format!("Completed iteration v{}", version))
    }

    /// Summaries of every stored iteration, newest version first.
    ///
    /// Directories whose name is not a version or whose document cannot be
    /// loaded are skipped.
    pub fn list_summaries(&self) -> Result<Vec<IterationSummary>> {
        let entries =
            fs::read_dir(&self.plan_dir).map_err(|e| StoreError::io(&self.plan_dir, e))?;

        let mut found = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.plan_dir, e))?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(version) = name.strip_prefix('v') else {
                continue;
            };
            let Ok(parsed) = semver::Version::parse(version) else {
                tracing::debug!("Skipping non-version directory {}", name);
                continue;
            };
            match self.load_iteration(version) {
                Ok(Some(iteration)) => found.push((parsed, IterationSummary::from(&iteration))),
                Ok(None) => {}
                Err(e) => tracing::warn!("Skipping iteration v{}: {}", version, e),
            }
        }

        found.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(found.into_iter().map(|(_, summary)| summary).collect())
    }

    /// Append requirements to a goal of the active iteration.
    ///
    /// An unknown `goal_id` creates the goal, described by the iteration's PRD.
    pub fn decompose_goal(
        &self,
        goal_id: &str,
        requirements: Vec<RequirementInput>,
    ) -> Result<usize> {
        let mut iteration = self.load_active()?;
        let prd = iteration.prd.clone();

        if iteration.find_goal_mut(goal_id).is_none() {
            tracing::info!("Creating goal {} in v{}", goal_id, iteration.version);
            iteration
                .goals
                .push(Goal::new(goal_id.to_string(), DEFAULT_GOAL_TITLE, prd));
        }
        let goal = iteration
            .find_goal_mut(goal_id)
            .ok_or_else(|| StoreError::not_found("goal", goal_id))?;

        let added = requirements.len();
        goal.requirements.extend(
            requirements
                .into_iter()
                .map(|input| Requirement::new(new_id(), input)),
        );

        self.save_iteration(&iteration)?;
        tracing::info!("Added {} requirements to goal {}", added, goal_id);
        Ok(added)
    }

    /// Append tasks to a requirement of the active iteration.
    ///
    /// The first batch of tasks moves a planning iteration into progress.
    pub fn generate_tasks(&self, requirement_id: &str, tasks: Vec<TaskInput>) -> Result<String> {
        let mut iteration = self.load_active()?;

        let requirement = iteration
            .find_requirement_mut(requirement_id)
            .ok_or_else(|| StoreError::not_found("requirement", requirement_id))?;
        let added = tasks.len();
        requirement
            .tasks
            .extend(tasks.into_iter().map(|input| Task::new(new_id(), input)));
        let title = requirement.title.clone();

        if iteration.status == IterationStatus::Planning {
            iteration.status = IterationStatus::InProgress;
            tracing::info!("Iteration v{} is now in progress", iteration.version);
        }

        self.save_iteration(&iteration)?;
        self.record_index(&iteration.version, iteration.status)?;

        tracing::info!("Added {} tasks to requirement {}", added, requirement_id);
        Ok(format!("Added {} tasks to requirement '{}'", added, title))
    }

    /// Change a task's status in the active iteration.
    pub fn update_task_status(&self, task_id: &str, status: TaskStatus) -> Result<TaskStatusChange> {
        let mut iteration = self.load_active()?;

        let task = iteration
            .find_task_mut(task_id)
            .ok_or_else(|| StoreError::not_found("task", task_id))?;
        let old_status = task.transition(status, Utc::now());
        let change = TaskStatusChange {
            task_id: task.id.clone(),
            title: task.title.clone(),
            old_status,
            new_status: status,
            completed_at: task.completed_at,
        };

        self.save_iteration(&iteration)?;
        tracing::info!(
            "Task {} {} -> {}",
            task_id,
            old_status.as_str(),
            status.as_str()
        );
        Ok(change)
    }

    /// Append to or replace the active iteration's development report.
    pub fn update_report(&self, content: &str, mode: ReportMode) -> Result<String> {
        let version = self.active_version()?;
        let path = self.report_file(&version);

        let report = match mode {
            ReportMode::Overwrite => content.to_string(),
            ReportMode::Append => {
                let mut report = read_text(&path)?.unwrap_or_default();
                report.push_str(&render::report_separator(Utc::now()));
                report.push_str(content);
                report
            }
        };
        write_atomic(&path, report.as_bytes())?;

        tracing::info!("Updated report for v{} ({})", version, mode.as_str());
        Ok(format!(
            "Updated development report ({} mode)",
            mode.as_str()
        ))
    }

    /// Markdown plan of the active iteration, or a message if there is none.
    pub fn render_plan(&self) -> Result<String> {
        let Some(version) = self.active_pointer()?.version else {
            return Ok(NO_ACTIVE_ITERATION.to_string());
        };
        match self.load_iteration(&version)? {
            Some(iteration) => Ok(render::render_plan(&iteration)),
            None => Ok(format!("Cannot load active iteration v{}", version)),
        }
    }

    /// Raw report of the active iteration, or a message if there is none.
    pub fn render_report(&self) -> Result<String> {
        let Some(version) = self.active_pointer()?.version else {
            return Ok(NO_ACTIVE_ITERATION.to_string());
        };
        Ok(read_text(&self.report_file(&version))?
            .unwrap_or_else(|| format!("No development report exists for v{}", version)))
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}
