//! Markdown rendering for iteration plans and reports.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::models::{Complexity, Iteration, Task, TaskStatus};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

const DONE: &str = "✅";
const TODO: &str = "⏳";

fn status_icon(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Done => DONE,
        TaskStatus::Todo => TODO,
    }
}

fn complexity_icon(complexity: Complexity) -> &'static str {
    match complexity {
        Complexity::Low => "🟢",
        Complexity::Medium => "🟡",
        Complexity::High => "🔴",
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Initial contents of a new iteration's `report.md`.
pub fn report_header(iteration: &Iteration) -> String {
    format!(
        "# Development report - v{}\n\n## Version overview\n\n{}\n\n## Development log\n\n",
        iteration.version, iteration.prd
    )
}

/// Separator written before each appended report entry.
pub fn report_separator(at: DateTime<Utc>) -> String {
    format!("\n\n---\n*Updated: {}*\n\n", timestamp(at))
}

/// Render an iteration as a Markdown plan with progress statistics.
///
/// Ids are printed next to titles so callers can address goals,
/// requirements and tasks in later operations.
///
/// Example output:
/// ```text
/// # Iteration plan - v1.0.0
///
/// **Status**: in_progress
/// ...
/// ### 🎯 Authentication (`auth`)
///
/// #### 📋 Login form (`3f0c...`)
///
/// **Tasks**:
///
/// - ✅ 🟢 **Build form** (`9a1e...`): Email and password fields
/// - ⏳ 🔴 **Wire backend** (`b27d...`): Call the session endpoint
/// ```
pub fn render_plan(iteration: &Iteration) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Iteration plan - v{}\n", iteration.version);
    let _ = writeln!(out, "**Status**: {}", iteration.status.as_str());
    let _ = writeln!(out, "**Created**: {}", timestamp(iteration.created_at));
    if let Some(completed_at) = iteration.completed_at {
        let _ = writeln!(out, "**Completed**: {}", timestamp(completed_at));
    }
    let _ = write!(out, "\n## Product requirements\n\n{}\n\n", iteration.prd);

    out.push_str("## Goals and requirements\n\n");
    if iteration.goals.is_empty() {
        out.push_str("*No goals or requirements defined yet*\n\n");
    }
    for goal in &iteration.goals {
        let _ = write!(
            out,
            "### 🎯 {} (`{}`)\n\n{}\n\n",
            goal.title, goal.id, goal.description
        );
        if goal.requirements.is_empty() {
            out.push_str("*Not yet decomposed into requirements*\n\n");
        }
        for req in &goal.requirements {
            let _ = write!(
                out,
                "#### 📋 {} (`{}`)\n\n{}\n\n",
                req.title, req.id, req.description
            );
            if req.tasks.is_empty() {
                out.push_str("*No tasks generated yet*\n\n");
                continue;
            }
            out.push_str("**Tasks**:\n\n");
            for task in &req.tasks {
                render_task(&mut out, task);
            }
            out.push('\n');
        }
    }

    let counts = iteration.counts();
    out.push_str("## 📊 Progress\n\n");
    let _ = writeln!(out, "- **Goals**: {}", counts.goals);
    let _ = writeln!(out, "- **Requirements**: {}", counts.requirements);
    let _ = writeln!(out, "- **Tasks**: {}", counts.tasks);
    let _ = writeln!(out, "- **Completed tasks**: {}", counts.completed_tasks);
    if let Some(progress) = counts.progress_percent() {
        let _ = writeln!(out, "- **Completion**: {:.1}%", progress);
    }

    out
}

fn render_task(out: &mut String, task: &Task) {
    let _ = writeln!(
        out,
        "- {} {} **{}** (`{}`): {}",
        status_icon(task.status),
        complexity_icon(task.complexity),
        task.title,
        task.id,
        task.description
    );
}
