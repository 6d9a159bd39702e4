use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devplan::config::Config;
use devplan::models::{Phase, ReportMode, RequirementInput, TaskInput, TaskStatus};
use devplan::store::IterationStore;
use devplan::{guidance, mcp, render};

#[derive(Parser)]
#[command(name = "devplan")]
#[command(about = "File-backed iteration planning for AI-assisted development")]
struct Cli {
    /// Project root containing .cursor/devplan (defaults to $DEVPLAN_PROJECT_ROOT or cwd)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server via stdio
    Mcp,
    /// Show the project root, plan directory and active iteration
    Context,
    /// Start a new iteration and make it active
    Start {
        /// Semantic version, e.g. 1.0.0
        version: String,
        /// Product requirements for the iteration
        #[arg(long)]
        prd: String,
    },
    /// Mark an iteration completed
    Complete { version: String },
    /// List iterations, newest first
    List,
    /// Decompose a goal of the active iteration into requirements
    Decompose {
        goal_id: String,
        /// JSON array of {"title", "description"} objects
        requirements: String,
    },
    /// Add tasks to a requirement of the active iteration
    Generate {
        requirement_id: String,
        /// JSON array of {"title", "description", "complexity"} objects
        tasks: String,
    },
    /// Print the active iteration's plan
    Plan,
    /// Print the plan of any iteration
    Show { version: String },
    /// Print the active iteration's development report
    Report,
    /// Write to the active iteration's development report
    Log {
        content: String,
        /// Replace the whole report instead of appending
        #[arg(long)]
        overwrite: bool,
    },
    /// Set a task's status (todo or done)
    Task { task_id: String, status: String },
    /// Print guidance for a phase (planning, decomposition, task_generation, reporting)
    Guide { phase: String },
}

/// Initialize tracing with output to stderr.
///
/// MCP mode needs stdout for the protocol, and the CLI prints its results there.
fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.command {
        Commands::Mcp => "devplan=info",
        _ => "devplan=warn",
    };
    init_tracing(default_filter);

    let config = Config::resolve(cli.root)?;
    let store = IterationStore::open(&config.project_root)?;

    match cli.command {
        Commands::Mcp => {
            mcp::run_stdio_server(store).await?;
        }
        Commands::Context => {
            let context = store.project_context()?;
            println!("{}", serde_json::to_string_pretty(&context)?);
        }
        Commands::Start { version, prd } => {
            println!("{}", store.create(&version, &prd)?);
        }
        Commands::Complete { version } => {
            println!("{}", store.complete(&version)?);
        }
        Commands::List => {
            let summaries = store.list_summaries()?;
            if summaries.is_empty() {
                println!("No iterations yet.");
            }
            for s in summaries {
                println!(
                    "v{:<12} {:<12} goals {:>3}  requirements {:>3}  tasks {:>3}/{:<3}",
                    s.version,
                    s.status.as_str(),
                    s.goals_count,
                    s.requirements_count,
                    s.completed_tasks_count,
                    s.tasks_count
                );
            }
        }
        Commands::Decompose {
            goal_id,
            requirements,
        } => {
            let requirements: Vec<RequirementInput> = serde_json::from_str(&requirements)
                .context("requirements must be a JSON array of {title, description}")?;
            let added = store.decompose_goal(&goal_id, requirements)?;
            println!("Added {} requirements to goal {}", added, goal_id);
        }
        Commands::Generate {
            requirement_id,
            tasks,
        } => {
            let tasks: Vec<TaskInput> = serde_json::from_str(&tasks)
                .context("tasks must be a JSON array of {title, description, complexity}")?;
            println!("{}", store.generate_tasks(&requirement_id, tasks)?);
        }
        Commands::Plan => {
            println!("{}", store.render_plan()?);
        }
        Commands::Show { version } => {
            let iteration = store
                .load_iteration(&version)?
                .ok_or_else(|| anyhow::anyhow!("Iteration {} not found", version))?;
            println!("{}", render::render_plan(&iteration));
        }
        Commands::Report => {
            println!("{}", store.render_report()?);
        }
        Commands::Log { content, overwrite } => {
            let mode = if overwrite {
                ReportMode::Overwrite
            } else {
                ReportMode::Append
            };
            println!("{}", store.update_report(&content, mode)?);
        }
        Commands::Task { task_id, status } => {
            let status: TaskStatus = status.parse()?;
            let change = store.update_task_status(&task_id, status)?;
            println!("{}", serde_json::to_string_pretty(&change)?);
        }
        Commands::Guide { phase } => {
            let phase: Phase = phase.parse()?;
            println!("{}", guidance::for_phase(phase));
        }
    }

    Ok(())
}
