use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use boardsync::api;
use boardsync::api::types::{ProjectId, Task, TaskDraft, TaskId, TaskPatch, TaskStatus};
use boardsync::cache::open_cache;
use boardsync::config::Config;
use boardsync::store::projects::{project_store, task_counts};
use boardsync::store::tasks::task_store;

#[derive(Parser, Debug)]
#[command(name = "boardsync")]
#[command(about = "Keep project and task boards in sync with a remote backend")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/boardsync/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List projects with their task counts
  Projects,
  /// List tasks, optionally for a single project
  Tasks {
    #[arg(short, long)]
    project: Option<ProjectId>,
  },
  /// Show one task fetched straight from the gateway
  Show { id: TaskId },
  /// Create a task
  Add {
    name: String,
    #[arg(short, long)]
    project: ProjectId,
    #[arg(long)]
    due: chrono::NaiveDate,
    #[arg(long)]
    assignee: Option<String>,
  },
  /// Mark a task done
  Done { id: TaskId },
  /// Delete a task
  Rm { id: TaskId },
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  let config = Config::load(args.config.as_deref())?;
  let cache = open_cache(&config.cache)?;

  match args.command {
    Command::Projects => {
      let projects = project_store(&config, cache.clone())?;
      let tasks = task_store(&config, cache)?;
      projects.load_from_cache();
      tasks.load_from_cache();

      projects.fetch_all().await?;
      let all_tasks = tasks.fetch_all().await?;
      let counts = task_counts(&all_tasks);

      for project in projects.entities() {
        let count = counts.get(&project.id).copied().unwrap_or(0);
        println!(
          "{:>4}  {:<32} {:<10} {} tasks",
          project.id, project.name, project.status, count
        );
      }
    }
    Command::Tasks { project } => match project {
      Some(id) => {
        let queries = api::task_queries(&config)?;
        for task in queries.tasks_for_project(id).await? {
          print_task(&task);
        }
      }
      None => {
        let tasks = task_store(&config, cache)?;
        tasks.load_from_cache();
        for task in tasks.fetch_all().await? {
          print_task(&task);
        }
      }
    },
    Command::Show { id } => {
      let gateway = api::gateway_for::<Task>(&config)?;
      match gateway.fetch_by_id(&id).await? {
        Some(task) => print_task(&task),
        None => println!("task {} not found", id),
      }
    }
    Command::Add {
      name,
      project,
      due,
      assignee,
    } => {
      let tasks = task_store(&config, cache)?;
      tasks.load_from_cache();
      let existing = tasks.fetch_all().await?;
      let order = existing
        .iter()
        .filter(|t| t.project_id == project)
        .map(|t| t.order)
        .max()
        .unwrap_or(0)
        + 1;

      let created = tasks
        .create(TaskDraft {
          project_id: project,
          name,
          description: None,
          assignee,
          status: TaskStatus::Todo,
          due_date: due,
          order,
        })
        .await?;
      println!("created task {}", created.id);
    }
    Command::Done { id } => {
      let tasks = task_store(&config, cache)?;
      tasks.load_from_cache();
      tasks.fetch_all().await?;

      let patch = TaskPatch {
        status: Some(TaskStatus::Done),
        ..TaskPatch::default()
      };
      let task = tasks.update(&id, patch).await?;
      println!("done: {}", task.name);
    }
    Command::Rm { id } => {
      let tasks = task_store(&config, cache)?;
      tasks.load_from_cache();
      tasks.fetch_all().await?;

      tasks.delete(&id).await?;
      println!("deleted task {}", id);
    }
  }

  Ok(())
}

fn print_task(task: &Task) {
  let assignee = task.assignee.as_deref().unwrap_or("-");
  println!(
    "{:>6}  [{}] {:<32} project {}  due {}  {}",
    task.id, task.status, task.name, task.project_id, task.due_date, assignee
  );
}
