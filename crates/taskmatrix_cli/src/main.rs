//! Command-line host for the task store.
//!
//! # Responsibility
//! - Open one SQLite-backed store per invocation, run one command, flush.
//! - Keep output plain and line-oriented for scripting.

use chrono::{DateTime, Duration, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use taskmatrix_core::dates::{days_until, relative_time};
use taskmatrix_core::{
    default_log_level, init_logging, Category, NewTask, Priority, Quadrant, SqliteKvStore,
    StoreConfig, SystemClock, Task, TaskFilter, TaskPatch, TaskSortBy, TaskStore,
};

const DB_FILE_NAME: &str = "taskmatrix.sqlite3";

#[derive(Debug, Parser)]
#[command(name = "taskmatrix", version, about = "Eisenhower-matrix task list")]
struct Cli {
    /// SQLite file holding the task collection.
    #[arg(long, env = "TASKMATRIX_DB")]
    db: Option<PathBuf>,
    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "TASKMATRIX_LOG_DIR")]
    log_dir: Option<String>,
    #[arg(long)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a task.
    Add(AddArgs),
    /// List tasks, optionally filtered and sorted.
    List(ListArgs),
    /// Edit fields of a task.
    Update(UpdateArgs),
    /// Flip completion of a task.
    Toggle { id: String },
    Delete { id: String },
    /// Show incomplete tasks by quadrant.
    Matrix,
    Stats,
    /// Incomplete tasks due within 7 days.
    Upcoming,
    Overdue,
    /// Remove every task.
    Clear,
}

#[derive(Debug, Args)]
struct AddArgs {
    title: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "medium")]
    priority: Priority,
    #[arg(long, default_value = "other")]
    category: Category,
    /// RFC 3339 due instant; takes precedence over `--in-hours`.
    #[arg(long)]
    due: Option<String>,
    #[arg(long, default_value_t = 24)]
    in_hours: i64,
}

#[derive(Debug, Args)]
struct ListArgs {
    #[arg(long)]
    category: Option<Category>,
    #[arg(long)]
    priority: Option<Priority>,
    #[arg(long)]
    quadrant: Option<Quadrant>,
    #[arg(long, conflicts_with = "done")]
    open: bool,
    #[arg(long)]
    done: bool,
    #[arg(long)]
    sort: Option<TaskSortBy>,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    id: String,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    priority: Option<Priority>,
    #[arg(long)]
    category: Option<Category>,
    #[arg(long)]
    due: Option<String>,
}

type CliStore = TaskStore<SqliteKvStore, SystemClock>;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join(DB_FILE_NAME));
    let backend = match SqliteKvStore::open(&db_path) {
        Ok(backend) => backend,
        Err(err) => {
            eprintln!("error: cannot open {}: {err}", db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let mut store = TaskStore::open(backend, SystemClock, StoreConfig::default());
    let outcome = run(&mut store, cli.command);
    store.flush();

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(store: &mut CliStore, command: Command) -> Result<(), String> {
    let now = Utc::now();
    match command {
        Command::Add(args) => {
            let due = match args.due.as_deref() {
                Some(text) => parse_due(text)?,
                None => due_in_hours(now, args.in_hours)?,
            };
            let task = store.add(
                NewTask::new(args.title, due, args.priority, args.category)
                    .with_description(args.description),
            );
            println!("{}", task.id);
        }
        Command::List(args) => {
            let filter = TaskFilter {
                category: args.category,
                priority: args.priority,
                is_complete: match (args.open, args.done) {
                    (true, _) => Some(false),
                    (_, true) => Some(true),
                    _ => None,
                },
                quadrant: args.quadrant,
            };
            let mut tasks = store.filtered(&filter);
            if let Some(sort) = args.sort {
                taskmatrix_core::stats::sort_tasks(&mut tasks, sort);
            }
            for task in tasks {
                print_task(task, now);
            }
        }
        Command::Update(args) => {
            let patch = TaskPatch {
                title: args.title,
                description: args.description,
                is_complete: None,
                due_date: args.due.as_deref().map(parse_due).transpose()?,
                priority: args.priority,
                category: args.category,
            };
            if patch.is_empty() {
                return Err("nothing to update".to_string());
            }
            let task = store
                .update(&args.id, patch)
                .ok_or_else(|| format!("task not found: {}", args.id))?;
            print_task(&task, now);
        }
        Command::Toggle { id } => {
            store.toggle_complete(&id);
            let task = store
                .get(&id)
                .ok_or_else(|| format!("task not found: {id}"))?;
            print_task(task, now);
        }
        Command::Delete { id } => {
            if !store.delete(&id) {
                return Err(format!("task not found: {id}"));
            }
        }
        Command::Matrix => {
            for (quadrant, bucket) in store.matrix().sorted().iter() {
                println!("== {} ({}) ==", quadrant.label(), bucket.len());
                for classified in bucket {
                    print_task(&classified.task, now);
                }
            }
        }
        Command::Stats => {
            let stats = store.stats();
            println!(
                "total={} completed={} completion={}%",
                stats.total, stats.completed, stats.completion_percentage
            );
            for category in Category::ALL {
                println!(
                    "category {category}: {} ({}% done)",
                    stats.category_count(category),
                    store.category_completion_percentage(category)
                );
            }
            for priority in Priority::ALL {
                println!("priority {priority}: {}", stats.priority_count(priority));
            }
            for quadrant in Quadrant::ALL {
                println!(
                    "quadrant {}: {}",
                    quadrant.label(),
                    stats.quadrant_count(quadrant)
                );
            }
        }
        Command::Upcoming => {
            for task in store.upcoming() {
                print_task(task, now);
            }
        }
        Command::Overdue => {
            for task in store.overdue() {
                print_task(task, now);
            }
        }
        Command::Clear => store.clear(),
    }
    Ok(())
}

fn parse_due(text: &str) -> Result<DateTime<Utc>, String> {
    taskmatrix_core::codec::parse_instant("due", text).map_err(|err| err.to_string())
}

fn due_in_hours(now: DateTime<Utc>, hours: i64) -> Result<DateTime<Utc>, String> {
    Duration::try_hours(hours)
        .and_then(|offset| now.checked_add_signed(offset))
        .ok_or_else(|| format!("--in-hours {hours} is out of range"))
}

fn print_task(task: &Task, now: DateTime<Utc>) {
    let mark = if task.is_complete { "x" } else { " " };
    println!(
        "[{mark}] {} {} | {} | {} | due {} ({}, {}d)",
        task.id,
        task.title,
        task.priority,
        task.category,
        task.due_date.format("%Y-%m-%d %H:%M"),
        relative_time(task.due_date, now),
        days_until(task.due_date, now)
    );
}
