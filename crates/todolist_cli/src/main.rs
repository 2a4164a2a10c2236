//! Terminal presentation layer for the to-do list.
//!
//! # Responsibility
//! - Render the sorted list (colored priority dot, name, priority tag).
//! - Collect add/delete input and invoke the core store operations.
//!
//! # Invariants
//! - The list is always re-fetched from the store before rendering or
//!   resolving positions; this process holds no cached state.
//! - Failures are local to the invoked action: report, exit non-zero.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::{Color, Colorize};
use std::path::PathBuf;
use todolist_core::db::open_db;
use todolist_core::{
    default_log_level, init_logging, priority_color, DisplayColor, Priority, SqliteTodoRepository,
    Todo, TodoService,
};

#[derive(Parser)]
#[command(name = "todolist")]
#[command(about = "Single-list to-do manager over a local SQLite store")]
#[command(version)]
struct Cli {
    /// Database file; created on first use
    #[arg(long, env = "TODOLIST_DB", default_value = "todolist.sqlite3")]
    db: PathBuf,

    /// Directory for rolling log files; logging stays off when unset
    #[arg(long, env = "TODOLIST_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "TODOLIST_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new item
    Add {
        /// Item name; must not be empty
        name: String,

        #[arg(long, value_enum, default_value = "normal")]
        priority: PriorityArg,
    },
    /// Show all items sorted by name
    List {
        /// Emit the snapshot as JSON instead of the rendered list
        #[arg(long)]
        json: bool,
    },
    /// Delete items by their 1-based position in the displayed list
    Delete {
        #[arg(required = true)]
        positions: Vec<usize>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PriorityArg {
    Low,
    Normal,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::Low => Self::Low,
            PriorityArg::Normal => Self::Normal,
            PriorityArg::High => Self::High,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let absolute = std::path::absolute(log_dir)
            .with_context(|| format!("cannot resolve log directory `{}`", log_dir.display()))?;
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &absolute.to_string_lossy())
            .map_err(|message| anyhow::anyhow!(message))?;
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("cannot open database `{}`", cli.db.display()))?;
    let repo = SqliteTodoRepository::try_new(&conn).context("database schema check failed")?;
    let service = TodoService::new(repo);

    match cli.command {
        Commands::Add { name, priority } => {
            // Pre-check for a friendly message; the store re-validates.
            if name.is_empty() {
                bail!("invalid name: enter something for the new todo item");
            }
            let created = service.add(name, Some(priority.into()))?;
            println!("Added {}", render_row(&created));
        }
        Commands::List { json } => {
            let todos = service.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&todos)?);
            } else if todos.is_empty() {
                println!("Nothing to do yet. Add your first item with `todolist add <NAME>`.");
            } else {
                for (index, todo) in todos.iter().enumerate() {
                    println!("{:>3}. {}", index + 1, render_row(todo));
                }
            }
        }
        Commands::Delete { positions } => {
            let snapshot = service.list()?;
            let indices = resolve_positions(snapshot.len(), &positions)?;
            let ids: Vec<_> = indices.iter().map(|&index| snapshot[index].uuid).collect();

            let outcome = service.remove_many(&ids)?;
            for &index in &indices {
                let todo = &snapshot[index];
                if outcome.deleted.contains(&todo.uuid) {
                    println!("Deleted {}", render_row(todo));
                }
            }
            if !outcome.is_complete() {
                bail!(
                    "{} of {} item(s) could not be deleted",
                    outcome.missing.len() + outcome.failed.len(),
                    ids.len()
                );
            }
        }
    }

    Ok(())
}

/// Maps 1-based display positions onto snapshot indices.
///
/// Rejects zero and out-of-range positions; duplicates collapse to one
/// delete so a repeated position cannot hit the not-found path.
fn resolve_positions(snapshot_len: usize, positions: &[usize]) -> Result<Vec<usize>> {
    let mut indices = Vec::with_capacity(positions.len());
    for &position in positions {
        if position == 0 || position > snapshot_len {
            bail!("position {position} is out of range (list has {snapshot_len} item(s))");
        }
        let index = position - 1;
        if !indices.contains(&index) {
            indices.push(index);
        }
    }
    Ok(indices)
}

fn render_row(todo: &Todo) -> String {
    let dot = "●".color(terminal_color(priority_color(todo.priority)));
    let tag = format!("[{}]", todo.priority.label()).dimmed();
    format!("{dot} {} {tag}", todo.name.bold())
}

fn terminal_color(color: DisplayColor) -> Color {
    match color {
        DisplayColor::Red => Color::Red,
        DisplayColor::Green => Color::Green,
        DisplayColor::Blue => Color::Blue,
        DisplayColor::Gray => Color::BrightBlack,
    }
}

#[cfg(test)]
mod tests {
    use super::resolve_positions;

    #[test]
    fn positions_are_one_based_and_deduplicated() {
        let indices = resolve_positions(3, &[2, 1, 2]).unwrap();
        assert_eq!(indices, vec![1, 0]);
    }

    #[test]
    fn zero_position_is_rejected() {
        let err = resolve_positions(3, &[0]).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn out_of_range_position_is_rejected() {
        let err = resolve_positions(2, &[3]).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }
}
