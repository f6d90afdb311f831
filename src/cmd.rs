//! Command implementations for the CLI interface.
//!
//! Each handler maps parsed arguments onto a [`TaskStore`] call and renders the
//! outcome. Validation and persistence errors bubble up to `main`.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use taskmgr::storage::default_export_name;
use taskmgr::{Clock, ListCriteria, NewTask, SearchField, TaskPatch, TaskStorage, TaskStore};

use crate::cli::Cli;
use crate::display::*;

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Priority: low | medium | high.
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Comma-separated tags. May be repeated.
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Project name.
        #[arg(long)]
        project: Option<String>,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "+Nd", "+Nw" or "+Nm".
        #[arg(long)]
        due: Option<String>,
    },

    /// List tasks with optional filters.
    List {
        /// Filter by status: pending | in_progress | completed.
        #[arg(long)]
        status: Option<String>,
        /// Filter by priority: low | medium | high.
        #[arg(long)]
        priority: Option<String>,
        /// Filter by tag (case-insensitive).
        #[arg(long)]
        tag: Option<String>,
        /// Filter by project (case-insensitive substring).
        #[arg(long)]
        project: Option<String>,
        /// Only tasks past their due date and not completed.
        #[arg(long)]
        overdue: bool,
        /// Only tasks due today.
        #[arg(long)]
        due_today: bool,
        /// Only tasks due within the next seven days.
        #[arg(long)]
        due_week: bool,
    },

    /// Search tasks by text.
    Search {
        /// Text to look for.
        #[arg(required = true)]
        query: Vec<String>,
        /// Field to search in.
        #[arg(long = "in", value_enum, default_value_t = SearchField::All)]
        field: SearchField,
    },

    /// Show a single task.
    View { id: u64 },

    /// Update fields on a task.
    Update {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        status: Option<String>,
        /// Replace all tags (comma-separated). May be repeated.
        #[arg(long = "tags")]
        tags: Option<Vec<String>>,
        /// Project name; an empty value clears it.
        #[arg(long)]
        project: Option<String>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Clear due date.
        #[arg(long)]
        clear_due: bool,
    },

    /// Delete a task by ID.
    Delete { id: u64 },

    /// Show task statistics.
    Stats,

    /// Add tags to a task.
    AddTags {
        id: u64,
        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// Remove tags from a task.
    RemoveTags {
        id: u64,
        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// Set the status of several tasks at once.
    BulkUpdate {
        /// Comma-separated task IDs, e.g. 1,2,3.
        ids: String,
        status: String,
    },

    /// Delete several tasks at once.
    BulkDelete {
        /// Comma-separated task IDs, e.g. 1,2,3.
        ids: String,
    },

    /// List distinct projects and counts.
    Projects,

    /// List distinct tags and counts.
    Tags,

    /// Export all tasks to a JSON file.
    Export {
        /// Output file path (default: tasks_export_<timestamp>.json)
        output: Option<PathBuf>,
    },

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Split comma-separated values, trimming and dropping blanks.
pub fn split_list(inputs: &[String]) -> Vec<String> {
    inputs
        .iter()
        .flat_map(|raw| raw.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse "1,2,3" into task IDs.
pub fn parse_ids(raw: &str) -> Result<Vec<u64>> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u64>().with_context(|| format!("invalid task ID '{s}'")))
        .collect::<Result<Vec<_>>>()?;
    if ids.is_empty() {
        bail!("no task IDs given");
    }
    Ok(ids)
}

pub fn run<S: TaskStorage, C: Clock>(store: &mut TaskStore<S, C>, command: Commands) -> Result<()> {
    let today = store.clock().today();
    match command {
        Commands::Add { title, desc, priority, tags, project, due } => {
            let new = NewTask {
                title,
                description: desc,
                priority: Some(priority),
                tags: split_list(&tags),
                project,
                due_date: due,
            };
            let task = store.add(new)?;
            println!("Added task {}: {}", task.id, task.title);
        }

        Commands::List { status, priority, tag, project, overdue, due_today, due_week } => {
            let criteria = ListCriteria {
                status,
                priority,
                tag,
                project,
                overdue_only: overdue,
                due_today,
                due_this_week: due_week,
            };
            let tasks = store.list(&criteria)?;
            if store.is_empty() {
                println!("No tasks found.");
            } else if tasks.is_empty() {
                println!("No tasks match the specified filters.");
            } else {
                print_table(&tasks, today);
            }
        }

        Commands::Search { query, field } => {
            let query = query.join(" ");
            let tasks = store.search(&query, field)?;
            if tasks.is_empty() {
                println!("No tasks found matching '{query}'.");
            } else {
                print_table(&tasks, today);
            }
        }

        Commands::View { id } => match store.find_by_id(id) {
            Some(task) => print_task(task, today),
            None => bail!("task {id} not found"),
        },

        Commands::Update { id, title, desc, priority, status, tags, project, due, clear_due } => {
            let patch = TaskPatch {
                title,
                description: desc,
                priority,
                status,
                tags: tags.map(|t| split_list(&t)),
                project,
                due_date: due,
                clear_due_date: clear_due,
            };
            match store.update(id, patch)? {
                Some(task) => println!("Updated task {}: {}", task.id, task.title),
                None => bail!("task {id} not found"),
            }
        }

        Commands::Delete { id } => {
            if !store.delete(id)? {
                bail!("task {id} not found");
            }
            println!("Deleted task {id}");
        }

        Commands::Stats => print_statistics(&store.statistics()),

        Commands::AddTags { id, tags } => match store.add_tags(id, &split_list(&tags))? {
            Some(task) => println!("Task {} tags: {}", task.id, task.tags.join(", ")),
            None => bail!("task {id} not found"),
        },

        Commands::RemoveTags { id, tags } => match store.remove_tags(id, &split_list(&tags))? {
            Some(task) => println!("Task {} tags: {}", task.id, task.tags.join(", ")),
            None => bail!("task {id} not found"),
        },

        Commands::BulkUpdate { ids, status } => {
            let ids = parse_ids(&ids)?;
            let n = store.bulk_update_status(&ids, &status)?;
            println!("Updated {n} task(s) to '{}'", status.trim().to_lowercase());
        }

        Commands::BulkDelete { ids } => {
            let ids = parse_ids(&ids)?;
            let n = store.bulk_delete(&ids)?;
            println!("Deleted {n} task(s)");
        }

        Commands::Projects => {
            let rows = store.projects();
            if rows.is_empty() {
                println!("No projects found.");
            } else {
                print_counts("Project", &rows, None);
            }
        }

        Commands::Tags => {
            let rows = store.tags();
            if rows.is_empty() {
                println!("No tags found.");
            } else {
                print_counts("Tag", &rows, None);
            }
        }

        Commands::Export { output } => {
            let path = output.unwrap_or_else(|| PathBuf::from(default_export_name()));
            let n = store.export(&path)?;
            println!("Exported {n} task(s) to {}", path.display());
        }

        Commands::Completions { shell } => cmd_completions(shell),
    }
    Ok(())
}

/// Print a completion script for `shell` to stdout.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
