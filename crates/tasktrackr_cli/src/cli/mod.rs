use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tasktrackr", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: tasktrackr add "Pay rent" --due "2024-01-01 09:00" --priority high
    Add {
        title: Option<String>,
        /// Free-form description
        #[arg(long, short = 'd')]
        description: Option<String>,
        /// Due date: RFC3339, "YYYY-MM-DD HH:MM", or "YYYY-MM-DD"
        #[arg(long)]
        due: Option<String>,
        /// Priority: low, medium, or high (default medium)
        #[arg(long, short = 'p')]
        priority: Option<String>,
        /// Reminder time, same formats as --due; must not be in the past
        #[arg(long)]
        remind: Option<String>,
    },
    /// List tasks in creation order
    ///
    /// Example: tasktrackr list --pending
    List {
        /// Hide completed tasks
        #[arg(long)]
        pending: bool,
    },
    /// Show details of a task
    ///
    /// Example: tasktrackr show task-1
    Show {
        id: String,
    },
    /// Update fields of a task
    ///
    /// Example: tasktrackr update task-1 --priority low --due "2024-02-01"
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, short = 'd')]
        description: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long, short = 'p')]
        priority: Option<String>,
        #[arg(long)]
        remind: Option<String>,
    },
    /// Toggle a task between pending and completed
    ///
    /// Example: tasktrackr done task-1
    Done {
        id: String,
    },
    /// Delete a task
    ///
    /// Example: tasktrackr delete task-1
    Delete {
        id: String,
    },
}
