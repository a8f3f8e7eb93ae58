use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use std::sync::Arc;
use tabled::{Table, Tabled};
use tasktrackr_core::config::{self, Config};
use tasktrackr_core::error::AppError;
use tasktrackr_core::model::{self, Task, TaskDraft, TaskPatch};
use tasktrackr_core::notify::{self, Notifier, Reminder};
use tasktrackr_core::scheduler;
use tasktrackr_core::store::TaskStore;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Command};

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Done")]
    done: &'static str,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Priority")]
    priority: &'static str,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Reminder")]
    reminder: String,
}

impl TaskRow {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            done: if task.completed { "x" } else { " " },
            title: task.title.clone(),
            priority: task.priority.label(),
            due: task.due_at.clone().unwrap_or_else(|| "-".to_string()),
            reminder: task.reminder_at.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

fn print_tasks_table(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let rows: Vec<TaskRow> = tasks.iter().map(TaskRow::from_task).collect();
    println!("{}", Table::new(rows));
}

fn print_tasks_json(tasks: &[Task]) -> Result<(), AppError> {
    let payload =
        serde_json::to_string(tasks).map_err(|err| AppError::persistence(err.to_string()))?;
    println!("{payload}");
    Ok(())
}

fn print_task_json(task: &Task) -> Result<(), AppError> {
    let payload =
        serde_json::to_string(task).map_err(|err| AppError::persistence(err.to_string()))?;
    println!("{payload}");
    Ok(())
}

fn print_task_detail(task: &Task) {
    let status = if task.completed { "completed" } else { "pending" };
    println!("{} [{}]", task.title, status);
    println!("   ID: {}", task.id);
    if !task.description.is_empty() {
        println!("   Description: {}", task.description);
    }
    if let Some(due_at) = task.due_at.as_deref() {
        println!("   Due: {due_at}");
    }
    println!("   Priority: {}", task.priority.label());
    if let Some(reminder_at) = task.reminder_at.as_deref() {
        let fired = if task.reminder_fired { " (fired)" } else { "" };
        println!("   Reminder: {reminder_at}{fired}");
    }
    println!("   Created: {}", task.created_at);
}

/// Non-fatal advisories the original tracker printed at add time; neither
/// condition is a validation failure.
fn print_date_advisories(task: &Task) {
    let now = OffsetDateTime::now_utc();
    let due = task
        .due_at
        .as_deref()
        .and_then(|value| model::parse_rfc3339(value).ok());

    if let Some(due) = due
        && due < now
    {
        println!("Warning: due date is in the past.");
    }

    if let (Some(due), Some(reminder)) = (
        due,
        task.reminder_at
            .as_deref()
            .and_then(|value| model::parse_rfc3339(value).ok()),
    ) && reminder > due
    {
        println!("Warning: reminder time is after the due date.");
    }
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::validation(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(current.clone());
                current.clear();
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::validation("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_command(cli: Cli, store: &TaskStore) -> Result<(), AppError> {
    match cli.command {
        Command::Add {
            title,
            description,
            due,
            priority,
            remind,
        } => {
            let title = match title {
                Some(value) if !value.trim().is_empty() => value,
                _ => return Err(AppError::validation("title is required")),
            };

            let task = store.add(TaskDraft {
                title,
                description: description.unwrap_or_default(),
                due_at: due,
                priority,
                reminder_at: remind,
            })?;

            if cli.json {
                print_task_json(&task)?;
            } else {
                println!("Added task: {} ({})", task.title, task.id);
                print_date_advisories(&task);
            }
        }
        Command::List { pending } => {
            let tasks = if pending { store.pending() } else { store.list() };
            if cli.json {
                print_tasks_json(&tasks)?;
            } else {
                print_tasks_table(&tasks);
            }
        }
        Command::Show { id } => {
            let task = store.get(&id)?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                print_task_detail(&task);
            }
        }
        Command::Update {
            id,
            title,
            description,
            due,
            priority,
            remind,
        } => {
            let task = store.update(
                &id,
                TaskPatch {
                    title,
                    description,
                    due_at: due,
                    priority,
                    reminder_at: remind,
                },
            )?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!("Updated task: {} ({})", task.title, task.id);
            }
        }
        Command::Done { id } => {
            let task = store.toggle_complete(&id)?;
            if cli.json {
                print_task_json(&task)?;
            } else if task.completed {
                println!("Completed task: {} ({})", task.title, task.id);
            } else {
                println!("Reopened task: {} ({})", task.title, task.id);
            }
        }
        Command::Delete { id } => {
            let task = store.get(&id)?;
            store.delete(&id)?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!("Deleted task: {} ({})", task.title, task.id);
            }
        }
    }

    Ok(())
}

fn print_reminder(reminder: &Reminder) {
    println!("\nREMINDER: {}", reminder.title);
    if !reminder.description.is_empty() {
        println!("   Description: {}", reminder.description);
    }
    if let Some(due_at) = reminder.due_at.as_deref() {
        println!("   Due: {due_at}");
    }
    println!("   Priority: {}\n", reminder.priority.label());
}

fn run_interactive(store: Arc<TaskStore>, config: &Config) -> Result<(), AppError> {
    let (channel_notifier, reminders) = notify::reminder_channel();
    let handle = scheduler::spawn(
        store.clone(),
        Box::new(channel_notifier),
        config.scan_interval(),
    );
    // Reminders print the moment a scan fires, even while read_line blocks.
    // The channel disconnects when the scheduler drops its sender, which
    // ends the iterator and lets the printer join.
    let printer = std::thread::spawn(move || {
        let desktop = notify::notifier_from_env();
        for reminder in reminders.iter() {
            print_reminder(&reminder);
            if let Err(err) = desktop.notify(&reminder) {
                tracing::warn!(error = %err, "desktop notification failed");
            }
        }
    });

    println!("TaskTrackr — type a command, `help` for usage, `exit` to quit.");

    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::persistence(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {err}");
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("tasktrackr".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(cli, store.as_ref()) {
            eprintln!("ERROR: {err}");
        }
    }

    handle.shutdown();
    let _ = printer.join();
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let config_load = config::load_config_with_fallback();
    if let Some(err) = config_load.error.as_ref() {
        tracing::warn!(error = %err, "falling back to default configuration");
    }
    let config = config_load.config;

    let store_path = match config.store_path() {
        Ok(path) => path,
        Err(err) => {
            eprintln!("ERROR: {err}");
            std::process::exit(1);
        }
    };
    let store = Arc::new(TaskStore::open(store_path));

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive(store, &config) {
            eprintln!("ERROR: {err}");
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(cli, store.as_ref()) {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::split_command_line;

    #[test]
    fn split_command_line_handles_quotes() {
        let args = split_command_line("add \"Pay rent\" --priority high").unwrap();
        assert_eq!(args, vec!["add", "Pay rent", "--priority", "high"]);
    }

    #[test]
    fn split_command_line_rejects_unterminated_quote() {
        let err = split_command_line("add \"Pay rent").unwrap_err();
        assert_eq!(err.code(), "validation");
    }
}
