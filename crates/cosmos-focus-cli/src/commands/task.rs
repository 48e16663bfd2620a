//! Mission log commands for CLI.

use clap::Subcommand;
use cosmos_focus_core::storage::Database;
use cosmos_focus_core::task::{TaskStore, EMPTY_LOG_MESSAGE};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to the end of the log
    Add {
        /// Task text
        text: String,
    },
    /// List tasks in log order
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Flip a task's completed flag
    Toggle {
        /// Task ID
        id: String,
    },
    /// Remove a task
    Remove {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut store = TaskStore::load(&db);

    match action {
        TaskAction::Add { text } => match store.add(&text)? {
            Some(task) => println!("Task added: {}", task.id),
            None => eprintln!("nothing to add"),
        },
        TaskAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(store.tasks())?);
            } else if store.is_empty() {
                println!("{EMPTY_LOG_MESSAGE}");
            } else {
                for task in store.tasks() {
                    let mark = if task.completed { "x" } else { " " };
                    println!("[{mark}] {}  {}", task.id, task.text);
                }
                println!("{} of {} remaining", store.remaining(), store.len());
            }
        }
        TaskAction::Toggle { id } => {
            if !store.toggle(&id)? {
                return Err(format!("task not found: {id}").into());
            }
            if let Some(task) = store.get(&id) {
                let state = if task.completed { "completed" } else { "open" };
                println!("Task {id}: {state}");
            }
        }
        TaskAction::Remove { id } => {
            if !store.remove(&id)? {
                return Err(format!("task not found: {id}").into());
            }
            println!("Task removed: {id}");
        }
    }
    Ok(())
}
