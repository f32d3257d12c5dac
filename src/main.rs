use std::sync::Arc;

use anyhow::Result;
use daybook_core::AppError;
use daybook_services::{SqliteKvStore, TodoStore};

fn main() -> Result<()> {
    daybook_core::init()?;

    if let Err(e) = run() {
        tracing::error!("Startup failed: {}", e);
        eprintln!("{}", e.user_message());
        return Err(e.into());
    }

    Ok(())
}

fn run() -> Result<(), AppError> {
    let mut app = daybook_core::App::new()?;
    let storage = &app.config().storage;

    let kv = SqliteKvStore::open(&storage.database_path)?;
    let todos = TodoStore::from_config(Arc::new(kv), storage);
    let counts = todos.counts();

    tracing::info!("Daybook started");

    println!("Daybook - todos, weather and movies");
    println!("\nConfiguration:");
    println!("  Config directory: {}", app.config().config_dir.display());
    println!("  Database: {}", storage.database_path.display());
    println!(
        "\nTodos: {} total, {} pending, {} completed",
        counts.total, counts.pending, counts.completed
    );

    app.shutdown()?;

    Ok(())
}
