mod db;
mod logging;
mod models;
mod run;
mod ui;

use anyhow::{Context, Result};
use std::path::PathBuf;

const DB_FILE: &str = "expenses.db";
const LOG_FILE: &str = "expense-tracker.log";

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let data_dir = get_data_dir()?;
    logging::init(&data_dir.join(LOG_FILE))?;

    let db_path = data_dir.join(DB_FILE);
    tracing::info!(db = %db_path.display(), "starting");
    let db = db::Database::open(&db_path)?;

    match args.len() {
        1 => run::as_tui(&db),
        _ => run::as_cli(&args, &db),
    }
}

fn get_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "expense-tracker", "ExpenseTracker")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.to_path_buf())
}
