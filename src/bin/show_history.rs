//! Utility to print the most recent conversions
//!
//! Usage: show_history [count]

use unitconv::config::{ServiceConfig, DEFAULT_HISTORY_LIMIT};
use unitconv::models::ConversionLog;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let limit = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<i64>()?,
        None => DEFAULT_HISTORY_LIMIT,
    };

    let config = ServiceConfig::from_env()?;
    println!("Database path: {}", config.database_path.display());

    let database = unitconv::db::Database::new(&config.database_path)?;
    database.with_conn(|conn| {
        unitconv::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let (total, logs) = database.with_conn(|conn| {
        Ok((ConversionLog::count(conn)?, ConversionLog::list_recent(conn, limit)?))
    })?;

    println!("Showing {} of {} recorded conversions:", logs.len(), total);
    for log in &logs {
        println!("  [{}] {}", log.created_at, log.display());
    }

    Ok(())
}
