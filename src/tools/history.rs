//! History tools
//!
//! Write and read the rolling conversion log. Storage failures are logged and
//! swallowed so they never affect a conversion response.

use tracing::{debug, error, info};

use crate::db::Database;
use crate::models::ConversionLog;

/// Record a successful conversion
pub async fn save_conversion(db: &Database, action: String, result: String) {
    debug!("Starting - [method:save_conversion]");

    match db
        .run(move |conn| ConversionLog::create(conn, &action, &result))
        .await
    {
        Ok(log) => info!(id = log.id, "Success - [method:save_conversion] with action: writing action and result to db."),
        Err(e) => error!("Failed - [method:save_conversion] with error-message: {}", e),
    }
}

/// Most recent history entries as `"<action> = <result>"`, newest first.
///
/// Returns an empty list if the store cannot be read.
pub async fn fetch_conversion_logs(db: &Database, limit: i64) -> Vec<String> {
    debug!("Starting - [method:fetch_conversion_logs]");

    match db.run(move |conn| ConversionLog::list_recent(conn, limit)).await {
        Ok(logs) => {
            info!(count = logs.len(), "Success - [method:fetch_conversion_logs] with action: reading memory from db.");
            logs.iter().map(ConversionLog::display).collect()
        }
        Err(e) => {
            error!("Failed - [method:fetch_conversion_logs] with error-message: {}", e);
            Vec::new()
        }
    }
}
