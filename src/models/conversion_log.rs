//! Conversion log model
//!
//! Audit trail of successful conversions. Only the most recent entries are
//! ever read back.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A recorded conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionLog {
    pub id: i64,
    pub action: String,
    pub result: String,
    pub created_at: String,
}

impl ConversionLog {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            action: row.get("action")?,
            result: row.get("result")?,
            created_at: row.get("created_at")?,
        })
    }

    /// `"<action> = <result>"`, as shown in the memory view
    pub fn display(&self) -> String {
        format!("{} = {}", self.action, self.result)
    }

    /// Record a conversion
    pub fn create(conn: &Connection, action: &str, result: &str) -> DbResult<Self> {
        let created_at = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

        conn.execute(
            "INSERT INTO converter_logs (action, result, created_at) VALUES (?1, ?2, ?3)",
            params![action, result, created_at],
        )?;

        Ok(Self {
            id: conn.last_insert_rowid(),
            action: action.to_string(),
            result: result.to_string(),
            created_at,
        })
    }

    /// Most recent entries first
    pub fn list_recent(conn: &Connection, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, action, result, created_at FROM converter_logs ORDER BY id DESC LIMIT ?1",
        )?;
        let logs = stmt
            .query_map([limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    /// Total number of recorded conversions
    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM converter_logs", [], |row| row.get(0))?;
        Ok(count)
    }
}
