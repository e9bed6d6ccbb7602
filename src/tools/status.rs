//! Service status tool
//!
//! Provides runtime status information about the converter service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::{migrations, Database};
use crate::models::ConversionLog;

/// Runtime status of the service
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    /// Build information
    pub version: &'static str,
    pub git_revision: Option<&'static str>,
    pub build_timestamp: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub schema_version: Option<i32>,
    pub history_entries: Option<i64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
#[derive(Debug, Clone)]
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Collect the current status. Blocks on SQLite and process inspection.
    pub fn get_status(&self, db: &Database) -> ServiceStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let (schema_version, history_entries) = match db.with_conn(|conn| {
            Ok((migrations::get_schema_version(conn)?, ConversionLog::count(conn)?))
        }) {
            Ok((version, count)) => (Some(version), Some(count)),
            Err(e) => {
                tracing::warn!("Could not read database status: {}", e);
                (None, None)
            }
        };

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        ServiceStatus {
            version: build_info.version,
            git_revision: build_info.git_revision,
            build_timestamp: build_info.build_timestamp,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            schema_version,
            history_entries,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reports_history() {
        let db = Database::in_memory().unwrap();
        db.with_conn(migrations::run_migrations).unwrap();
        db.with_conn(|conn| ConversionLog::create(conn, "convert: 1 Cup to Liter", "0.2400"))
            .unwrap();

        let status = StatusTracker::new(PathBuf::from("/nonexistent/unitconv.db")).get_status(&db);
        assert_eq!(status.schema_version, Some(1));
        assert_eq!(status.history_entries, Some(1));
        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.process_id, std::process::id());
    }

    #[test]
    fn test_status_without_schema() {
        let db = Database::in_memory().unwrap();
        let status = StatusTracker::new(PathBuf::from("unitconv.db")).get_status(&db);
        assert_eq!(status.history_entries, None);
    }
}
