//! Audit log that appends JSON lines to one file per day.

use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use super::blocking::run_blocking;
use crate::task::{
    domain::AuditEntry,
    ports::{AuditLog, AuditLogError},
};

/// Appends each entry as one JSON object per line to
/// `YYYY-MM-DD.jsonl`, dated by the entry timestamp (UTC).
///
/// Appends run on the blocking thread pool, one at a time.
#[derive(Debug, Clone)]
pub struct JsonLinesAuditLog {
    dir: Arc<Dir>,
    write_gate: Arc<Mutex<()>>,
}

impl JsonLinesAuditLog {
    /// Opens (creating if needed) the audit directory at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`AuditLogError::Persistence`] when the directory cannot be
    /// created or opened.
    pub fn open(root: &Utf8Path) -> Result<Self, AuditLogError> {
        Dir::create_ambient_dir_all(root, ambient_authority()).map_err(AuditLogError::persistence)?;
        let dir =
            Dir::open_ambient_dir(root, ambient_authority()).map_err(AuditLogError::persistence)?;
        Ok(Self {
            dir: Arc::new(dir),
            write_gate: Arc::new(Mutex::new(())),
        })
    }

    /// File name holding entries stamped on the same UTC day as `entry`.
    #[must_use]
    pub fn file_name_for(entry: &AuditEntry) -> String {
        format!("{}.jsonl", entry.timestamp.format("%Y-%m-%d"))
    }
}

#[async_trait]
impl AuditLog for JsonLinesAuditLog {
    async fn append(&self, entry: &AuditEntry) -> Result<(), AuditLogError> {
        let line =
            serde_json::to_string(entry).map_err(|err| AuditLogError::Encoding(err.to_string()))?;
        let file_name = Self::file_name_for(entry);
        let dir = Arc::clone(&self.dir);
        let write_gate = Arc::clone(&self.write_gate);

        run_blocking(
            move || {
                let _guard = write_gate.lock().unwrap_or_else(PoisonError::into_inner);
                let mut options = OpenOptions::new();
                options.create(true).append(true);
                let mut file = dir
                    .open_with(&file_name, &options)
                    .map_err(AuditLogError::persistence)?;
                writeln!(file, "{line}").map_err(AuditLogError::persistence)
            },
            AuditLogError::persistence,
        )
        .await
    }
}
