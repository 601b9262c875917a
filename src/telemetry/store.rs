//! Centralized Log Store
//!
//! The single shared-mutable component of the system. Every worker reports
//! here, concurrently, and the order in which `register` calls acquire the
//! lock is the canonical order of all log entries.
//!
//! ## Guarantees
//! - `register` pushes to memory and appends one CSV row under the same lock,
//!   so the in-memory order and the file order are identical.
//! - `read_all` takes the same lock and never observes a half-appended entry.
//! - A failed file append keeps the entry in memory and is only logged.

use super::types::{LOG_COLUMNS, LogEntry, LogRow};
use crate::error::TelemetryError;

use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

pub struct TelemetryStore {
    entries: Mutex<Vec<LogEntry>>,
    log_path: PathBuf,
}

impl TelemetryStore {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        let log_path = log_path.into();
        tracing::info!("Telemetry store will append to {}", log_path.display());

        Self {
            entries: Mutex::new(Vec::new()),
            log_path,
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Appends an entry to memory and to the durable log.
    ///
    /// Blocks on file I/O while holding the lock; call from a blocking context.
    pub fn register(&self, entry: LogEntry) {
        let mut entries = self.entries.lock();

        match append_row(&self.log_path, &entry.to_row()) {
            Ok(()) => {
                tracing::debug!(
                    "Registered log entry from {} at {}",
                    entry.machine_id,
                    entry.start_time
                );
            }
            Err(e) => {
                tracing::error!(
                    "Failed to persist log entry from {}, keeping it in memory: {}",
                    entry.machine_id,
                    e
                );
            }
        }

        entries.push(entry);
    }

    /// Snapshot of every entry in registration order, rendered for display.
    pub fn read_all(&self) -> Vec<String> {
        self.entries.lock().iter().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Parses the durable log back into rows. Local diagnostics only; not
    /// part of the remote contract.
    pub fn read_durable(&self) -> Result<Vec<LogRow>, TelemetryError> {
        let _guard = self.entries.lock();

        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.log_path)?;
        let rows = reader.deserialize().collect::<Result<Vec<LogRow>, _>>()?;
        Ok(rows)
    }
}

/// Appends one row, writing the header first if the file is new or empty.
fn append_row(path: &Path, row: &LogRow) -> Result<(), TelemetryError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let is_new = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if is_new {
        writer.write_record(LOG_COLUMNS)?;
        tracing::info!("Created durable log {}", path.display());
    }
    writer.serialize(row)?;
    writer.flush()?;

    Ok(())
}
