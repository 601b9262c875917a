use super::protocol::{ENDPOINT_ENTRIES, ENDPOINT_REGISTER, ReadAllResponse};
use super::types::LogEntry;
use crate::error::TelemetryError;

use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;

/// Delivery of log entries to the centralized store.
#[async_trait]
pub trait TelemetrySender: Send + Sync {
    async fn register(&self, entry: LogEntry) -> Result<(), TelemetryError>;
}

/// HTTP client for a remote `TelemetryStore`.
///
/// One connection slot is shared by every task that reports through this
/// client. The connection is created on first use and dropped when a call
/// made on it fails, so the next call starts from a fresh one. Each
/// connection carries a generation: a failure on an older connection never
/// drops one that another task has already rebuilt.
pub struct RemoteTelemetry {
    base_url: String,
    timeout: Duration,
    connection: Mutex<ConnectionSlot>,
}

#[derive(Default)]
struct ConnectionSlot {
    generation: u64,
    client: Option<reqwest::Client>,
}

impl RemoteTelemetry {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            connection: Mutex::new(ConnectionSlot::default()),
        }
    }

    pub fn has_connection(&self) -> bool {
        self.connection.lock().client.is_some()
    }

    /// Current connection and its generation, opening one if needed.
    pub(crate) fn connection(&self) -> Result<(u64, reqwest::Client), TelemetryError> {
        let mut slot = self.connection.lock();
        if let Some(client) = slot.client.as_ref() {
            return Ok((slot.generation, client.clone()));
        }

        let client = reqwest::Client::builder().timeout(self.timeout).build()?;
        slot.generation += 1;
        slot.client = Some(client.clone());
        tracing::debug!(
            "Opened telemetry connection #{} to {}",
            slot.generation,
            self.base_url
        );
        Ok((slot.generation, client))
    }

    /// Drops the connection if it is still the one of `generation`.
    pub(crate) fn invalidate(&self, generation: u64) {
        let mut slot = self.connection.lock();
        if slot.generation == generation && slot.client.take().is_some() {
            tracing::debug!(
                "Dropped telemetry connection #{} to {}",
                generation,
                self.base_url
            );
        }
    }

    /// Remote `readAll`.
    pub async fn read_all(&self) -> Result<Vec<String>, TelemetryError> {
        let (generation, client) = self.connection()?;
        let result = self.fetch_entries(&client).await;
        if result.is_err() {
            self.invalidate(generation);
        }
        result
    }

    async fn fetch_entries(&self, client: &reqwest::Client) -> Result<Vec<String>, TelemetryError> {
        let response = client
            .get(format!("{}{}", self.base_url, ENDPOINT_ENTRIES))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TelemetryError::Status(response.status()));
        }

        let body: ReadAllResponse = response.json().await?;
        Ok(body.entries)
    }

    async fn post_entry(
        &self,
        client: &reqwest::Client,
        entry: &LogEntry,
    ) -> Result<(), TelemetryError> {
        let response = client
            .post(format!("{}{}", self.base_url, ENDPOINT_REGISTER))
            .json(entry)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TelemetryError::Status(response.status()));
        }
        Ok(())
    }
}

#[async_trait]
impl TelemetrySender for RemoteTelemetry {
    async fn register(&self, entry: LogEntry) -> Result<(), TelemetryError> {
        let (generation, client) = self.connection()?;
        let result = self.post_entry(&client, &entry).await;
        if result.is_err() {
            self.invalidate(generation);
        }
        result
    }
}

/// Used when no store is configured; entries are dropped.
pub struct NoopTelemetry;

#[async_trait]
impl TelemetrySender for NoopTelemetry {
    async fn register(&self, entry: LogEntry) -> Result<(), TelemetryError> {
        tracing::trace!("No telemetry store configured, dropping entry for '{}'", entry.query_text);
        Ok(())
    }
}
