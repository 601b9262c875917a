use super::protocol::HealthResponse;
use crate::ranking::engine::{resolve_age_group, score_all, sort_by_score};
use crate::ranking::types::{AgeRangeTable, DocumentCollection, InterestMatrix, ScoredResult};
use crate::telemetry::client::TelemetrySender;
use crate::telemetry::types::{LogEntry, MachineKind};

use chrono::Local;
use std::sync::Arc;
use std::time::Instant;

/// Everything a worker needs, loaded once before it starts serving.
pub struct WorkerConfig {
    pub machine_id: String,
    pub documents: DocumentCollection,
    pub age_ranges: AgeRangeTable,
    pub interests: InterestMatrix,
    /// Applied by the HTTP layer when a request carries no age.
    pub default_age: Option<i64>,
}

/// Serves title queries over one immutable document collection.
pub struct WorkerService {
    config: WorkerConfig,
    telemetry: Arc<dyn TelemetrySender>,
}

impl WorkerService {
    pub fn new(config: WorkerConfig, telemetry: Arc<dyn TelemetrySender>) -> Arc<Self> {
        tracing::info!(
            "Worker {} ready: {} documents, {} age ranges",
            config.machine_id,
            config.documents.len(),
            config.age_ranges.len()
        );
        Arc::new(Self { config, telemetry })
    }

    pub fn machine_id(&self) -> &str {
        &self.config.machine_id
    }

    pub fn default_age(&self) -> Option<i64> {
        self.config.default_age
    }

    /// Ranks every document for `title` and `age`, best first.
    ///
    /// Equal scores keep load order. Exactly one log entry is dispatched per
    /// call, after ranking and without waiting for delivery.
    pub fn handle_query(&self, title: &str, age: Option<i64>) -> Vec<ScoredResult> {
        let start_time = Local::now();
        let started = Instant::now();

        let age_group = resolve_age_group(age, &self.config.age_ranges);
        let mut results = score_all(
            &self.config.documents,
            title,
            age_group,
            &self.config.interests,
        );
        sort_by_score(&mut results);

        let elapsed = started.elapsed().as_secs_f64();
        let end_time = Local::now();

        let age_group_label = match (age_group, age) {
            (Some(label), _) => label.to_string(),
            (None, Some(age)) => age.to_string(),
            (None, None) => String::new(),
        };

        tracing::debug!(
            "Query '{}' (age group '{}') ranked {} documents in {:.4}s",
            title,
            age_group_label,
            results.len(),
            elapsed
        );

        self.report(LogEntry {
            start_time,
            end_time,
            machine_id: self.config.machine_id.clone(),
            machine_kind: MachineKind::Worker,
            query_text: title.to_string(),
            processing_time_seconds: (elapsed * 10_000.0).round() / 10_000.0,
            score: results.first().map(|r| r.score).unwrap_or(0.0),
            age_group_label,
        });

        results
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "ok".to_string(),
            message: format!("Worker {} is running", self.config.machine_id),
        }
    }

    /// Fire-and-forget delivery; failures are only logged.
    fn report(&self, entry: LogEntry) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime available, dropping log entry");
            return;
        };

        let telemetry = self.telemetry.clone();
        runtime.spawn(async move {
            let query = entry.query_text.clone();
            match telemetry.register(entry).await {
                Ok(()) => tracing::debug!("Log entry for '{}' delivered", query),
                Err(e) => tracing::warn!("Failed to deliver log entry for '{}': {}", query, e),
            }
        });
    }
}
