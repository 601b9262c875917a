//! Query Fan-out
//!
//! Sends one query to the worker of every selected document type, tags each
//! returned document with its type and merges everything into a single list
//! ordered by score.
//!
//! ## Failure Model
//! A worker that times out, refuses the connection or answers with a
//! non-success status simply contributes nothing. The request itself never
//! fails and carries no marker of which types were missing.

use super::types::{FanOutMode, WorkerEndpoint, WorkerRegistry};
use crate::ranking::types::ScoredResult;
use crate::worker::protocol::ENDPOINT_QUERY;

use anyhow::{Result, anyhow};
use serde_json::{Map, Value};
use std::time::Duration;

pub const DEFAULT_WORKER_TIMEOUT: Duration = Duration::from_secs(10);

pub struct Coordinator {
    registry: WorkerRegistry,
    http_client: reqwest::Client,
    timeout: Duration,
    mode: FanOutMode,
}

impl Coordinator {
    pub fn new(registry: WorkerRegistry, timeout: Duration, mode: FanOutMode) -> Self {
        tracing::info!(
            "Coordinator ready: {} document types, {:?} fan-out, {:?} per call",
            registry.len(),
            mode,
            timeout
        );

        Self {
            registry,
            http_client: reqwest::Client::new(),
            timeout,
            mode,
        }
    }

    pub fn registry(&self) -> &WorkerRegistry {
        &self.registry
    }

    /// Queries the selected types and returns the merged documents, best first.
    pub async fn handle_query(
        &self,
        title: &str,
        age: Option<i64>,
        requested_types: Option<&str>,
    ) -> Vec<Value> {
        let targets: Vec<(String, WorkerEndpoint)> = self
            .registry
            .select(requested_types)
            .into_iter()
            .filter_map(|doc_type| match self.registry.get(&doc_type) {
                Some(endpoint) => Some((doc_type, endpoint.clone())),
                None => {
                    tracing::warn!("Unknown document type '{}' requested, skipping", doc_type);
                    None
                }
            })
            .collect();

        let per_type: Vec<(&str, Result<Vec<ScoredResult>>)> = match self.mode {
            FanOutMode::Sequential => {
                let mut per_type = Vec::with_capacity(targets.len());
                for (doc_type, endpoint) in &targets {
                    let outcome = self.query_worker(endpoint, title, age).await;
                    per_type.push((doc_type.as_str(), outcome));
                }
                per_type
            }
            FanOutMode::Parallel => {
                let calls = targets
                    .iter()
                    .map(|(_, endpoint)| self.query_worker(endpoint, title, age));
                let outcomes = futures::future::join_all(calls).await;
                targets
                    .iter()
                    .map(|(doc_type, _)| doc_type.as_str())
                    .zip(outcomes)
                    .collect()
            }
        };

        let mut merged: Vec<(f64, Map<String, Value>)> = Vec::new();
        for (doc_type, outcome) in per_type {
            match outcome {
                Ok(results) => {
                    tracing::debug!("Type '{}' returned {} results", doc_type, results.len());
                    merged.extend(results.into_iter().map(|r| tag_result(doc_type, r)));
                }
                Err(e) => {
                    tracing::warn!("Worker for type '{}' omitted: {}", doc_type, e);
                }
            }
        }

        merged.sort_by(|a, b| b.0.total_cmp(&a.0));
        merged.into_iter().map(|(_, doc)| Value::Object(doc)).collect()
    }

    async fn query_worker(
        &self,
        endpoint: &WorkerEndpoint,
        title: &str,
        age: Option<i64>,
    ) -> Result<Vec<ScoredResult>> {
        let mut params = vec![("titulo", title.to_string())];
        if let Some(age) = age {
            params.push(("edad", age.to_string()));
        }

        let response = self
            .http_client
            .get(format!("{}{}", endpoint.base_url(), ENDPOINT_QUERY))
            .query(&params)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("worker answered {}", response.status()));
        }

        Ok(response.json().await?)
    }
}

/// Flattens a worker result into its document plus score fields and type.
fn tag_result(doc_type: &str, result: ScoredResult) -> (f64, Map<String, Value>) {
    let mut doc = match result.document {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("documento".to_string(), other);
            map
        }
    };

    doc.insert("score".to_string(), Value::from(result.score));
    doc.insert(
        "coincidencias_titulo".to_string(),
        Value::from(result.title_match_count),
    );
    doc.insert(
        "puntaje_categoria".to_string(),
        Value::from(result.category_score),
    );
    doc.insert("tipo".to_string(), Value::from(doc_type));

    (result.score, doc)
}
