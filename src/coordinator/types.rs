use serde::{Deserialize, Serialize};

/// Where the worker for one document type listens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerEndpoint {
    pub host: String,
    pub port: u16,
}

impl WorkerEndpoint {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Document type -> worker, in configuration order.
///
/// The order only matters as the default fan-out order, which decides how
/// equal scores from different types are ordered after the merge.
#[derive(Debug, Clone, Default)]
pub struct WorkerRegistry {
    workers: Vec<(String, WorkerEndpoint)>,
}

impl WorkerRegistry {
    pub fn new(workers: Vec<(String, WorkerEndpoint)>) -> Self {
        Self { workers }
    }

    pub fn get(&self, doc_type: &str) -> Option<&WorkerEndpoint> {
        self.workers
            .iter()
            .find(|(name, _)| name == doc_type)
            .map(|(_, endpoint)| endpoint)
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.workers.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Types to contact for a request.
    ///
    /// `requested` is a `+`-delimited list; a `+` decoded from a query string
    /// arrives as a space, so both separate types. Duplicates are dropped.
    /// Absent or blank means every registered type.
    pub fn select(&self, requested: Option<&str>) -> Vec<String> {
        let requested = requested.map(str::trim).filter(|s| !s.is_empty());

        let Some(requested) = requested else {
            return self.types().map(str::to_string).collect();
        };

        let mut selected: Vec<String> = Vec::new();
        for doc_type in requested
            .split(|c: char| c == '+' || c.is_whitespace())
            .filter(|s| !s.is_empty())
        {
            if !selected.iter().any(|s| s == doc_type) {
                selected.push(doc_type.to_string());
            }
        }
        selected
    }
}

/// How a request's per-type calls are issued. Both produce the same merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FanOutMode {
    #[default]
    Sequential,
    Parallel,
}
