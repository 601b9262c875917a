use crate::coordinator::types::{WorkerEndpoint, WorkerRegistry};
use crate::error::ConfigError;
use crate::ranking::types::{AgeRange, AgeRangeTable, DocumentCollection, InterestMatrix};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json(path, &content)
}

fn parse_json<T: DeserializeOwned>(path: &Path, content: &str) -> Result<T, ConfigError> {
    serde_json::from_str(content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// `[ {document}, ... ]`
pub fn load_documents(path: &Path) -> Result<DocumentCollection, ConfigError> {
    let documents: Vec<Value> = read_json(path)?;
    Ok(DocumentCollection::new(documents))
}

/// `{ "label": [start, end], ... }`; file order is kept.
///
/// Bounds may be written as integers or as whole floats (`18.0`). A range
/// with malformed bounds is skipped without discarding the rest of the table.
pub fn load_age_ranges(path: &Path) -> Result<AgeRangeTable, ConfigError> {
    let raw: Map<String, Value> = read_json(path)?;

    let mut ranges = Vec::with_capacity(raw.len());
    for (label, bounds) in raw {
        match parse_bounds(&bounds) {
            Some((start, end)) => ranges.push(AgeRange { label, start, end }),
            None => tracing::warn!(
                "Age range '{}' in {} has invalid bounds {}, ignoring it",
                label,
                path.display(),
                bounds
            ),
        }
    }

    Ok(AgeRangeTable::new(ranges))
}

fn parse_bounds(bounds: &Value) -> Option<(i64, i64)> {
    match bounds.as_array()?.as_slice() {
        [start, end] => Some((whole_number(start)?, whole_number(end)?)),
        _ => None,
    }
}

fn whole_number(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// `{ "category": { "label": weight, ... }, ... }`; categories are merged
/// in file order when they normalize to the same key.
pub fn load_interests(path: &Path) -> Result<InterestMatrix, ConfigError> {
    let raw: Map<String, Value> = read_json(path)?;

    let mut categories = Vec::with_capacity(raw.len());
    for (category, groups) in raw {
        let groups: HashMap<String, f64> =
            serde_json::from_value(groups).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        categories.push((category, groups));
    }

    Ok(InterestMatrix::new(categories))
}

/// `{ "type": { "host": "...", "port": 5001 }, ... }`; file order is kept.
pub fn load_registry(path: &Path) -> Result<WorkerRegistry, ConfigError> {
    let raw: Map<String, Value> = read_json(path)?;

    let mut workers = Vec::with_capacity(raw.len());
    for (doc_type, endpoint) in raw {
        let endpoint: WorkerEndpoint =
            serde_json::from_value(endpoint).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        workers.push((doc_type, endpoint));
    }

    Ok(WorkerRegistry::new(workers))
}

/// Unwraps a load result, falling back to an empty value.
///
/// Startup never aborts on bad configuration: the component serves with
/// empty state instead.
pub fn or_empty<T: Default>(result: Result<T, ConfigError>, what: &str) -> T {
    match result {
        Ok(value) => {
            tracing::info!("Loaded {}", what);
            value
        }
        Err(e) => {
            tracing::error!("Failed to load {}, continuing with an empty one: {}", what, e);
            T::default()
        }
    }
}
