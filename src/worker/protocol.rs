//! Worker HTTP Protocol

use serde::{Deserialize, Serialize};

pub const ENDPOINT_QUERY: &str = "/query";
pub const ENDPOINT_HEALTH: &str = "/health";

/// Age used by the HTTP endpoint when the caller does not send `edad`.
pub const DEFAULT_AGE: i64 = 30;

/// Query string of `GET /query`.
///
/// `edad` is kept as text: an unparsable age is treated as absent rather
/// than rejected.
#[derive(Debug, Default, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    pub titulo: String,
    pub edad: Option<String>,
}

impl QueryParams {
    pub fn age(&self) -> Option<i64> {
        self.edad.as_deref().and_then(|s| s.trim().parse().ok())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}
