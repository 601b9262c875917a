//! Telemetry Store Protocol
//!
//! The store exposes exactly two operations over HTTP.

use serde::{Deserialize, Serialize};

/// `POST` a JSON `LogEntry`; answers `204 No Content`.
pub const ENDPOINT_REGISTER: &str = "/register";
/// `GET` every entry rendered as a display string, in registration order.
pub const ENDPOINT_ENTRIES: &str = "/entries";

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadAllResponse {
    pub entries: Vec<String>,
}
