//! Query Telemetry Module
//!
//! Every worker reports one `LogEntry` per query to a single, centralized
//! store. The store serializes concurrent writers behind one lock, keeps the
//! full history in memory and mirrors it to an append-only CSV file.
//!
//! ## Submodules
//! - **`types`**: `LogEntry`, its display form and its CSV row.
//! - **`store`**: The lock-guarded in-memory list plus durable log.
//! - **`client`**: `TelemetrySender` seam and its HTTP implementation.
//! - **`handlers`**: Axum handlers exposing `register` and `readAll`.
//! - **`protocol`**: Endpoint paths and response DTOs.

pub mod client;
pub mod handlers;
pub mod protocol;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;
