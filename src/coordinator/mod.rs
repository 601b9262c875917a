//! Coordinator (Fan-out Service)
//!
//! The client-facing entry point. Holds a static registry of workers keyed by
//! document type, forwards each query to the requested types and merges the
//! answers into one list ordered by score.
//!
//! ## Submodules
//! - **`fanout`**: Per-type calls, tagging, merge and sort.
//! - **`types`**: Worker registry, endpoints and fan-out mode.
//! - **`handlers`**: Axum handlers for `/` and `/query`.
//! - **`protocol`**: Endpoint paths, banner and query-string DTO.

pub mod fanout;
pub mod handlers;
pub mod protocol;
pub mod types;
