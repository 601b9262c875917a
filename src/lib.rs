//! Demographic Document Search Library
//!
//! A query enters at the coordinator, which fans it out to one worker per
//! document type and merges their ranked answers. Each worker scores its own
//! documents by title match and by how much the caller's age group is
//! interested in each document's category, then reports the query to a
//! centralized telemetry store.
//!
//! ## Modules
//! - **`ranking`**: Pure scoring: tokenization, age groups, interest weights.
//! - **`worker`**: The per-type query service and its HTTP surface.
//! - **`coordinator`**: Fan-out, merge and global ordering across types.
//! - **`telemetry`**: The shared log store, its HTTP surface and client.
//! - **`config`**: One-shot JSON loading of registries, tables and documents.
//! - **`error`**: Domain error types.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod ranking;
pub mod telemetry;
pub mod worker;
