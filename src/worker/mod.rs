//! Worker Query Service
//!
//! A worker owns one document collection (one document type) for its whole
//! lifetime and answers title queries against it.
//!
//! ## Responsibilities
//! - **Ranking**: Applies the ranking engine to every document and orders the
//!   results, best first.
//! - **Telemetry**: Reports one log entry per query to the centralized store,
//!   without ever delaying or failing the query.
//! - **Liveness**: A side-effect-free health probe.
//!
//! A worker whose documents or configuration failed to load still serves,
//! returning empty results.

pub mod handlers;
pub mod protocol;
pub mod service;
