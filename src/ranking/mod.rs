//! Ranking Engine
//!
//! Pure scoring of a worker's local documents against a title query and the
//! caller's age group. Nothing in here performs I/O or holds state.
//!
//! ## Scoring
//! - Every normalized query term found as a whole word in the normalized
//!   title adds 10 points.
//! - If the caller's age resolves to a configured group, the interest weight
//!   of the document's category for that group is added on top.
//!
//! ## Submodules
//! - **`tokenizer`**: Diacritic stripping, case folding, query/title splitting.
//! - **`engine`**: Per-document scoring, batch scoring and result ordering.
//! - **`types`**: Age range table, interest matrix, document collection and
//!   the scored result DTO.

pub mod engine;
pub mod tokenizer;
pub mod types;
