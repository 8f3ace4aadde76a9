//! Merge protocol for the shared index document
//!
//! Two-layer pattern:
//! 1. Upsert - merge one entry into an in-memory document (pure, testable)
//! 2. Engine - fetch/merge/put retry loop against a store (effectful)

mod engine;
mod upsert;

pub use engine::{DEFAULT_MAX_RETRIES, MergeEngine};
pub use upsert::upsert_entry;
