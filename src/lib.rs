//! Concurrency-safe synchronization of a shared JSON catalog index.
//!
//! Many independent writers upload files to a shared drive and register them
//! in a single `db.json` index document. This crate owns the part that must
//! not lose data under contention: fetching the current index, merging one
//! entry in by name, and writing the result back under an
//! optimistic-concurrency version token, retried a bounded number of times
//! when another writer wins the race.
//!
//! The transport is abstracted behind [`store::DocumentStore`].
//! [`store::GraphDriveStore`] implements it against a Graph-style drive
//! content endpoint, using `ETag` response headers as version tokens and
//! `If-Match` preconditions on writes.

pub mod error;
pub mod index;
pub mod merge;
pub mod store;
