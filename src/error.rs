//! Error types for catalog-sync

use thiserror::Error;

/// Result type alias for catalog-sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the document store and merge engine
///
/// Version conflicts are not represented here: they are an internal signal
/// of the retry loop, reported through
/// [`PutOutcome::VersionConflict`](crate::store::PutOutcome::VersionConflict)
/// and never surfaced to callers directly.
#[derive(Debug, Error)]
pub enum Error {
    /// Non-conflict failure reported by the remote store
    #[error("remote store error: {0}")]
    Remote(String),

    /// HTTP transport failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Fetched content does not parse as an index document
    #[error("malformed index document at {path}: {source}")]
    MalformedDocument {
        /// Remote path of the offending document
        path: String,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// The outgoing index document could not be serialized
    #[error("failed to encode index document: {0}")]
    Encode(#[source] serde_json::Error),

    /// Every write attempt lost the optimistic-concurrency race
    ///
    /// The entry was not recorded. Retrying the whole operation is up to
    /// the caller.
    #[error(
        "gave up updating {path} after {attempts} conflicting attempts (category {category}, entry {entry})"
    )]
    ConflictExhausted {
        /// Remote path of the contested document
        path: String,
        /// Category the entry was being merged into
        category: String,
        /// Name of the entry that was not recorded
        entry: String,
        /// Number of attempts made
        attempts: u32,
    },
}
