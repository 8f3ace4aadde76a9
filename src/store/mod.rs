//! Versioned document storage
//!
//! Provides conditional get/put of a versioned JSON blob keyed by path.

mod graph;

pub use graph::GraphDriveStore;

use crate::error::Result;
use async_trait::async_trait;

/// Opaque revision token for a stored document (ETag-style)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionToken(String);

impl VersionToken {
    /// Wrap a raw token value
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw token value, exactly as the store reported it
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VersionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fetched document revision: raw content plus its version token
#[derive(Debug, Clone)]
pub struct VersionedBlob {
    /// Raw document bytes as stored
    pub content: Vec<u8>,
    /// Token identifying this revision
    pub version: VersionToken,
}

/// Outcome of fetching a path
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// A document exists at the path
    Present(VersionedBlob),
    /// Nothing is stored at the path yet
    Absent,
}

/// Outcome of a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// The write was accepted
    Stored,
    /// The live revision no longer matches the expected token
    VersionConflict,
}

/// Document store trait for versioned blob storage
///
/// This trait abstracts the remote store, allowing the same merge logic to
/// run against any backend that offers linearizable-per-path get/put with a
/// usable version token. How a store performs its I/O is its own business.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the current revision at `path`, or report absence.
    ///
    /// Any response other than success or not-found is an error.
    async fn fetch(&self, path: &str) -> Result<FetchOutcome>;

    /// Write `content` to `path`.
    ///
    /// With `expected` set, the write only succeeds while the live revision
    /// still matches the token; a mismatch is reported as
    /// [`PutOutcome::VersionConflict`]. With `expected = None` the write is
    /// unconditional.
    async fn put(
        &self,
        path: &str,
        content: &[u8],
        expected: Option<&VersionToken>,
    ) -> Result<PutOutcome>;
}
