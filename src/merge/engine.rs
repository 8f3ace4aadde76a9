//! Merge execution - the effectful retry loop
//!
//! Drives fetch/merge/put rounds against a [`DocumentStore`], using the
//! fetched version token as the write precondition and re-merging against a
//! fresh fetch whenever the store reports a conflict.

use crate::error::{Error, Result};
use crate::index::{Entry, IndexDocument, MergeOutcome};
use crate::merge::upsert_entry;
use crate::store::{DocumentStore, FetchOutcome, PutOutcome};
use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// Attempt bound used by callers with no reason to pick another
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Outcome of a single fetch/merge/put round
enum Round {
    /// The write was accepted
    Committed(MergeOutcome),
    /// The live revision moved underneath us
    Conflict,
}

/// Read-merge-write loop bound to one document path
///
/// Holds no state between calls beyond the store handle, the path, and the
/// retry delay. The version token obtained by each round's fetch is the sole
/// coordination mechanism with concurrent writers: of all conditional writes
/// racing against one revision, at most one lands, and the rest re-merge
/// against the new current state.
pub struct MergeEngine<S> {
    store: S,
    path: String,
    retry_delay: Duration,
}

impl<S: DocumentStore> MergeEngine<S> {
    /// Create an engine for the document at `path`
    pub fn new(store: S, path: impl Into<String>) -> Self {
        Self {
            store,
            path: path.into(),
            retry_delay: Duration::ZERO,
        }
    }

    /// Sleep between one and two times this long before each retry round.
    ///
    /// Defaults to zero: retries re-fetch immediately. A small jittered
    /// delay spreads out writers that all lost the same race.
    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// The underlying document store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Merge `entry` into `category`, retrying on version conflicts.
    ///
    /// Makes at most `max_retries` rounds; values below 1 are treated as 1.
    /// Every round works from a fresh fetch - nothing carries over from a
    /// conflicted round. Non-conflict store failures and malformed documents
    /// abort immediately. When every round conflicts, the entry is not
    /// recorded and [`Error::ConflictExhausted`] is returned.
    pub async fn apply_entry(
        &self,
        category: &str,
        entry: Entry,
        max_retries: u32,
    ) -> Result<MergeOutcome> {
        let rounds = max_retries.max(1);

        for attempt in 1..=rounds {
            if attempt > 1 {
                self.backoff().await;
            }

            match self.round(category, &entry).await? {
                Round::Committed(outcome) => {
                    debug!(
                        path = %self.path,
                        category,
                        entry = %entry.name,
                        action = %outcome.action,
                        attempt,
                        "merged entry"
                    );
                    return Ok(outcome);
                }
                Round::Conflict => {
                    debug!(
                        path = %self.path,
                        category,
                        entry = %entry.name,
                        attempt,
                        "version conflict, re-merging against latest"
                    );
                }
            }
        }

        Err(Error::ConflictExhausted {
            path: self.path.clone(),
            category: category.to_string(),
            entry: entry.name,
            attempts: rounds,
        })
    }

    /// One fetch/merge/put round
    async fn round(&self, category: &str, entry: &Entry) -> Result<Round> {
        let (mut doc, expected) = match self.store.fetch(&self.path).await? {
            FetchOutcome::Present(blob) => {
                let doc: IndexDocument = serde_json::from_slice(&blob.content).map_err(|e| {
                    Error::MalformedDocument {
                        path: self.path.clone(),
                        source: e,
                    }
                })?;
                (doc, Some(blob.version))
            }
            // First-time creation: start from the default-category skeleton
            // and write unconditionally.
            FetchOutcome::Absent => (IndexDocument::skeleton(), None),
        };

        let action = upsert_entry(&mut doc, category, entry.clone());
        let content = serde_json::to_vec_pretty(&doc).map_err(Error::Encode)?;

        match self.store.put(&self.path, &content, expected.as_ref()).await? {
            PutOutcome::Stored => Ok(Round::Committed(MergeOutcome { action })),
            PutOutcome::VersionConflict => Ok(Round::Conflict),
        }
    }

    /// Jittered delay between rounds; no-op when the delay is zero
    async fn backoff(&self) {
        if self.retry_delay.is_zero() {
            return;
        }
        let base = u64::try_from(self.retry_delay.as_millis()).unwrap_or(u64::MAX);
        let jitter = rand::rng().random_range(0..=base);
        tokio::time::sleep(Duration::from_millis(base.saturating_add(jitter))).await;
    }
}
