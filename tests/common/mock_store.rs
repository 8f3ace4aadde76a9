//! Mock document store for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use catalog_sync::error::{Error, Result};
use catalog_sync::store::{DocumentStore, FetchOutcome, PutOutcome, VersionToken, VersionedBlob};
use std::collections::HashMap;
use std::sync::Mutex;

/// Call record for `put`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutCall {
    pub path: String,
    pub content: Vec<u8>,
    pub expected: Option<String>,
}

/// A stored document revision
#[derive(Debug, Clone)]
struct StoredDoc {
    content: Vec<u8>,
    version: u64,
}

/// In-memory linearizable document store for testing
///
/// Holds one versioned document per path and honors expected-version
/// preconditions for real, so conflict behavior comes from actual version
/// arithmetic rather than canned responses.
///
/// Features:
/// - Genuine conditional writes (stale token yields a version conflict)
/// - Call tracking for verification
/// - Error injection for failure path testing
/// - Scripted external writes landing right after a given fetch, to
///   simulate a concurrent writer winning the round
/// - Forced conflicts for retry exhaustion tests
pub struct MockDocumentStore {
    state: Mutex<HashMap<String, StoredDoc>>,
    // Call tracking
    fetch_calls: Mutex<Vec<String>>,
    put_calls: Mutex<Vec<PutCall>>,
    // Error injection
    error_on_fetch: Mutex<Option<String>>,
    error_on_put: Mutex<Option<String>>,
    forced_conflicts: Mutex<u32>,
    // Scripted concurrent writers, keyed by 1-based fetch ordinal
    external_writes: Mutex<HashMap<u64, (String, Vec<u8>)>>,
}

impl MockDocumentStore {
    /// Create an empty mock store
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HashMap::new()),
            fetch_calls: Mutex::new(Vec::new()),
            put_calls: Mutex::new(Vec::new()),
            error_on_fetch: Mutex::new(None),
            error_on_put: Mutex::new(None),
            forced_conflicts: Mutex::new(0),
            external_writes: Mutex::new(HashMap::new()),
        }
    }

    /// Create a store seeded with one document at version 1
    pub fn with_document(path: &str, content: &[u8]) -> Self {
        let store = Self::new();
        store.write_unconditional(path, content);
        store
    }

    fn token_for(version: u64) -> String {
        format!("v{version}")
    }

    fn write_unconditional(&self, path: &str, content: &[u8]) {
        let mut state = self.state.lock().unwrap();
        let doc = state.entry(path.to_string()).or_insert(StoredDoc {
            content: Vec::new(),
            version: 0,
        });
        doc.content = content.to_vec();
        doc.version += 1;
    }

    // === Error injection methods ===

    /// Make `fetch` return an error
    pub fn fail_fetch(&self, msg: &str) {
        *self.error_on_fetch.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `put` return an error
    pub fn fail_put(&self, msg: &str) {
        *self.error_on_put.lock().unwrap() = Some(msg.to_string());
    }

    /// Reject the next `count` puts with a version conflict, regardless of
    /// the expected token
    pub fn conflict_next_puts(&self, count: u32) {
        *self.forced_conflicts.lock().unwrap() = count;
    }

    /// Land an unconditional write at `path` right after fetch number
    /// `fetch_ordinal` (1-based) returns its snapshot, simulating a
    /// concurrent writer winning the round
    pub fn external_write_after_fetch(&self, fetch_ordinal: u64, path: &str, content: &[u8]) {
        self.external_writes
            .lock()
            .unwrap()
            .insert(fetch_ordinal, (path.to_string(), content.to_vec()));
    }

    // === Call verification methods ===

    /// Number of `fetch` calls made
    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.lock().unwrap().len()
    }

    /// All `put` calls made
    pub fn put_calls(&self) -> Vec<PutCall> {
        self.put_calls.lock().unwrap().clone()
    }

    /// Number of `put` calls made
    pub fn put_count(&self) -> usize {
        self.put_calls.lock().unwrap().len()
    }

    // === State inspection ===

    /// Current content stored at `path`
    pub fn document(&self, path: &str) -> Option<Vec<u8>> {
        self.state
            .lock()
            .unwrap()
            .get(path)
            .map(|doc| doc.content.clone())
    }

    /// Current version counter at `path`
    pub fn version(&self, path: &str) -> Option<u64> {
        self.state.lock().unwrap().get(path).map(|doc| doc.version)
    }
}

impl Default for MockDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn fetch(&self, path: &str) -> Result<FetchOutcome> {
        let ordinal = {
            let mut calls = self.fetch_calls.lock().unwrap();
            calls.push(path.to_string());
            calls.len() as u64
        };

        // Check for injected error
        if let Some(msg) = self.error_on_fetch.lock().unwrap().as_ref() {
            return Err(Error::Remote(msg.clone()));
        }

        let outcome = {
            let state = self.state.lock().unwrap();
            state.get(path).map_or(FetchOutcome::Absent, |doc| {
                FetchOutcome::Present(VersionedBlob {
                    content: doc.content.clone(),
                    version: VersionToken::new(Self::token_for(doc.version)),
                })
            })
        };

        // The scripted concurrent writer lands after this fetch's snapshot
        // was taken, so the returned token is already stale.
        if let Some((target, content)) = self.external_writes.lock().unwrap().remove(&ordinal) {
            self.write_unconditional(&target, &content);
        }

        Ok(outcome)
    }

    async fn put(
        &self,
        path: &str,
        content: &[u8],
        expected: Option<&VersionToken>,
    ) -> Result<PutOutcome> {
        self.put_calls.lock().unwrap().push(PutCall {
            path: path.to_string(),
            content: content.to_vec(),
            expected: expected.map(|token| token.as_str().to_string()),
        });

        // Check for injected error
        if let Some(msg) = self.error_on_put.lock().unwrap().as_ref() {
            return Err(Error::Remote(msg.clone()));
        }

        {
            let mut forced = self.forced_conflicts.lock().unwrap();
            if *forced > 0 {
                *forced -= 1;
                return Ok(PutOutcome::VersionConflict);
            }
        }

        if let Some(expected) = expected {
            let live = {
                let state = self.state.lock().unwrap();
                state.get(path).map(|doc| Self::token_for(doc.version))
            };
            if live.as_deref() != Some(expected.as_str()) {
                return Ok(PutOutcome::VersionConflict);
            }
        }

        self.write_unconditional(path, content);
        Ok(PutOutcome::Stored)
    }
}
