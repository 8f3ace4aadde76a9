//! Shared test fixtures

#![allow(dead_code)]

mod mock_store;

pub use mock_store::{MockDocumentStore, PutCall};

use catalog_sync::index::Entry;

/// Entry fixture with fields derived from the name
pub fn make_entry(name: &str) -> Entry {
    Entry {
        name: name.to_string(),
        url: format!("https://drive.example.com/files/{name}"),
        reference: format!("ref-{name}"),
        section: vec![format!("section-{name}")],
    }
}
