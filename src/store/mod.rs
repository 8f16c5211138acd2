//! Snippet store
//!
//! Maps snippet identifiers to their text on a flat key-addressable medium.
//! Uniqueness of new identifiers is the caller's concern, except for
//! [`SnippetStore::insert`], which refuses to overwrite.

mod error;
mod file;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;

use crate::snippet::SnippetId;

/// Backend trait for snippet persistence
pub trait SnippetStore: Send + Sync + std::fmt::Debug {
    /// Whether a record is present under `id`. Never mutates.
    fn exists(&self, id: &SnippetId) -> StoreResult<bool>;

    /// Write `code` under `id`, creating or overwriting
    fn save(&self, id: &SnippetId, code: &str) -> StoreResult<()>;

    /// Write `code` under `id` only if nothing is stored there yet
    ///
    /// Fails with [`StoreError::AlreadyExists`] when the key is taken.
    fn insert(&self, id: &SnippetId, code: &str) -> StoreResult<()>;

    /// Read the text stored under `id`
    fn get(&self, id: &SnippetId) -> StoreResult<String>;
}
