//! Snippet domain: the stored text, its identifier, and how new ones are claimed

mod id;

pub use id::{GenerationError, IdAlphabet, IdGenerator, InvalidId, SnippetId, MAX_ID_LEN};

use thiserror::Error;

use crate::store::{SnippetStore, StoreError};

/// A stored piece of text and its public identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub id: SnippetId,
    pub code: String,
}

impl Snippet {
    /// Retrieval address under `base_url` (no trailing slash)
    pub fn url(&self, base_url: &str) -> String {
        format!("{base_url}/show?id={}", self.id)
    }
}

#[derive(Debug, Error)]
pub enum CreateError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("failed to save snippet: {0}")]
    Store(#[from] StoreError),
}

/// Claim a fresh id and persist `code` under it
///
/// Each attempt draws a candidate, checks it against the store, then writes
/// with create-if-absent so a concurrent request can never overwrite it.
/// With `attempts == 1` the first collision is final.
pub fn create_snippet(
    generator: &IdGenerator,
    store: &dyn SnippetStore,
    code: String,
    attempts: usize,
) -> Result<Snippet, CreateError> {
    let mut last_collision = None;

    for _ in 0..attempts.max(1) {
        let id = match generator.generate(store) {
            Ok(id) => id,
            Err(GenerationError::Collision(taken)) => {
                last_collision = Some(taken);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        match store.insert(&id, &code) {
            Ok(()) => return Ok(Snippet { id, code }),
            Err(StoreError::AlreadyExists(taken)) => last_collision = Some(taken),
            Err(e) => return Err(e.into()),
        }
    }

    Err(GenerationError::Collision(last_collision.unwrap_or_default()).into())
}
