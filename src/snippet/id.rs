//! Snippet identifiers and their random generation

use rand::Rng;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

use crate::store::{SnippetStore, StoreError};

/// Longest identifier accepted from a client or configuration
pub const MAX_ID_LEN: usize = 64;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A validated snippet identifier, safe to use as a file name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnippetId(String);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid snippet id '{0}'")]
pub struct InvalidId(pub String);

impl SnippetId {
    /// Accepts 1 to [`MAX_ID_LEN`] ASCII alphanumeric characters
    pub fn parse(raw: &str) -> Result<Self, InvalidId> {
        let valid = !raw.is_empty()
            && raw.len() <= MAX_ID_LEN
            && raw.bytes().all(|b| b.is_ascii_alphanumeric());
        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(InvalidId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnippetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Character set identifiers are drawn from, fixed per deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdAlphabet {
    /// `a-z`
    #[default]
    Lowercase,
    /// `a-z` and `A-Z`
    ///
    /// Needs a case-sensitive storage directory: on a case-insensitive
    /// filesystem `abcdef` and `ABCDEF` name the same file, so fetching one
    /// returns the other's text. Startup warns when this combination is
    /// detected (see `FileStore::is_case_sensitive`).
    Letters,
}

impl IdAlphabet {
    pub const fn chars(self) -> &'static [u8] {
        match self {
            Self::Lowercase => LOWERCASE,
            Self::Letters => LETTERS,
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("cannot create a new unique id: '{0}' is already taken")]
    Collision(String),

    #[error("cannot check id availability: {0}")]
    Store(#[from] StoreError),
}

/// Random identifier generator
#[derive(Debug, Clone, Copy)]
pub struct IdGenerator {
    length: usize,
    alphabet: IdAlphabet,
}

impl IdGenerator {
    pub const fn new(length: usize, alphabet: IdAlphabet) -> Self {
        Self { length, alphabet }
    }

    pub const fn length(&self) -> usize {
        self.length
    }

    /// Number of distinct identifiers this generator can produce
    pub fn space_size(&self) -> u128 {
        let base = self.alphabet.chars().len() as u128;
        u32::try_from(self.length).map_or(u128::MAX, |exp| {
            base.checked_pow(exp).unwrap_or(u128::MAX)
        })
    }

    /// Draw one candidate and make sure nothing is stored under it yet
    ///
    /// A taken candidate is a hard failure; callers decide whether to draw again.
    pub fn generate(&self, store: &dyn SnippetStore) -> Result<SnippetId, GenerationError> {
        self.generate_with(&mut rand::thread_rng(), store)
    }

    pub fn generate_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        store: &dyn SnippetStore,
    ) -> Result<SnippetId, GenerationError> {
        let candidate = SnippetId(self.draw(rng));
        if store.exists(&candidate)? {
            return Err(GenerationError::Collision(candidate.0));
        }
        Ok(candidate)
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let chars = self.alphabet.chars();
        (0..self.length)
            .map(|_| char::from(chars[rng.gen_range(0..chars.len())]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FileStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    #[test]
    fn test_parse_accepts_alphanumeric() {
        assert_eq!(SnippetId::parse("abcXYZ09").unwrap().as_str(), "abcXYZ09");
    }

    #[test]
    fn test_parse_rejects_unsafe() {
        for raw in ["", "../etc", "a/b", "has space", "dot.txt", "é"] {
            assert!(SnippetId::parse(raw).is_err(), "accepted {raw:?}");
        }
        assert!(SnippetId::parse(&"a".repeat(MAX_ID_LEN + 1)).is_err());
        assert!(SnippetId::parse(&"a".repeat(MAX_ID_LEN)).is_ok());
    }

    #[test]
    fn test_generated_shape() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path()).unwrap();

        let lower = IdGenerator::new(6, IdAlphabet::Lowercase);
        for _ in 0..100 {
            let id = lower.generate(&store).unwrap();
            assert_eq!(id.as_str().len(), 6);
            assert!(id.as_str().bytes().all(|b| b.is_ascii_lowercase()));
        }

        let letters = IdGenerator::new(10, IdAlphabet::Letters);
        let id = letters.generate(&store).unwrap();
        assert_eq!(id.as_str().len(), 10);
        assert!(id.as_str().bytes().all(|b| b.is_ascii_alphabetic()));
    }

    #[test]
    fn test_space_size() {
        assert_eq!(
            IdGenerator::new(6, IdAlphabet::Lowercase).space_size(),
            308_915_776
        );
        assert_eq!(IdGenerator::new(2, IdAlphabet::Letters).space_size(), 2704);
    }

    #[test]
    fn test_taken_candidate_fails_fast() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path()).unwrap();
        for c in LOWERCASE {
            let id = SnippetId::parse(&char::from(*c).to_string()).unwrap();
            store.save(&id, "taken").unwrap();
        }

        let generator = IdGenerator::new(1, IdAlphabet::Lowercase);
        let result = generator.generate(&store);
        assert!(matches!(result, Err(GenerationError::Collision(_))));
    }

    #[test]
    fn test_never_returns_stored_id() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path()).unwrap();
        // leave only 'q' free
        for c in LOWERCASE.iter().filter(|c| **c != b'q') {
            let id = SnippetId::parse(&char::from(*c).to_string()).unwrap();
            store.save(&id, "taken").unwrap();
        }

        let generator = IdGenerator::new(1, IdAlphabet::Lowercase);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            if let Ok(id) = generator.generate_with(&mut rng, &store) {
                assert_eq!(id.as_str(), "q");
            }
        }
    }
}
