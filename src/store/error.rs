//! Store errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Snippet store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snippet '{0}' not found")]
    NotFound(String),

    #[error("snippet '{0}' already exists")]
    AlreadyExists(String),

    #[error("snippet '{0}' is not valid UTF-8")]
    Corrupt(String),

    #[error("I/O error on snippet '{id}': {source}")]
    Io {
        id: String,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Map an I/O error on `id`, keeping "not found" and "already exists" distinct
    pub fn from_io(id: &str, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(id.to_string()),
            std::io::ErrorKind::AlreadyExists => Self::AlreadyExists(id.to_string()),
            _ => Self::Io {
                id: id.to_string(),
                source: err,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_from_io_kinds() {
        assert!(matches!(
            StoreError::from_io("abc", Error::from(ErrorKind::NotFound)),
            StoreError::NotFound(id) if id == "abc"
        ));
        assert!(matches!(
            StoreError::from_io("abc", Error::from(ErrorKind::AlreadyExists)),
            StoreError::AlreadyExists(_)
        ));
        assert!(matches!(
            StoreError::from_io("abc", Error::from(ErrorKind::PermissionDenied)),
            StoreError::Io { .. }
        ));
    }
}
