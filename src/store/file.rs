//! Local filesystem store: one file per snippet, named by its id

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::error::{StoreError, StoreResult};
use super::SnippetStore;
use crate::snippet::SnippetId;

/// Directory-backed snippet store
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open the store at `root`, creating the directory if it does not exist
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the directory distinguishes `a` from `A` in file names
    ///
    /// Writes and removes a dotfile, which can never clash with an id.
    pub fn is_case_sensitive(&self) -> io::Result<bool> {
        let upper = self.root.join(".CaseCheck");
        let lower = self.root.join(".casecheck");
        fs::write(&upper, b"")?;
        let sensitive = !lower.try_exists()?;
        fs::remove_file(&upper)?;
        Ok(sensitive)
    }

    fn full_path(&self, id: &SnippetId) -> PathBuf {
        self.root.join(id.as_str())
    }
}

impl SnippetStore for FileStore {
    fn exists(&self, id: &SnippetId) -> StoreResult<bool> {
        self.full_path(id)
            .try_exists()
            .map_err(|e| StoreError::from_io(id.as_str(), e))
    }

    fn save(&self, id: &SnippetId, code: &str) -> StoreResult<()> {
        fs::write(self.full_path(id), code.as_bytes())
            .map_err(|e| StoreError::from_io(id.as_str(), e))
    }

    fn insert(&self, id: &SnippetId, code: &str) -> StoreResult<()> {
        let path = self.full_path(id);

        // create_new is atomic: of two racing inserts only one opens the file
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| StoreError::from_io(id.as_str(), e))?;

        if let Err(e) = file.write_all(code.as_bytes()).and_then(|()| file.flush()) {
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(StoreError::Io {
                id: id.to_string(),
                source: e,
            });
        }
        Ok(())
    }

    fn get(&self, id: &SnippetId) -> StoreResult<String> {
        let data = fs::read(self.full_path(id)).map_err(|e| StoreError::from_io(id.as_str(), e))?;
        String::from_utf8(data).map_err(|_| StoreError::Corrupt(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use tempfile::TempDir;

    fn id(s: &str) -> SnippetId {
        SnippetId::parse(s).unwrap()
    }

    #[test]
    fn test_case_check_leaves_no_trace() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path()).unwrap();

        let sensitive = store.is_case_sensitive().unwrap();
        if cfg!(target_os = "linux") {
            assert!(sensitive);
        }
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_open_creates_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("storage");
        let store = FileStore::open(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(store.root(), dir.as_path());
    }

    #[test]
    fn test_save_get_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path()).unwrap();

        let code = "fn main() {\n    println!(\"héllo\");\n}\n";
        store.save(&id("abcdef"), code).unwrap();
        assert_eq!(store.get(&id("abcdef")).unwrap(), code);
    }

    #[test]
    fn test_raw_file_layout() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path()).unwrap();

        store.insert(&id("qwerty"), "Hello world").unwrap();
        let raw = fs::read(temp.path().join("qwerty")).unwrap();
        assert_eq!(raw, b"Hello world");
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path()).unwrap();

        let result = store.get(&id("nothere"));
        assert!(matches!(result, Err(StoreError::NotFound(ref s)) if s == "nothere"));
    }

    #[test]
    fn test_exists_is_stable() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path()).unwrap();

        assert!(!store.exists(&id("abcdef")).unwrap());
        assert!(!store.exists(&id("abcdef")).unwrap());
        assert!(!temp.path().join("abcdef").exists());

        store.save(&id("abcdef"), "x").unwrap();
        assert!(store.exists(&id("abcdef")).unwrap());
        assert!(store.exists(&id("abcdef")).unwrap());
    }

    #[test]
    fn test_save_overwrites() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path()).unwrap();

        store.save(&id("abcdef"), "first").unwrap();
        store.save(&id("abcdef"), "second").unwrap();
        assert_eq!(store.get(&id("abcdef")).unwrap(), "second");
    }

    #[test]
    fn test_insert_refuses_existing() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path()).unwrap();

        store.insert(&id("abcdef"), "first").unwrap();
        let result = store.insert(&id("abcdef"), "second");
        assert!(matches!(result, Err(StoreError::AlreadyExists(_))));
        assert_eq!(store.get(&id("abcdef")).unwrap(), "first");
    }

    #[test]
    fn test_concurrent_insert_single_winner() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(FileStore::open(temp.path()).unwrap());
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    store.insert(&id("racing"), &format!("writer {i}")).is_ok()
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(winners, 1);
        assert!(store.get(&id("racing")).unwrap().starts_with("writer "));
    }

    #[test]
    fn test_non_utf8_is_corrupt() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path()).unwrap();

        fs::write(temp.path().join("broken"), [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(
            store.get(&id("broken")),
            Err(StoreError::Corrupt(_))
        ));
    }
}
