//! Feedback store persisting chosen answers as one JSON array on disk
//!
//! Every append rewrites the whole file. Writes are serialized by a mutex and
//! go through a temp file plus rename, so a reader never sees a partial array.

use parking_lot::Mutex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::FeedbackEntry;

/// JSON-file backed feedback log
pub struct FeedbackStore {
    storage_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FeedbackStore {
    /// Create a store backed by `storage_path`; the file is created on first append
    pub fn new(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: storage_path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    /// Load all entries in submission order; a missing file yields none
    pub fn load(&self) -> Result<Vec<FeedbackEntry>> {
        if !self.storage_path.exists() {
            return Ok(Vec::new());
        }

        let data = fs::read_to_string(&self.storage_path)?;
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }

        let entries: Vec<FeedbackEntry> = serde_json::from_str(&data)?;
        tracing::debug!(
            "Loaded {} feedback entries from {}",
            entries.len(),
            self.storage_path.display()
        );
        Ok(entries)
    }

    /// Append one entry, rewriting the file with the full collection
    pub fn append(&self, entry: FeedbackEntry) -> Result<()> {
        let _guard = self.write_lock.lock();

        let mut entries = self.load()?;
        entries.push(entry);
        self.save(&entries)?;

        tracing::info!(
            "Saved feedback ({} entries total) to {}",
            entries.len(),
            self.storage_path.display()
        );
        Ok(())
    }

    fn save(&self, entries: &[FeedbackEntry]) -> Result<()> {
        let data = serde_json::to_string_pretty(entries)?;

        let dir = match self.storage_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(data.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.storage_path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FeedbackStore::new(dir.path().join("feedback.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_reload_preserves_submission_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.json");

        let store = FeedbackStore::new(&path);
        for i in 0..4 {
            store
                .append(FeedbackEntry::new(format!("q{}", i), format!("a{}", i)))
                .unwrap();
        }

        // Fresh instance, as after a restart
        let reloaded = FeedbackStore::new(&path).load().unwrap();
        assert_eq!(reloaded.len(), 4);
        for (i, entry) in reloaded.iter().enumerate() {
            assert_eq!(entry, &FeedbackEntry::new(format!("q{}", i), format!("a{}", i)));
        }
    }

    #[test]
    fn test_file_is_plain_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.json");
        let store = FeedbackStore::new(&path);
        store.append(FeedbackEntry::new("How?", "Like this.")).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!([{ "question": "How?", "chosen_answer": "Like this." }])
        );
    }

    #[test]
    fn test_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data").join("feedback.json");
        let store = FeedbackStore::new(&path);
        store.append(FeedbackEntry::new("q", "a")).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.json");
        fs::write(&path, "{not json").unwrap();
        assert!(FeedbackStore::new(&path).load().is_err());
    }

    #[test]
    fn test_concurrent_appends_keep_every_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FeedbackStore::new(dir.path().join("feedback.json")));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .append(FeedbackEntry::new(format!("q{}", i), "a"))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.load().unwrap().len(), 8);
    }
}
