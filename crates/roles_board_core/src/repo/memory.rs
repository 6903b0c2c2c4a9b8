//! In-process blob store.
//!
//! Backs tests and ephemeral boards. Write failures can be injected to
//! exercise degraded-mode handling without a real storage device.

use crate::repo::blob_repo::{BlobStore, PersistenceError, RepoResult};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RefCell<HashMap<String, String>>,
    write_failure: RefCell<Option<String>>,
    writes: Cell<usize>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `value` under `key`.
    pub fn with_blob(key: &str, value: impl Into<String>) -> Self {
        let store = Self::new();
        store
            .blobs
            .borrow_mut()
            .insert(key.to_string(), value.into());
        store
    }

    /// Makes every following write fail with `reason`; `None` restores writes.
    pub fn set_write_failure(&self, reason: Option<&str>) {
        *self.write_failure.borrow_mut() = reason.map(str::to_string);
    }

    /// Returns the stored value for `key`, bypassing the trait.
    pub fn blob(&self, key: &str) -> Option<String> {
        self.blobs.borrow().get(key).cloned()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl BlobStore for MemoryBlobStore {
    fn read_blob(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.blob(key))
    }

    fn write_blob(&self, key: &str, value: &str) -> RepoResult<()> {
        if let Some(reason) = self.write_failure.borrow().as_ref() {
            return Err(PersistenceError::Rejected(reason.clone()));
        }
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
