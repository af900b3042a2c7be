//! Book storage.
//!
//! `BookStore` is the whole storage contract: scan everything, or upsert one
//! record by id. `InMemoryBookStore` keeps records in a shared map, so
//! clones see the same data.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;
use uuid::Uuid;

use crate::model::BookRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store lock poisoned")]
    Poisoned,

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Key-value store of books keyed by id.
pub trait BookStore: Send + Sync {
    /// Every stored record.
    fn scan_all(&self) -> Result<Vec<BookRecord>, StoreError>;

    /// Insert `record`, replacing any record with the same id.
    fn put(&self, record: BookRecord) -> Result<(), StoreError>;
}

pub type Db = Arc<RwLock<HashMap<Uuid, BookRecord>>>;

#[derive(Debug, Clone, Default)]
pub struct InMemoryBookStore {
    db: Db,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.db.read().map(|books| books.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BookStore for InMemoryBookStore {
    /// Records sorted by title, then id, so listings are stable.
    fn scan_all(&self) -> Result<Vec<BookRecord>, StoreError> {
        let books = self.db.read().map_err(|_| StoreError::Poisoned)?;
        let mut all: Vec<BookRecord> = books.values().cloned().collect();
        all.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    fn put(&self, record: BookRecord) -> Result<(), StoreError> {
        self.db
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .insert(record.id, record);
        Ok(())
    }
}
