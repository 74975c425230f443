use async_trait::async_trait;
use burrow_core::repository::{ReadRepository, Repository, Result};
use burrow_core::{ShortCode, ShortCodeRecord, StorageError};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::Timestamp;

/// In-memory implementation of the repository contract using DashMap.
///
/// DashMap shards its locks, so inserts for different codes proceed in
/// parallel and the check-and-insert for one code happens under that code's
/// shard lock only.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    records: DashMap<ShortCode, ShortCodeRecord>,
    /// long URL -> earliest `(created_at, code)` stored for it
    by_long_url: DashMap<String, (Timestamp, ShortCode)>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: DashMap::with_capacity(capacity),
            by_long_url: DashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<ShortCodeRecord>> {
        Ok(self.records.get(code).map(|entry| entry.value().clone()))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.records.contains_key(code))
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortCodeRecord>> {
        // Release the index guard before touching `records`.
        let Some(code) = self.by_long_url.get(long_url).map(|e| e.value().1.clone()) else {
            return Ok(None);
        };

        self.get(&code).await
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert_if_absent(&self, record: ShortCodeRecord) -> Result<ShortCodeRecord> {
        match self.records.entry(record.code.clone()) {
            Entry::Occupied(_) => return Err(StorageError::Conflict(record.code.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
            }
        }

        // Inserts can reach the index out of creation order.
        let key = (record.created_at, record.code.clone());
        self.by_long_url
            .entry(record.long_url.clone())
            .and_modify(|earliest| {
                if key < *earliest {
                    *earliest = key.clone();
                }
            })
            .or_insert_with(|| key.clone());

        Ok(record)
    }
}
