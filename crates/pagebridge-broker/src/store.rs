//! In-memory record store.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use pagebridge_protocols::{Record, RecordStore, StoreError};

/// Record store that lives as long as the process.
pub struct MemoryStore {
    values: RwLock<HashMap<String, Value>>,
    records: RwLock<Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            records: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn put(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn append(&self, record: Record) -> Result<(), StoreError> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn records(&self, table: &str) -> Result<Vec<Record>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| r.table == table).cloned().collect())
    }
}
