//! Persistence contract.
//!
//! An opaque async key/value space plus append-only record tables
//! (projects, generated content, analytics). Nothing here depends on a
//! concrete schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;

/// One appended record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub table: String,
    pub created_at: DateTime<Utc>,
    pub body: Value,
}

impl Record {
    /// New record with a fresh id and the current timestamp.
    pub fn new(table: impl Into<String>, body: Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            table: table.into(),
            created_at: Utc::now(),
            body,
        }
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn put(&self, key: &str, value: Value) -> Result<(), StoreError>;

    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Append to a table. Records are never updated in place.
    async fn append(&self, record: Record) -> Result<(), StoreError>;

    /// All records of `table` in insertion order.
    async fn records(&self, table: &str) -> Result<Vec<Record>, StoreError>;
}
