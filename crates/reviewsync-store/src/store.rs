use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::StoreError;

/// A record as returned by the store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoredRecord {
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(rename = "createdTime", default)]
    pub created_time: Option<String>,
}

/// A tabular store that can create records and query them by field equality.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record whose fields equal all `(field, value)` pairs.
    async fn find_matching(&self, filter: &[(&str, &str)])
        -> Result<Vec<StoredRecord>, StoreError>;

    async fn create(&self, fields: Map<String, Value>) -> Result<StoredRecord, StoreError>;

    /// Whether at least one record matches. Implementations may override
    /// this to stop after the first hit.
    async fn contains(&self, filter: &[(&str, &str)]) -> Result<bool, StoreError> {
        Ok(!self.find_matching(filter).await?.is_empty())
    }
}
