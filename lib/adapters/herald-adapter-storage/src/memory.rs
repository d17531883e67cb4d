use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use herald_domain::{DeploymentId, EpochSeconds, StoreError};
use herald_ports::DurationStore;

use crate::decode_timestamp;

/// Non-persistent store with the same contract as the file store.
#[derive(Debug, Default)]
pub struct MemoryDurationStore {
    records: RwLock<HashMap<String, Value>>,
}

impl MemoryDurationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a raw JSON value, bypassing timestamp encoding.
    pub fn insert_raw(&self, key: impl Into<String>, value: Value) {
        self.records
            .write()
            .expect("duration records lock poisoned")
            .insert(key.into(), value);
    }

    pub fn contains(&self, id: &DeploymentId) -> bool {
        self.records
            .read()
            .expect("duration records lock poisoned")
            .contains_key(id.as_str())
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .expect("duration records lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DurationStore for MemoryDurationStore {
    async fn put(&self, id: &DeploymentId, started_at: EpochSeconds) -> Result<(), StoreError> {
        self.insert_raw(id.as_str(), Value::from(started_at));
        Ok(())
    }

    async fn get(&self, id: &DeploymentId) -> Result<Option<EpochSeconds>, StoreError> {
        let records = self.records.read().expect("duration records lock poisoned");
        records
            .get(id.as_str())
            .map(|value| decode_timestamp(id.as_str(), value))
            .transpose()
    }

    async fn delete(&self, id: &DeploymentId) -> Result<(), StoreError> {
        self.records
            .write()
            .expect("duration records lock poisoned")
            .remove(id.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryDurationStore::new();
        let id = DeploymentId::from(5u64);

        store.put(&id, 12.75).await.unwrap();
        assert_eq!(store.get(&id).await.unwrap(), Some(12.75));
        assert!(store.contains(&id));

        store.delete(&id).await.unwrap();
        store.delete(&id).await.unwrap();
        assert_eq!(store.get(&id).await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_corrupt_value() {
        let store = MemoryDurationStore::new();
        store.insert_raw("9", serde_json::json!({ "started": "noon" }));
        let err = store.get(&DeploymentId::from("9")).await.unwrap_err();
        assert!(err.is_corrupt());
    }
}
