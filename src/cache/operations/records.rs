use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};

use crate::cache::models::records::CachedRecords;
use crate::cache::store::{KeyValueStore, StoreError};

/// 资源列表缓存操作
pub struct RecordCacheOperations;

impl RecordCacheOperations {
    /// 读取缓存的资源列表
    pub async fn get_records<T: DeserializeOwned>(
        store: &dyn KeyValueStore,
        key: &str,
    ) -> Result<Option<CachedRecords<Vec<T>>>, StoreError> {
        match store.get(key).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// 覆盖写入资源列表
    pub async fn set_records<T: Serialize>(
        store: &dyn KeyValueStore,
        key: &str,
        records: &[T],
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let cached = CachedRecords {
            records,
            stored_at: chrono::Utc::now().timestamp(),
        };
        let json = serde_json::to_string(&cached)?;
        store.put(key, &json, ttl.as_secs()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::MemoryStore;

    #[tokio::test]
    async fn records_survive_a_store_round_trip() {
        let store = MemoryStore::new();
        let records = vec!["a".to_string(), "b".to_string()];
        RecordCacheOperations::set_records(&store, "k", &records, Duration::from_secs(60))
            .await
            .unwrap();

        let cached = RecordCacheOperations::get_records::<String>(&store, "k")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cached.records, records);
        assert!(cached.stored_at > 0);
    }

    #[tokio::test]
    async fn corrupt_entry_is_an_error() {
        let store = MemoryStore::new();
        store.put("k", "not json", 60).await.unwrap();
        assert!(
            RecordCacheOperations::get_records::<String>(&store, "k")
                .await
                .is_err()
        );
    }
}
