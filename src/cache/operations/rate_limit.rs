use crate::cache::keys::rate_limit_key;
use crate::cache::models::rate_limit::CachedRateLimit;
use crate::cache::store::{KeyValueStore, StoreError};

/// 速率限制缓存操作
pub struct RateLimitCacheOperations;

impl RateLimitCacheOperations {
    /// 获取窗口内已放行的请求数
    pub async fn get_count(
        store: &dyn KeyValueStore,
        client: &str,
        window_start_ms: i64,
    ) -> Result<u32, StoreError> {
        let key = rate_limit_key(client, window_start_ms);
        match store.get(&key).await? {
            Some(json) => {
                let cached: CachedRateLimit = serde_json::from_str(&json)?;
                Ok(cached.count)
            }
            None => Ok(0),
        }
    }

    /// 写入窗口计数，过期时间为窗口剩余时长
    pub async fn set_count(
        store: &dyn KeyValueStore,
        client: &str,
        window_start_ms: i64,
        count: u32,
        reset_at_ms: i64,
        ttl_secs: u64,
    ) -> Result<(), StoreError> {
        let key = rate_limit_key(client, window_start_ms);
        let cached = CachedRateLimit {
            key: key.clone(),
            count,
            reset_at: reset_at_ms,
        };
        let json = serde_json::to_string(&cached)?;
        store.put(&key, &json, ttl_secs).await
    }
}
