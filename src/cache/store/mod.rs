//! 键值存储
//! 限流计数和接口缓存共用的后端抽象

mod memory_store;
mod redis_store;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::CacheBackend;

pub use self::memory_store::MemoryStore;
pub use self::redis_store::RedisStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// 带过期时间的键值存储
///
/// 读后写不保证原子性，并发请求下限流计数允许少量误差。
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// 写入并设置过期时间，`ttl_secs` 为 0 时按 1 秒处理
    async fn put(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), StoreError>;
}

/// 按配置创建存储后端，Redis 地址无效时降级为无存储
pub fn store_from_config(backend: &CacheBackend) -> Option<Arc<dyn KeyValueStore>> {
    match backend {
        CacheBackend::Redis(url) => match RedisStore::open(url) {
            Ok(store) => {
                tracing::info!("Using Redis for cache and rate limiting");
                Some(Arc::new(store))
            }
            Err(e) => {
                tracing::warn!("Invalid Redis URL, running without cache: {}", e);
                None
            }
        },
        CacheBackend::Memory => {
            tracing::info!("Using in-process store for cache and rate limiting");
            Some(Arc::new(MemoryStore::new()))
        }
        CacheBackend::None => {
            tracing::warn!("No store configured, caching and rate limiting are disabled");
            None
        }
    }
}
