use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};

use super::{KeyValueStore, StoreError};

/// Redis 存储，多实例部署时共享计数和缓存
#[derive(Clone)]
pub struct RedisStore {
    client: RedisClient,
}

impl RedisStore {
    pub fn open(redis_url: &str) -> Result<Self, StoreError> {
        Ok(Self {
            client: RedisClient::open(redis_url)?,
        })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(key, value, ttl_secs.max(1)).await?;
        Ok(())
    }
}
