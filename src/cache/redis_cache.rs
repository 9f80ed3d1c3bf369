use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};

use super::{CacheError, CacheStore};

/// Redis 缓存实现
#[derive(Clone)]
pub struct RedisCache {
    client: Arc<RedisClient>,
    ttl: Option<Duration>,
}

impl RedisCache {
    /// `ttl` 为空时写入的键不过期
    pub fn new(client: Arc<RedisClient>, ttl: Option<Duration>) -> Self {
        Self { client, ttl }
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;

        match &value {
            Some(_) => tracing::debug!("Cache hit: {}", key),
            None => tracing::debug!("Cache miss: {}", key),
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        match self.ttl {
            Some(ttl) => {
                let _: () = conn.set_ex(key, value, ttl.as_secs().max(1)).await?;
            }
            None => {
                let _: () = conn.set(key, value).await?;
            }
        }

        tracing::debug!("Set cache: {}", key);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let deleted: i64 = conn.del(key).await?;

        tracing::debug!("Deleted cache {}: {}", key, deleted > 0);
        Ok(deleted > 0)
    }
}
