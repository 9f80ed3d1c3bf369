// 缓存模块
// 包含缓存接口、键生成和 Redis 实现

pub mod keys;
pub mod redis_cache;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

pub use keys::{ALL_USERS_KEY, user_key};
pub use redis_cache::RedisCache;

/// 缓存层错误
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("serialization error: {0}")]
    Serialization(serde_json::Error),
    #[error("unexpected value under key {key}: {source}")]
    Deserialization {
        key: String,
        source: serde_json::Error,
    },
}

/// 键值缓存接口，值以 JSON 字符串保存
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_raw(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// 返回键是否存在并被删除
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;
}

/// 带类型的读写
#[async_trait]
pub trait CacheStoreExt: CacheStore {
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.get_raw(key).await? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|source| CacheError::Deserialization {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let json = serde_json::to_string(value).map_err(CacheError::Serialization)?;
        self.set_raw(key, &json).await
    }
}

impl<C: CacheStore + ?Sized> CacheStoreExt for C {}
