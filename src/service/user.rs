use std::sync::Arc;

use crate::cache::{ALL_USERS_KEY, CacheError, CacheStore, CacheStoreExt, user_key};
use crate::database::{NewUser, UserEntity, UserPatch, UserStore};
use crate::error::ServiceError;
use crate::worker::CacheRefresher;

/// 用户数据访问入口，负责缓存与数据库的一致性
///
/// 读走 cache-aside：先查缓存，未命中再查库并回填。
/// 写先落库，成功后更新单个用户缓存并删除全部用户列表缓存。
/// 落库成功之后的缓存失败只记录日志，不影响返回结果。
pub struct UserCacheService {
    store: Arc<dyn UserStore>,
    cache: Arc<dyn CacheStore>,
    refresher: Option<CacheRefresher>,
}

impl UserCacheService {
    pub fn new(store: Arc<dyn UserStore>, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            cache,
            refresher: None,
        }
    }

    /// 读未命中后的缓存回填交给异步刷新池
    pub fn with_refresher(mut self, refresher: CacheRefresher) -> Self {
        self.refresher = Some(refresher);
        self
    }

    pub async fn create(&self, user: NewUser) -> Result<UserEntity, ServiceError> {
        tracing::info!("Saving user: {:?}", user);
        let saved = self.store.save(user).await.inspect_err(|e| {
            tracing::error!("Error while saving user: {}", e);
        })?;

        self.write_user_cache(&saved).await;
        self.invalidate_all_users().await;
        Ok(saved)
    }

    /// 不存在时返回 `Ok(None)`
    pub async fn get_by_id(&self, id: i64) -> Result<Option<UserEntity>, ServiceError> {
        let key = user_key(id);

        if let Some(user) = self.read_cache::<UserEntity>(&key).await {
            tracing::info!("User found in cache for ID: {}", id);
            return Ok(Some(user));
        }

        tracing::info!("Fetching user from database for ID: {}", id);
        let user = self.store.find_by_id(id).await.inspect_err(|e| {
            tracing::error!("Error while fetching user by ID {}: {}", id, e);
        })?;

        if let Some(ref u) = user {
            match &self.refresher {
                Some(refresher) => {
                    refresher.submit(u.clone());
                }
                None => self.write_user_cache(u).await,
            }
        }

        Ok(user)
    }

    pub async fn get_all(&self) -> Result<Vec<UserEntity>, ServiceError> {
        tracing::info!("Fetching all users");

        if let Some(users) = self.read_cache::<Vec<UserEntity>>(ALL_USERS_KEY).await {
            tracing::info!("All users found in cache");
            return Ok(users);
        }

        let users = self.store.find_all().await.inspect_err(|e| {
            tracing::error!("Error while fetching all users: {}", e);
        })?;

        if let Err(e) = self.cache.set(ALL_USERS_KEY, &users).await {
            tracing::warn!("Failed to cache all users: {}", e);
        }
        tracing::info!("Fetched {} users from database", users.len());

        Ok(users)
    }

    pub async fn update(&self, id: i64, patch: UserPatch) -> Result<UserEntity, ServiceError> {
        // 直接查库，不走缓存
        let existing = self
            .store
            .find_by_id(id)
            .await
            .inspect_err(|e| tracing::error!("Error while loading user {} for update: {}", id, e))?
            .ok_or(ServiceError::NotFound(id))?;

        let updated = self
            .store
            .update(&existing.apply(patch))
            .await
            .inspect_err(|e| tracing::error!("Error while updating user {}: {}", id, e))?;

        self.write_user_cache(&updated).await;
        self.invalidate_all_users().await;
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let deleted = self
            .store
            .delete_by_id(id)
            .await
            .inspect_err(|e| tracing::error!("Error while deleting user {}: {}", id, e))?;
        if !deleted {
            return Err(ServiceError::NotFound(id));
        }

        let key = user_key(id);
        if let Err(e) = self.cache.delete(&key).await {
            tracing::error!("Error while removing {} from cache: {}", key, e);
        }
        self.invalidate_all_users().await;

        tracing::info!("User deleted with ID: {}", id);
        Ok(())
    }

    /// 删除全部用户列表缓存，失败只记日志
    pub async fn invalidate_all_users(&self) {
        match self.cache.delete(ALL_USERS_KEY).await {
            Ok(_) => tracing::info!("All users cache invalidated"),
            Err(e) => tracing::error!("Error while invalidating all users cache: {}", e),
        }
    }

    async fn write_user_cache(&self, user: &UserEntity) {
        let key = user_key(user.id);
        if let Err(e) = self.cache.set(&key, user).await {
            tracing::error!("Error while caching {}: {}", key, e);
        }
    }

    /// 读取失败或类型不符都按未命中处理
    async fn read_cache<T>(&self, key: &str) -> Option<T>
    where
        T: serde::de::DeserializeOwned + Send,
    {
        match self.cache.get::<T>(key).await {
            Ok(value) => value,
            Err(CacheError::Deserialization { key, source }) => {
                tracing::warn!("Ignoring malformed cache entry {}: {}", key, source);
                None
            }
            Err(e) => {
                tracing::warn!("Cache read failed for {}, falling back to database: {}", key, e);
                None
            }
        }
    }
}
