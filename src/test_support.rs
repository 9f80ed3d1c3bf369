//! 测试用的内存存储和内存缓存，记录调用次数并可注入故障

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::cache::{CacheError, CacheStore};
use crate::database::{NewUser, StoreError, UserEntity, UserStore};

fn injected_cache_failure() -> CacheError {
    CacheError::Redis(redis::RedisError::from((
        redis::ErrorKind::IoError,
        "injected cache failure",
    )))
}

#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
    get_calls: AtomicUsize,
    set_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// 写入和删除次数之和
    pub fn mutations(&self) -> usize {
        self.set_calls() + self.delete_calls()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(injected_cache_failure());
        }
        Ok(self.raw(key))
    }

    async fn set_raw(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(injected_cache_failure());
        }
        self.insert_raw(key, value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(injected_cache_failure());
        }
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }
}

pub struct MemoryUserStore {
    rows: Mutex<BTreeMap<i64, UserEntity>>,
    next_id: AtomicI64,
    save_calls: AtomicUsize,
    find_by_id_calls: AtomicUsize,
    find_all_calls: AtomicUsize,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    fail: AtomicBool,
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            save_calls: AtomicUsize::new(0),
            find_by_id_calls: AtomicUsize::new(0),
            find_all_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<UserEntity>) -> Self {
        let store = Self::new();
        for user in users {
            store.put(user);
        }
        store
    }

    /// 直接写入一条已存在的行，不计入调用次数
    ///
    /// 视为此前由存储分配过的 id，所以会推进 id 计数。
    pub fn put(&self, user: UserEntity) {
        self.next_id.fetch_max(user.id + 1, Ordering::SeqCst);
        self.rows.lock().unwrap().insert(user.id, user);
    }

    pub fn row(&self, id: i64) -> Option<UserEntity> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn find_by_id_calls(&self) -> usize {
        self.find_by_id_calls.load(Ordering::SeqCst)
    }

    pub fn find_all_calls(&self) -> usize {
        self.find_all_calls.load(Ordering::SeqCst)
    }

    /// save、update、delete 调用次数之和
    pub fn writes(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
            + self.update_calls.load(Ordering::SeqCst)
            + self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn save(&self, user: NewUser) -> Result<UserEntity, StoreError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        // 和序列一样：只有已存在的 id 会被沿用
        let id = match user.id {
            Some(id) if rows.contains_key(&id) => id,
            _ => self.next_id.fetch_add(1, Ordering::SeqCst),
        };
        let saved = UserEntity {
            id,
            name: user.name,
            email: user.email,
        };
        rows.insert(id, saved.clone());
        Ok(saved)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserEntity>, StoreError> {
        self.find_by_id_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.row(id))
    }

    async fn find_all(&self) -> Result<Vec<UserEntity>, StoreError> {
        self.find_all_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn update(&self, user: &UserEntity) -> Result<UserEntity, StoreError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&user.id) {
            Some(row) => {
                *row = user.clone();
                Ok(row.clone())
            }
            None => Err(StoreError::Database(sqlx::Error::RowNotFound)),
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, StoreError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }
}
