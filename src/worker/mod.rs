//! 异步缓存刷新
//!
//! 有界队列加信号量限流的工作池。调用方提交后立即返回，
//! 队列已满或写缓存失败都只记录日志。

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinHandle;

use crate::cache::{CacheStore, CacheStoreExt, user_key};
use crate::database::UserEntity;

#[derive(Debug, Clone)]
pub struct RefreshPoolConfig {
    /// 同时执行的刷新任务上限
    pub max_workers: usize,
    /// 等待队列长度
    pub queue_capacity: usize,
}

impl Default for RefreshPoolConfig {
    fn default() -> Self {
        Self {
            max_workers: 20,
            queue_capacity: 50,
        }
    }
}

/// 把用户记录异步写入缓存
#[derive(Clone)]
pub struct CacheRefresher {
    sender: mpsc::Sender<UserEntity>,
}

impl CacheRefresher {
    /// 启动调度任务，返回提交句柄和调度任务句柄
    ///
    /// 所有 `CacheRefresher` 克隆都被丢弃后，调度任务在排空队列后退出。
    pub fn spawn(cache: Arc<dyn CacheStore>, config: RefreshPoolConfig) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let permits = Arc::new(Semaphore::new(config.max_workers.max(1)));

        let handle = tokio::spawn(dispatch(receiver, cache, permits));
        tracing::info!(
            max_workers = config.max_workers,
            queue_capacity = config.queue_capacity,
            "Cache refresh pool started"
        );

        (Self { sender }, handle)
    }

    /// 提交刷新任务，不阻塞也不返回错误；返回是否入队成功
    pub fn submit(&self, user: UserEntity) -> bool {
        let id = user.id;
        match self.sender.try_send(user) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!("Cache refresh queue full, dropping refresh for user {}", id);
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::warn!("Cache refresh pool closed, dropping refresh for user {}", id);
                false
            }
        }
    }
}

/// 等待调度任务退出，任务 panic 时记录错误而不是静默丢弃
pub async fn wait_for_shutdown(handle: JoinHandle<()>) {
    if let Err(e) = handle.await {
        tracing::error!("Cache refresh pool terminated abnormally: {}", e);
    }
}

async fn dispatch(
    mut receiver: mpsc::Receiver<UserEntity>,
    cache: Arc<dyn CacheStore>,
    permits: Arc<Semaphore>,
) {
    let mut running = Vec::new();

    while let Some(user) = receiver.recv().await {
        let permit = match permits.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break,
        };
        let cache = cache.clone();

        running.retain(|h: &JoinHandle<()>| !h.is_finished());
        running.push(tokio::spawn(async move {
            let _permit = permit;
            let key = user_key(user.id);
            match cache.set(&key, &user).await {
                Ok(()) => tracing::debug!("Refreshed cache entry {}", key),
                Err(e) => tracing::warn!("Async cache refresh failed for {}: {}", key, e),
            }
        }));
    }

    for handle in running {
        if let Err(e) = handle.await {
            tracing::error!("Cache refresh job failed: {}", e);
        }
    }
    tracing::info!("Cache refresh pool stopped");
}
