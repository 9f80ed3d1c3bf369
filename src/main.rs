use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use sqlx::Executor;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user_cache_backend::{
    AppState,
    cache::{CacheStore, RedisCache},
    config::Config,
    database::{self, PgUserStore},
    resilience::{CircuitBreaker, CircuitBreakerConfig},
    router::create_router,
    service::UserCacheService,
    worker::{self, CacheRefresher, RefreshPoolConfig},
};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");
    if config.refill_without_ttl() {
        tracing::warn!(
            "CACHE_ASYNC_REFILL is enabled without CACHE_TTL_SECS; a late refill can keep a stale user cached until its next write"
        );
    }

    // 设置数据库连接池
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET application_name = 'user_cache_backend';")
                    .await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");

    database::bootstrap(&pool)
        .await
        .expect("Failed to prepare users table");

    // 设置 Redis 客户端
    let redis_client =
        redis::Client::open(config.redis_url.clone()).expect("Failed to create Redis client");
    let cache: Arc<dyn CacheStore> =
        Arc::new(RedisCache::new(Arc::new(redis_client), config.cache_ttl()));

    // 组装服务
    let mut service = UserCacheService::new(Arc::new(PgUserStore::new(pool)), cache.clone());
    let mut refresh_pool = None;
    if config.cache_async_refill {
        let (refresher, handle) = CacheRefresher::spawn(
            cache,
            RefreshPoolConfig {
                max_workers: config.cache_refresh_max_workers,
                queue_capacity: config.cache_refresh_queue_capacity,
            },
        );
        service = service.with_refresher(refresher);
        refresh_pool = Some(handle);
    }

    let state = AppState {
        service: Arc::new(service),
        breaker: Arc::new(CircuitBreaker::new(
            "default",
            CircuitBreakerConfig {
                failure_threshold: config.circuit_failure_threshold,
                open_wait: config.circuit_open_wait(),
            },
        )),
    };

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    let app = create_router(state);

    // 启动服务器
    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app,
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Failed to start server");

    // 路由被释放后刷新池的发送端全部关闭，等待剩余任务写完
    if let Some(handle) = refresh_pool {
        worker::wait_for_shutdown(handle).await;
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
