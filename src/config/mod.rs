use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub database_max_connections: u32,
    /// 0 表示缓存永不过期
    pub cache_ttl_secs: u64,
    /// 读未命中后异步回填缓存
    ///
    /// 排队中的回填可能在并发的更新或删除之后才写入，把旧记录重新放回缓存。
    /// 没有 TTL 时这条旧记录会一直留到下一次写操作，开启时应同时设置 `CACHE_TTL_SECS`。
    pub cache_async_refill: bool,
    pub cache_refresh_max_workers: usize,
    pub cache_refresh_queue_capacity: usize,
    pub circuit_failure_threshold: u32,
    pub circuit_open_wait_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key))
    }

    /// 通过任意键值来源构建配置，缺省项使用默认值
    pub fn from_lookup<F>(lookup: F) -> Result<Self, env::VarError>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let parse_or = |key: &str, default: &str| -> String {
            lookup(key)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Config {
            database_url: lookup("DATABASE_URL")?,
            redis_url: lookup("REDIS_URL")?,
            server_host: parse_or("SERVER_HOST", "::"),
            server_port: parse_number(&parse_or("SERVER_PORT", "8080"), 8080),
            database_max_connections: parse_number(&parse_or("DATABASE_MAX_CONNECTIONS", "10"), 10),
            cache_ttl_secs: parse_number(&parse_or("CACHE_TTL_SECS", "0"), 0),
            cache_async_refill: parse_flag(&parse_or("CACHE_ASYNC_REFILL", "false")),
            cache_refresh_max_workers: parse_number::<usize>(
                &parse_or("CACHE_REFRESH_MAX_WORKERS", "20"),
                20,
            )
            .max(1),
            cache_refresh_queue_capacity: parse_number::<usize>(
                &parse_or("CACHE_REFRESH_QUEUE_CAPACITY", "50"),
                50,
            )
            .max(1),
            circuit_failure_threshold: parse_number::<u32>(
                &parse_or("CIRCUIT_FAILURE_THRESHOLD", "5"),
                5,
            )
            .max(1),
            circuit_open_wait_secs: parse_number(&parse_or("CIRCUIT_OPEN_WAIT_SECS", "60"), 60),
        })
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        match self.cache_ttl_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn circuit_open_wait(&self) -> Duration {
        Duration::from_secs(self.circuit_open_wait_secs)
    }

    /// 异步回填开启但缓存永不过期，迟到的回填会让旧记录常驻缓存
    pub fn refill_without_ttl(&self) -> bool {
        self.cache_async_refill && self.cache_ttl().is_none()
    }
}

fn parse_number<T: FromStr>(raw: &str, default: T) -> T {
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!("Invalid numeric config value {:?}, using default", raw);
        default
    })
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
