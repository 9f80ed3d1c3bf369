// 数据库模块
// 包含用户实体定义和存储实现

pub mod models;
pub mod repositories;

use sqlx::PgPool;

pub use models::user::{NewUser, UserEntity, UserPatch};
pub use repositories::user::{PgUserStore, UserStore};

/// 存储层错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// 启动时确保 users 表存在
pub async fn bootstrap(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            name TEXT,
            email TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("users table ready");
    Ok(())
}
