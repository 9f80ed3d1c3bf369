use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::StoreError;
use crate::database::models::user::{NewUser, UserEntity};

/// 用户存储接口
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 写入用户；带 id 且该行存在时覆盖，否则新建并由存储分配 id
    async fn save(&self, user: NewUser) -> Result<UserEntity, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<UserEntity>, StoreError>;

    async fn find_all(&self) -> Result<Vec<UserEntity>, StoreError>;

    async fn update(&self, user: &UserEntity) -> Result<UserEntity, StoreError>;

    /// 返回是否真的删除了一行
    async fn delete_by_id(&self, id: i64) -> Result<bool, StoreError>;
}

/// 基于 Postgres 的用户存储
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn save(&self, user: NewUser) -> Result<UserEntity, StoreError> {
        // 带 id 且行存在时覆盖；否则一律由序列分配 id，调用方给的 id 不会写入主键列
        if let Some(id) = user.id {
            let merged = sqlx::query_as::<_, UserEntity>(
                r#"
                UPDATE users
                SET name = $1, email = $2
                WHERE id = $3
                RETURNING id, name, email
                "#,
            )
            .bind(&user.name)
            .bind(&user.email)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

            if let Some(saved) = merged {
                tracing::debug!("Merged user row: {}", saved.id);
                return Ok(saved);
            }
            tracing::debug!("No user row {}, inserting with generated id", id);
        }

        let saved = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (name, email)
            VALUES ($1, $2)
            RETURNING id, name, email
            "#,
        )
        .bind(user.name)
        .bind(user.email)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Saved user row: {}", saved.id);
        Ok(saved)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserEntity>, StoreError> {
        let user = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, name, email
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_all(&self) -> Result<Vec<UserEntity>, StoreError> {
        let users = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, name, email
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn update(&self, user: &UserEntity) -> Result<UserEntity, StoreError> {
        let updated = sqlx::query_as::<_, UserEntity>(
            r#"
            UPDATE users
            SET name = $1, email = $2
            WHERE id = $3
            RETURNING id, name, email
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
