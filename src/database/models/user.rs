use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 用户数据库实体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserEntity {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// 待写入的用户记录，`id` 为空时由数据库分配
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// 更新请求，两个字段总是整体覆盖
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserEntity {
    /// 用补丁覆盖 name 和 email，id 保持不变
    pub fn apply(mut self, patch: UserPatch) -> Self {
        self.name = patch.name;
        self.email = patch.email;
        self
    }
}
