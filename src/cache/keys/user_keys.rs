/// 单个用户缓存键前缀
pub const USER_KEY_PREFIX: &str = "USER_";

/// 全部用户列表缓存键
pub const ALL_USERS_KEY: &str = "ALL_USERS";

/// 生成单个用户缓存键
pub fn user_key(id: i64) -> String {
    format!("{}{}", USER_KEY_PREFIX, id)
}
