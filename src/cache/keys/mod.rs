/// 缓存键模块
/// 键格式需与已有缓存内容保持一致

// 用户缓存键
pub mod user_keys;

pub use user_keys::{ALL_USERS_KEY, USER_KEY_PREFIX, user_key};
