// 服务层
// 用户数据的唯一访问入口

pub mod user;

pub use user::UserCacheService;
