use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::{AppState, middleware::log_errors, routes};

// 用户相关的路由
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/create", post(routes::user::create_user))
        .route("/users/getuser/{id}", get(routes::user::get_user_by_id))
        .route("/users/getAll", get(routes::user::get_all_users))
        .route("/users/updateuser/{id}", put(routes::user::update_user))
        .route("/users/deleteuser/{id}", delete(routes::user::delete_user))
}

// 熔断演示路由
pub fn resilience_routes() -> Router<AppState> {
    Router::new().route("/resilience/fallback", get(routes::resilience::risky_endpoint))
}

// 创建主路由
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        .merge(user_routes())
        .merge(resilience_routes())
        .layer(axum::middleware::from_fn(log_errors))
        .layer(TraceLayer::new_for_http());

    // 开发模式下允许跨域
    #[cfg(debug_assertions)]
    let router = router.layer(tower_http::cors::CorsLayer::permissive());

    router.with_state(state)
}
