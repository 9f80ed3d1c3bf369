use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    database::{NewUser, UserEntity, UserPatch},
    error::AppError,
};

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<NewUser>,
) -> Result<Json<UserEntity>, AppError> {
    let user = state.service.create(req).await?;
    Ok(Json(user))
}

#[axum::debug_handler]
pub async fn get_user_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserEntity>, AppError> {
    match state.service.get_by_id(id).await? {
        Some(user) => Ok(Json(user)),
        None => Err(AppError::NotFound),
    }
}

#[axum::debug_handler]
pub async fn get_all_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserEntity>>, AppError> {
    let users = state.service.get_all().await?;
    Ok(Json(users))
}

#[axum::debug_handler]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<UserEntity>, AppError> {
    let user = state.service.update(id, patch).await?;
    Ok(Json(user))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
