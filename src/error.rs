use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::database::StoreError;

/// 服务层错误
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("user {0} not found")]
    NotFound(i64),
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

/// HTTP 层错误，对外只暴露不透明的错误信息
#[derive(Debug)]
pub enum AppError {
    NotFound,
    InternalServerError,
}

#[derive(Serialize)]
struct ErrorResponse {
    code: i32,
    error_message: String,
}

// 持久化错误已在服务层记录，这里只做映射
impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(_) => AppError::NotFound,
            ServiceError::Persistence(_) => AppError::InternalServerError,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "用户不存在".to_string()),
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "内部服务器错误".to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            code: status.as_u16() as i32,
            error_message,
        });

        (status, body).into_response()
    }
}
