use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug)]
pub enum HttpError {
    Unauthorized(&'static str),
    Internal(String),
}

impl From<backend_application::AppError> for HttpError {
    fn from(value: backend_application::AppError) -> Self {
        match value {
            backend_application::AppError::Unauthorized(msg) => HttpError::Unauthorized(msg),
            backend_application::AppError::Internal(err) => HttpError::Internal(err.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            HttpError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.to_string()),
            HttpError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
