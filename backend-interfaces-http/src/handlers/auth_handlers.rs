use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use backend_application::commands::auth_commands;
use backend_application::AppState;
use backend_domain::{LoginRequest, LoginResponse, SessionResponse};

use crate::error::HttpError;
use crate::middleware::authorize;

/// A missing or unreadable body counts as a failed login.
pub async fn login(
    State(state): State<AppState>,
    payload: Option<Json<LoginRequest>>,
) -> Result<Json<LoginResponse>, HttpError> {
    let request = payload.map(|Json(body)| body).unwrap_or_default();
    let response = auth_commands::login(&state, request)?;
    Ok(Json(response))
}

pub async fn current_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>, HttpError> {
    let claims = authorize(&state, &headers)?;
    Ok(Json(SessionResponse {
        ok: true,
        user: claims,
    }))
}
