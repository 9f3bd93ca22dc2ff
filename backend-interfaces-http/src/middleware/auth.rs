use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use backend_application::commands::auth_commands;
use backend_application::AppState;
use backend_domain::StaffClaims;

use crate::error::HttpError;

/// Verifies the request's bearer credential and returns its claims.
pub fn authorize(state: &AppState, headers: &HeaderMap) -> Result<StaffClaims, HttpError> {
    let token = extract_bearer(headers);
    auth_commands::authenticate(state, token.as_deref()).map_err(HttpError::from)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let prefix = "Bearer ";
    if !value.starts_with(prefix) {
        return None;
    }
    let token = value[prefix.len()..].trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
