use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tracing::error;

use backend_application::AppState;

#[derive(Serialize)]
struct HealthStatus {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let healthy = match state.bounded(state.record_repo.ping()).await {
        Ok(_) => true,
        Err(err) => {
            error!("health check failed: {}", err);
            false
        }
    };

    if healthy {
        (StatusCode::OK, Json(HealthStatus { ok: true, error: None }))
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HealthStatus {
                ok: false,
                error: Some("db"),
            }),
        )
    }
}
