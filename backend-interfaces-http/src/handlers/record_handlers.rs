use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use tracing::debug;

use backend_application::queries::record_queries;
use backend_application::AppState;
use backend_domain::{ListQuery, RecordKind, RowsResponse};

use crate::error::HttpError;
use crate::middleware::authorize;

/// Query string as raw pairs; repeated keys and undecodable strings never
/// reject the request.
type RawPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;

pub async fn list_bans(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: RawPairs,
) -> Result<Json<RowsResponse>, HttpError> {
    list(&state, &headers, RecordKind::Bans, query).await
}

pub async fn list_mutes(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: RawPairs,
) -> Result<Json<RowsResponse>, HttpError> {
    list(&state, &headers, RecordKind::Mutes, query).await
}

pub async fn list_kicks(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: RawPairs,
) -> Result<Json<RowsResponse>, HttpError> {
    list(&state, &headers, RecordKind::Kicks, query).await
}

async fn list(
    state: &AppState,
    headers: &HeaderMap,
    kind: RecordKind,
    query: RawPairs,
) -> Result<Json<RowsResponse>, HttpError> {
    authorize(state, headers)?;
    let query = match query {
        Ok(Query(pairs)) => ListQuery::from_pairs(pairs),
        Err(rejection) => {
            debug!("unreadable query string, using defaults: {}", rejection);
            ListQuery::default()
        }
    };
    let rows = record_queries::list_records(state, kind, query).await?;
    Ok(Json(rows))
}
