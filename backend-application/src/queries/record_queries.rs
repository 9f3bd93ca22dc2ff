use tracing::{debug, error};

use crate::error::QUERY_FAILED;
use crate::queries::identifier_queries::resolve_identifier;
use crate::{AppError, AppState};
use backend_domain::{ListQuery, RecordKind, RowsResponse};

pub async fn list_records(
    state: &AppState,
    kind: RecordKind,
    query: ListQuery,
) -> Result<RowsResponse, AppError> {
    let spec = state.config.table(kind);
    let page = query.page();

    let filter = match query.search_term() {
        None => None,
        Some(term) if spec.resolve_identifier => match resolve_identifier(state, term).await? {
            Some(id) => Some(id.into_inner()),
            None => {
                debug!(kind = kind.as_str(), term = %term, "search term did not resolve");
                return Ok(RowsResponse::empty());
            }
        },
        Some(term) => Some(term.to_string()),
    };

    let rows = state
        .bounded(state.record_repo.list_records(spec, filter.as_deref(), page))
        .await
        .map_err(|err| {
            error!("failed to list {}: {}", kind.as_str(), err);
            AppError::internal(QUERY_FAILED)
        })?;
    Ok(RowsResponse { rows })
}
