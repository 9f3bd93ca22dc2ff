use tracing::{debug, error, warn};

use crate::error::{DIRECTORY_LOOKUP_FAILED, HISTORY_LOOKUP_FAILED};
use crate::{AppError, AppState};
use backend_domain::{looks_like_identifier, PlayerId};

/// Resolves a search term to a canonical player identifier.
///
/// Identifier-shaped input is returned as is. Anything else is looked up
/// in the history table first (most recent matching name wins) and only
/// then in the external name directory. `Ok(None)` means nobody matched.
pub async fn resolve_identifier(
    state: &AppState,
    query: &str,
) -> Result<Option<PlayerId>, AppError> {
    if looks_like_identifier(query) {
        return Ok(Some(PlayerId::new(query)));
    }

    let from_history = state
        .bounded(
            state
                .history_repo
                .latest_identifier_for_name(&state.config.history_table, query),
        )
        .await
        .map_err(|err| {
            error!("history lookup failed: {}", err);
            AppError::internal(HISTORY_LOOKUP_FAILED)
        })?;
    if let Some(uuid) = from_history.filter(|value| !value.trim().is_empty()) {
        debug!(name = %query, uuid = %uuid, "name resolved from history");
        return Ok(Some(PlayerId::new(uuid)));
    }

    let raw_id = state
        .name_directory
        .lookup_id(query)
        .await
        .map_err(|err| {
            error!("name directory lookup failed: {}", err);
            AppError::internal(DIRECTORY_LOOKUP_FAILED)
        })?;
    let Some(raw_id) = raw_id else {
        debug!(name = %query, "name not known to directory");
        return Ok(None);
    };
    let resolved = PlayerId::from_compact(&raw_id);
    if resolved.is_none() {
        warn!(name = %query, id = %raw_id, "directory returned malformed id");
    }
    Ok(resolved)
}
