use thiserror::Error;

pub const MISSING_TOKEN: &str = "Missing token";
pub const INVALID_TOKEN: &str = "Invalid token";
pub const BAD_CREDENTIALS: &str = "Bad credentials";
pub const TOKEN_SIGNING_FAILED: &str = "Failed to issue token";

pub const QUERY_FAILED: &str = "Query failed. Adjust column config to match your schema.";
pub const STATS_FAILED: &str = "Failed to query stats. Check table names in config.";
pub const HISTORY_LOOKUP_FAILED: &str = "Failed to resolve name via history table";
pub const DIRECTORY_LOOKUP_FAILED: &str = "Failed to resolve name via name directory";

/// Failures surfaced to callers. `Internal` always carries one of the
/// fixed messages above; the underlying cause is logged where it happens.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn internal(message: &'static str) -> Self {
        AppError::Internal(anyhow::Error::msg(message))
    }
}
