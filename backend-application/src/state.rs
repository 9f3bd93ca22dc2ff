use std::future::Future;
use std::sync::Arc;

use anyhow::anyhow;

use backend_domain::ports::{Clock, HistoryRepository, NameDirectory, RecordRepository};
use backend_domain::RuntimeConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub record_repo: Arc<dyn RecordRepository>,
    pub history_repo: Arc<dyn HistoryRepository>,
    pub name_directory: Arc<dyn NameDirectory>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Runs a repository call under the backend timeout. An expired call is
    /// reported as an ordinary error.
    pub async fn bounded<T, F>(&self, call: F) -> anyhow::Result<T>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        let limit = self.config.backend_timeout();
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(anyhow!("database call timed out after {:?}", limit)),
        }
    }
}
