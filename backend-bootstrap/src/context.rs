use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use backend_application::AppState;
use backend_infrastructure::{AppConfig, HttpNameDirectory, MySqlRepo, SystemClock};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        let runtime_config = config.to_runtime_config();
        let db_config = config.to_db_config();

        info!(
            bind_addr = %runtime_config.bind_addr,
            db_host = db_config.host.as_deref().unwrap_or("-"),
            db_port = db_config.port,
            db_name = db_config.database.as_deref().unwrap_or("-"),
            db_ssl = db_config.ssl,
            bans = %runtime_config.bans.table,
            mutes = %runtime_config.mutes.table,
            kicks = %runtime_config.kicks.table,
            history = %runtime_config.history_table,
            "config loaded"
        );

        let repo = Arc::new(MySqlRepo::connect_lazy(&db_config));
        let name_directory = Arc::new(HttpNameDirectory::new(
            &runtime_config.directory_url,
            Duration::from_secs(runtime_config.directory_timeout_seconds),
        )?);

        let state = AppState {
            config: runtime_config,
            record_repo: repo.clone(),
            history_repo: repo,
            name_directory,
            clock: Arc::new(SystemClock),
        };

        Ok(Self { state })
    }
}
