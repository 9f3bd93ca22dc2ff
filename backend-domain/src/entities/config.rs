// Runtime configuration views
// Built by the infrastructure config loader, consumed read-only by the application

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Budget for a single database call, kept below the request timeout so
/// storage stalls surface as handler errors rather than a bare 408.
pub fn backend_timeout(request_timeout_seconds: u64) -> Duration {
    Duration::from_millis(request_timeout_seconds.max(1).saturating_mul(800))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Bans,
    Mutes,
    Kicks,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [RecordKind::Bans, RecordKind::Mutes, RecordKind::Kicks];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Bans => "bans",
            RecordKind::Mutes => "mutes",
            RecordKind::Kicks => "kicks",
        }
    }
}

/// Where and how one moderation table is read.
///
/// Every name here comes from server configuration and is validated as a
/// plain SQL identifier before it reaches a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub table: String,
    pub columns: Vec<String>,
    pub filter_column: String,
    pub order_column: String,
    /// Run non-identifier search terms through name resolution first.
    pub resolve_identifier: bool,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub admin_username: String,
    pub admin_password: String,
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub bans: TableSpec,
    pub mutes: TableSpec,
    pub kicks: TableSpec,
    pub history_table: String,
    pub directory_url: String,
    pub directory_timeout_seconds: u64,
}

impl RuntimeConfig {
    pub fn table(&self, kind: RecordKind) -> &TableSpec {
        match kind {
            RecordKind::Bans => &self.bans,
            RecordKind::Mutes => &self.mutes,
            RecordKind::Kicks => &self.kicks,
        }
    }

    pub fn backend_timeout(&self) -> Duration {
        backend_timeout(self.request_timeout_seconds)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DbConfig {
    pub host: Option<String>,
    pub port: u16,
    pub database: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub ssl: bool,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DbConfig {
    /// Names of the connection settings that are still unset.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.host.is_none() {
            missing.push("DB_HOST");
        }
        if self.database.is_none() {
            missing.push("DB_NAME");
        }
        if self.user.is_none() {
            missing.push("DB_USER");
        }
        if self.password.is_none() {
            missing.push("DB_PASS");
        }
        missing
    }
}
