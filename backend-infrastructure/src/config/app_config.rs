use std::env;
use std::net::SocketAddr;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{backend_timeout, DbConfig, RecordKind, RuntimeConfig, TableSpec};

use crate::config::validation::{split_columns, validate_sql_identifier, validate_table_spec};
use crate::utils::{normalize_optional_text, parse_env_bool, parse_env_list};

const DEFAULT_ADMIN_USER: &str = "admin";
const DEFAULT_ADMIN_PASS: &str = "admin";
const DEFAULT_JWT_SECRET: &str = "change-me";
const DEFAULT_DIRECTORY_URL: &str = "https://api.mojang.com/users/profiles/minecraft/";

/// Per-table overrides. Unset fields fall back to the defaults of the
/// table kind they belong to.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct TableConfig {
    pub table: Option<String>,
    /// Comma separated projection, e.g. `id,name,reason`.
    pub columns: Option<String>,
    pub filter_column: Option<String>,
    pub order_column: Option<String>,
    pub resolve_identifier: Option<bool>,
}

impl TableConfig {
    fn to_spec(&self, kind: RecordKind) -> TableSpec {
        let (table, columns) = match kind {
            RecordKind::Bans => (
                "litebans_bans",
                "id,name,reason,banned_by_name,time,until,active",
            ),
            RecordKind::Mutes => (
                "litebans_mutes",
                "id,name,reason,muted_by_name,time,until,active",
            ),
            RecordKind::Kicks => ("litebans_kicks", "id,name,reason,kicked_by_name,time"),
        };
        TableSpec {
            table: self.table.clone().unwrap_or_else(|| table.to_string()),
            columns: split_columns(self.columns.as_deref().unwrap_or(columns)),
            filter_column: self
                .filter_column
                .clone()
                .unwrap_or_else(|| "uuid".to_string()),
            order_column: self
                .order_column
                .clone()
                .unwrap_or_else(|| "id".to_string()),
            resolve_identifier: self.resolve_identifier.unwrap_or(true),
        }
    }

    fn normalize(&mut self) {
        self.table = normalize_optional_text(self.table.take());
        self.columns = normalize_optional_text(self.columns.take());
        self.filter_column = normalize_optional_text(self.filter_column.take());
        self.order_column = normalize_optional_text(self.order_column.take());
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub admin_username: String,
    pub admin_password: String,
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub db_host: Option<String>,
    pub db_port: u16,
    pub db_name: Option<String>,
    pub db_user: Option<String>,
    pub db_password: Option<String>,
    pub db_ssl: bool,
    pub db_max_connections: u32,
    pub bans: TableConfig,
    pub mutes: TableConfig,
    pub kicks: TableConfig,
    pub history_table: String,
    pub directory_url: String,
    pub directory_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            admin_username: DEFAULT_ADMIN_USER.to_string(),
            admin_password: DEFAULT_ADMIN_PASS.to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            cors_origins: Vec::new(),
            max_body_bytes: 200 * 1024,
            request_timeout_seconds: 15,
            db_host: None,
            db_port: 3306,
            db_name: None,
            db_user: None,
            db_password: None,
            db_ssl: false,
            db_max_connections: 8,
            bans: TableConfig::default(),
            mutes: TableConfig::default(),
            kicks: TableConfig::default(),
            history_table: "litebans_history".to_string(),
            directory_url: DEFAULT_DIRECTORY_URL.to_string(),
            directory_timeout_seconds: 5,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("HYRISE_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            toml::from_str::<AppConfig>(&content)?
        } else {
            warn!("config.toml not found, using defaults");
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.normalize();
        config.validate()?;
        config.warn_on_gaps();
        Ok(config)
    }

    pub fn normalize(&mut self) {
        self.db_host = normalize_optional_text(self.db_host.take());
        self.db_name = normalize_optional_text(self.db_name.take());
        self.db_user = normalize_optional_text(self.db_user.take());
        if let Some(password) = &self.db_password {
            if password.is_empty() {
                self.db_password = None;
            }
        }
        self.admin_username = self.admin_username.trim().to_string();
        self.history_table = self.history_table.trim().to_string();
        self.directory_url = self.directory_url.trim().to_string();
        self.cors_origins = parse_env_list(&self.cors_origins.join(","));
        if self.db_max_connections == 0 {
            self.db_max_connections = 1;
        }
        self.bans.normalize();
        self.mutes.normalize();
        self.kicks.normalize();
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        if self.directory_timeout_seconds == 0 {
            return Err(anyhow!("directory_timeout_seconds must be greater than 0"));
        }
        validate_directory_url(&self.directory_url)?;
        validate_sql_identifier(&self.history_table, "history_table")?;
        for kind in RecordKind::ALL {
            validate_table_spec(&self.table_spec(kind), kind.as_str())?;
        }
        Ok(())
    }

    fn warn_on_gaps(&self) {
        let missing = self.to_db_config().missing_fields();
        if !missing.is_empty() {
            warn!("missing database settings: {}", missing.join(", "));
        }
        if self.admin_username == DEFAULT_ADMIN_USER && self.admin_password == DEFAULT_ADMIN_PASS {
            warn!("staff account uses development defaults; set ADMIN_USER and ADMIN_PASS");
        }
        if self.jwt_secret == DEFAULT_JWT_SECRET {
            warn!("JWT_SECRET uses the development default");
        }
    }

    pub fn table_spec(&self, kind: RecordKind) -> TableSpec {
        match kind {
            RecordKind::Bans => self.bans.to_spec(kind),
            RecordKind::Mutes => self.mutes.to_spec(kind),
            RecordKind::Kicks => self.kicks.to_spec(kind),
        }
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            admin_username: self.admin_username.clone(),
            admin_password: self.admin_password.clone(),
            jwt_secret: self.jwt_secret.clone(),
            cors_origins: self.cors_origins.clone(),
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
            bans: self.table_spec(RecordKind::Bans),
            mutes: self.table_spec(RecordKind::Mutes),
            kicks: self.table_spec(RecordKind::Kicks),
            history_table: self.history_table.clone(),
            directory_url: self.directory_url.clone(),
            directory_timeout_seconds: self.directory_timeout_seconds,
        }
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            database: self.db_name.clone(),
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            ssl: self.db_ssl,
            max_connections: self.db_max_connections,
            acquire_timeout: backend_timeout(self.request_timeout_seconds),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Some(value) = lookup("PORT") {
            if let Ok(port) = value.trim().parse::<u16>() {
                self.bind_addr = with_port(&self.bind_addr, port);
            }
        }
        if let Some(value) = lookup("ADMIN_USER") {
            self.admin_username = value;
        }
        if let Some(value) = lookup("ADMIN_PASS") {
            self.admin_password = value;
        }
        if let Some(value) = lookup("JWT_SECRET") {
            self.jwt_secret = value;
        }
        if let Some(value) = lookup("CORS_ORIGIN") {
            self.cors_origins = parse_env_list(&value);
        }
        if let Some(value) = lookup("MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Some(value) = lookup("REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Some(value) = lookup("DB_HOST") {
            self.db_host = Some(value);
        }
        if let Some(value) = lookup("DB_PORT") {
            self.db_port = value.parse().unwrap_or(self.db_port);
        }
        if let Some(value) = lookup("DB_NAME") {
            self.db_name = Some(value);
        }
        if let Some(value) = lookup("DB_USER") {
            self.db_user = Some(value);
        }
        if let Some(value) = lookup("DB_PASS") {
            self.db_password = Some(value);
        }
        if let Some(value) = lookup("DB_SSL") {
            self.db_ssl = parse_env_bool(&value).unwrap_or(self.db_ssl);
        }
        if let Some(value) = lookup("DB_MAX_CONNECTIONS") {
            self.db_max_connections = value.parse().unwrap_or(self.db_max_connections);
        }
        if let Some(value) = lookup("T_BANS") {
            self.bans.table = Some(value);
        }
        if let Some(value) = lookup("T_MUTES") {
            self.mutes.table = Some(value);
        }
        if let Some(value) = lookup("T_KICKS") {
            self.kicks.table = Some(value);
        }
        if let Some(value) = lookup("T_HISTORY") {
            self.history_table = value;
        }
        if let Some(value) = lookup("COL_BANS") {
            self.bans.columns = Some(value);
        }
        if let Some(value) = lookup("COL_MUTES") {
            self.mutes.columns = Some(value);
        }
        if let Some(value) = lookup("COL_KICKS") {
            self.kicks.columns = Some(value);
        }
        if let Some(value) = lookup("DIRECTORY_URL") {
            self.directory_url = value;
        }
        if let Some(value) = lookup("DIRECTORY_TIMEOUT_SECONDS") {
            self.directory_timeout_seconds =
                value.parse().unwrap_or(self.directory_timeout_seconds);
        }
    }
}

fn with_port(bind_addr: &str, port: u16) -> String {
    match bind_addr.parse::<SocketAddr>() {
        Ok(mut addr) => {
            addr.set_port(port);
            addr.to_string()
        }
        Err(_) => format!("0.0.0.0:{}", port),
    }
}

fn validate_directory_url(value: &str) -> Result<()> {
    let url = reqwest::Url::parse(value)
        .map_err(|err| anyhow!("invalid directory_url '{}': {}", value, err))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(anyhow!("directory_url must be an http(s) base url, got '{}'", value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid_and_match_litebans_layout() {
        let config = AppConfig::default();
        config.validate().expect("defaults validate");

        let runtime = config.to_runtime_config();
        assert_eq!(runtime.bans.table, "litebans_bans");
        assert_eq!(
            runtime.bans.columns,
            vec!["id", "name", "reason", "banned_by_name", "time", "until", "active"]
        );
        assert_eq!(runtime.kicks.columns.len(), 5);
        assert_eq!(runtime.mutes.filter_column, "uuid");
        assert_eq!(runtime.mutes.order_column, "id");
        assert!(runtime.kicks.resolve_identifier);
        assert_eq!(runtime.history_table, "litebans_history");
        assert_eq!(runtime.max_body_bytes, 200 * 1024);
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = AppConfig::default();
        config.apply_overrides(overrides(&[
            ("PORT", "9090"),
            ("DB_HOST", "mysql.internal"),
            ("DB_PORT", "3307"),
            ("DB_NAME", "litebans"),
            ("DB_USER", "reader"),
            ("DB_PASS", "s3cret"),
            ("DB_SSL", "true"),
            ("T_BANS", "lb_bans"),
            ("COL_KICKS", "id, uuid ,reason"),
            ("CORS_ORIGIN", "https://panel.example,https://staff.example"),
            ("JWT_SECRET", "prod-secret"),
        ]));
        config.normalize();
        config.validate().expect("valid");

        assert_eq!(config.bind_addr, "0.0.0.0:9090");
        let db = config.to_db_config();
        assert_eq!(db.host.as_deref(), Some("mysql.internal"));
        assert_eq!(db.port, 3307);
        assert!(db.ssl);
        assert!(db.missing_fields().is_empty());

        let runtime = config.to_runtime_config();
        assert_eq!(runtime.bans.table, "lb_bans");
        assert_eq!(runtime.kicks.columns, vec!["id", "uuid", "reason"]);
        assert_eq!(runtime.cors_origins.len(), 2);
        assert_eq!(runtime.jwt_secret, "prod-secret");
    }

    #[test]
    fn toml_file_overrides_single_table_fields() {
        let content = r#"
bind_addr = "127.0.0.1:3000"
admin_username = "owner"

[kicks]
filter_column = "name"
resolve_identifier = false
"#;
        let mut config: AppConfig = toml::from_str(content).expect("parse");
        config.normalize();
        config.validate().expect("valid");

        let kicks = config.table_spec(RecordKind::Kicks);
        assert_eq!(kicks.table, "litebans_kicks");
        assert_eq!(kicks.filter_column, "name");
        assert!(!kicks.resolve_identifier);
        assert_eq!(config.table_spec(RecordKind::Bans).filter_column, "uuid");
        assert_eq!(config.admin_username, "owner");
    }

    #[test]
    fn missing_database_settings_are_not_fatal() {
        let mut config = AppConfig::default();
        config.apply_overrides(overrides(&[("DB_PASS", "")]));
        config.normalize();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.to_db_config().missing_fields(),
            vec!["DB_HOST", "DB_NAME", "DB_USER", "DB_PASS"]
        );
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let mut config = AppConfig::default();
        config.apply_overrides(overrides(&[("COL_BANS", "id,name FROM x; --")]));
        config.normalize();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.bind_addr = "not-an-addr".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.max_body_bytes = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.directory_url = "mailto:someone@example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn directory_url_must_be_http() {
        for url in [
            "ftp://files.example.com/users/",
            "file:///etc/passwd",
            "ws://directory.example/users/",
        ] {
            let mut config = AppConfig::default();
            config.directory_url = url.to_string();
            assert!(config.validate().is_err(), "{}", url);
        }

        let mut config = AppConfig::default();
        config.directory_url = "http://127.0.0.1:9000/users/".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn pool_acquire_timeout_is_shorter_than_request_timeout() {
        let mut config = AppConfig::default();
        config.apply_overrides(overrides(&[("REQUEST_TIMEOUT_SECONDS", "10")]));
        let db = config.to_db_config();
        assert!(db.acquire_timeout < std::time::Duration::from_secs(10));
        assert_eq!(db.acquire_timeout, std::time::Duration::from_secs(8));
    }

    #[test]
    fn port_replaces_only_the_port() {
        assert_eq!(with_port("127.0.0.1:8080", 3000), "127.0.0.1:3000");
        assert_eq!(with_port("garbage", 3000), "0.0.0.0:3000");
    }
}
