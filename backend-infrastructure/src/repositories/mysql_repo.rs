use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow, MySqlSslMode};
use sqlx::{Column, Row, TypeInfo};
use tracing::debug;

use backend_domain::ports::{HistoryRepository, RecordRepository};
use backend_domain::{contains_pattern, DbConfig, PageRequest, RecordRow, TableSpec};

/// Reads the moderation and history tables. Every table and column name
/// reaching the SQL text was validated by the config loader; values are
/// always bound.
#[derive(Clone)]
pub struct MySqlRepo {
    pool: MySqlPool,
}

impl MySqlRepo {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Builds the pool without connecting. Connections are opened on first
    /// use, so missing settings surface as request failures, not at startup.
    pub fn connect_lazy(config: &DbConfig) -> Self {
        let mut options = MySqlConnectOptions::new()
            .port(config.port)
            .ssl_mode(if config.ssl {
                MySqlSslMode::Required
            } else {
                MySqlSslMode::Disabled
            });
        if let Some(host) = &config.host {
            options = options.host(host);
        }
        if let Some(database) = &config.database {
            options = options.database(database);
        }
        if let Some(user) = &config.user {
            options = options.username(user);
        }
        if let Some(password) = &config.password {
            options = options.password(password);
        }

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .acquire_timeout(config.acquire_timeout)
            .connect_lazy_with(options);
        Self::new(pool)
    }
}

#[async_trait]
impl RecordRepository for MySqlRepo {
    async fn list_records(
        &self,
        spec: &TableSpec,
        filter: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<RecordRow>> {
        let sql = build_list_sql(spec, filter.is_some());
        debug!(sql = %sql, "listing records");
        let mut query = sqlx::query(&sql);
        if let Some(value) = filter {
            query = query.bind(contains_pattern(value));
        }
        let rows = query
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn count_records(&self, table: &str) -> Result<i64> {
        let sql = build_count_sql(table);
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl HistoryRepository for MySqlRepo {
    async fn latest_identifier_for_name(
        &self,
        table: &str,
        name_fragment: &str,
    ) -> Result<Option<String>> {
        let sql = build_history_sql(table);
        let uuid: Option<String> = sqlx::query_scalar(&sql)
            .bind(contains_pattern(name_fragment))
            .fetch_optional(&self.pool)
            .await?;
        Ok(uuid)
    }
}

pub fn build_list_sql(spec: &TableSpec, filtered: bool) -> String {
    let mut sql = format!("SELECT {} FROM `{}`", projection(&spec.columns), spec.table);
    if filtered {
        sql.push_str(&format!(" WHERE `{}` LIKE ?", spec.filter_column));
    }
    sql.push_str(&format!(
        " ORDER BY `{}` DESC LIMIT ? OFFSET ?",
        spec.order_column
    ));
    sql
}

pub fn build_count_sql(table: &str) -> String {
    format!("SELECT COUNT(*) AS c FROM `{}`", table)
}

pub fn build_history_sql(table: &str) -> String {
    format!(
        "SELECT `uuid` FROM `{}` WHERE LOWER(`name`) LIKE LOWER(?) ORDER BY `id` DESC LIMIT 1",
        table
    )
}

fn projection(columns: &[String]) -> String {
    if columns.len() == 1 && columns[0] == "*" {
        return "*".to_string();
    }
    columns
        .iter()
        .map(|column| format!("`{}`", column))
        .collect::<Vec<_>>()
        .join(", ")
}

fn row_to_json(row: &MySqlRow) -> RecordRow {
    let mut out = RecordRow::new();
    for column in row.columns() {
        let value = decode_column(row, column.ordinal(), column.type_info().name());
        out.insert(column.name().to_string(), value);
    }
    out
}

/// Best-effort JSON value for one column. NULL is checked before the type,
/// so the first attempt already yields `Value::Null` for it.
fn decode_column(row: &MySqlRow, index: usize, type_name: &str) -> Value {
    if matches!(type_name, "BOOLEAN" | "BIT") {
        if let Ok(value) = row.try_get::<Option<bool>, _>(index) {
            return value.map(Value::Bool).unwrap_or(Value::Null);
        }
    }
    if let Ok(value) = row.try_get::<Option<i64>, _>(index) {
        return value.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<u64>, _>(index) {
        return value.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(index) {
        return value.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<String>, _>(index) {
        return value.map(Value::String).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<chrono::NaiveDateTime>, _>(index) {
        return value
            .map(|ts| Value::String(ts.format("%Y-%m-%d %H:%M:%S").to_string()))
            .unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<chrono::NaiveDate>, _>(index) {
        return value
            .map(|date| Value::String(date.format("%Y-%m-%d").to_string()))
            .unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<Vec<u8>>, _>(index) {
        return value
            .map(|bytes| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
            .unwrap_or(Value::Null);
    }
    debug!(column = index, type_name, "column type not decodable, returning null");
    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(columns: &[&str]) -> TableSpec {
        TableSpec {
            table: "litebans_bans".to_string(),
            columns: columns.iter().map(|column| column.to_string()).collect(),
            filter_column: "uuid".to_string(),
            order_column: "id".to_string(),
            resolve_identifier: true,
        }
    }

    #[test]
    fn unfiltered_listing_orders_newest_first() {
        let sql = build_list_sql(&spec(&["id", "name", "reason"]), false);
        assert_eq!(
            sql,
            "SELECT `id`, `name`, `reason` FROM `litebans_bans` ORDER BY `id` DESC LIMIT ? OFFSET ?"
        );
    }

    #[test]
    fn filtered_listing_binds_the_filter_value() {
        let sql = build_list_sql(&spec(&["id", "uuid"]), true);
        assert_eq!(
            sql,
            "SELECT `id`, `uuid` FROM `litebans_bans` WHERE `uuid` LIKE ? ORDER BY `id` DESC LIMIT ? OFFSET ?"
        );
        assert_eq!(sql.matches('?').count(), 3);
    }

    #[test]
    fn star_projection_is_not_quoted() {
        let sql = build_list_sql(&spec(&["*"]), false);
        assert!(sql.starts_with("SELECT * FROM `litebans_bans`"));
    }

    #[test]
    fn history_lookup_takes_latest_case_insensitive_match() {
        assert_eq!(
            build_history_sql("litebans_history"),
            "SELECT `uuid` FROM `litebans_history` WHERE LOWER(`name`) LIKE LOWER(?) ORDER BY `id` DESC LIMIT 1"
        );
        assert_eq!(
            build_count_sql("litebans_kicks"),
            "SELECT COUNT(*) AS c FROM `litebans_kicks`"
        );
    }

    #[tokio::test]
    async fn lazy_pool_does_not_connect_on_construction() {
        let repo = MySqlRepo::connect_lazy(&DbConfig {
            port: 3306,
            max_connections: 8,
            acquire_timeout: std::time::Duration::from_secs(1),
            ..DbConfig::default()
        });
        assert_eq!(repo.pool.size(), 0);
    }
}
