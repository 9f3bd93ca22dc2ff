//! In-memory fakes of the domain ports.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};

use backend_domain::ports::{Clock, HistoryRepository, NameDirectory, RecordRepository};
use backend_domain::{PageRequest, RecordRow, RuntimeConfig, TableSpec};

use crate::AppState;

pub const ADMIN_USER: &str = "staff_admin";
pub const ADMIN_PASS: &str = "correct horse";
pub const JWT_SECRET: &str = "test-signing-secret";

pub fn table_spec(table: &str, staff_column: &str) -> TableSpec {
    TableSpec {
        table: table.to_string(),
        columns: ["id", "uuid", "name", "reason", staff_column, "time"]
            .iter()
            .map(|column| column.to_string())
            .collect(),
        filter_column: "uuid".to_string(),
        order_column: "id".to_string(),
        resolve_identifier: true,
    }
}

pub fn runtime_config() -> RuntimeConfig {
    RuntimeConfig {
        bind_addr: "127.0.0.1:8080".to_string(),
        admin_username: ADMIN_USER.to_string(),
        admin_password: ADMIN_PASS.to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        cors_origins: Vec::new(),
        max_body_bytes: 200 * 1024,
        request_timeout_seconds: 5,
        bans: table_spec("litebans_bans", "banned_by_name"),
        mutes: table_spec("litebans_mutes", "muted_by_name"),
        kicks: table_spec("litebans_kicks", "kicked_by_name"),
        history_table: "litebans_history".to_string(),
        directory_url: "https://directory.invalid/users/".to_string(),
        directory_timeout_seconds: 1,
    }
}

pub fn moderation_row(id: i64, uuid: &str, name: &str, reason: &str) -> RecordRow {
    match json!({ "id": id, "uuid": uuid, "name": name, "reason": reason }) {
        Value::Object(map) => map,
        _ => RecordRow::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCall {
    pub table: String,
    pub filter: Option<String>,
    pub page: PageRequest,
}

/// Tables held in memory. Listing mimics the SQL: substring filter on the
/// filter column, descending order column, then offset and limit.
#[derive(Default)]
pub struct FakeRecords {
    tables: Mutex<HashMap<String, Vec<RecordRow>>>,
    failing: Mutex<HashSet<String>>,
    calls: Mutex<Vec<ListCall>>,
    ping_fails: Mutex<bool>,
    hangs: Mutex<bool>,
}

impl FakeRecords {
    pub fn with_rows(self, table: &str, rows: Vec<RecordRow>) -> Self {
        self.tables
            .lock()
            .expect("tables lock")
            .insert(table.to_string(), rows);
        self
    }

    pub fn failing_table(self, table: &str) -> Self {
        self.failing
            .lock()
            .expect("failing lock")
            .insert(table.to_string());
        self
    }

    pub fn failing_ping(self) -> Self {
        *self.ping_fails.lock().expect("ping lock") = true;
        self
    }

    /// Every call waits forever, like a database that accepted the
    /// connection and never answers.
    pub fn hanging(self) -> Self {
        *self.hangs.lock().expect("hang lock") = true;
        self
    }

    pub fn calls(&self) -> Vec<ListCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    async fn stall_if_hanging(&self) {
        let hangs = *self.hangs.lock().expect("hang lock");
        if hangs {
            std::future::pending::<()>().await;
        }
    }

    fn check_table(&self, table: &str) -> anyhow::Result<()> {
        if self.failing.lock().expect("failing lock").contains(table) {
            return Err(anyhow!("Table '{}' doesn't exist", table));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordRepository for FakeRecords {
    async fn list_records(
        &self,
        spec: &TableSpec,
        filter: Option<&str>,
        page: PageRequest,
    ) -> anyhow::Result<Vec<RecordRow>> {
        self.calls.lock().expect("calls lock").push(ListCall {
            table: spec.table.clone(),
            filter: filter.map(ToString::to_string),
            page,
        });
        self.stall_if_hanging().await;
        self.check_table(&spec.table)?;

        let tables = self.tables.lock().expect("tables lock");
        let mut rows: Vec<RecordRow> = tables
            .get(&spec.table)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|row| match filter {
                Some(needle) => row
                    .get(&spec.filter_column)
                    .and_then(Value::as_str)
                    .map(|value| value.to_lowercase().contains(&needle.to_lowercase()))
                    .unwrap_or(false),
                None => true,
            })
            .collect();
        rows.sort_by_key(|row| {
            std::cmp::Reverse(row.get(&spec.order_column).and_then(Value::as_i64))
        });
        Ok(rows
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn count_records(&self, table: &str) -> anyhow::Result<i64> {
        self.stall_if_hanging().await;
        self.check_table(table)?;
        let tables = self.tables.lock().expect("tables lock");
        Ok(tables.get(table).map(|rows| rows.len() as i64).unwrap_or(0))
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.stall_if_hanging().await;
        if *self.ping_fails.lock().expect("ping lock") {
            return Err(anyhow!("connection refused"));
        }
        Ok(())
    }
}

/// History entries as `(log position, name, identifier)`.
#[derive(Default)]
pub struct FakeHistory {
    entries: Vec<(i64, String, String)>,
    fails: bool,
    lookups: AtomicUsize,
}

impl FakeHistory {
    pub fn with_entry(mut self, position: i64, name: &str, uuid: &str) -> Self {
        self.entries
            .push((position, name.to_string(), uuid.to_string()));
        self
    }

    pub fn failing(mut self) -> Self {
        self.fails = true;
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HistoryRepository for FakeHistory {
    async fn latest_identifier_for_name(
        &self,
        _table: &str,
        name_fragment: &str,
    ) -> anyhow::Result<Option<String>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fails {
            return Err(anyhow!("history table unreachable"));
        }
        let needle = name_fragment.to_lowercase();
        Ok(self
            .entries
            .iter()
            .filter(|(_, name, _)| name.to_lowercase().contains(&needle))
            .max_by_key(|(position, _, _)| *position)
            .map(|(_, _, uuid)| uuid.clone()))
    }
}

#[derive(Default)]
pub struct FakeDirectory {
    ids: HashMap<String, String>,
    fails: bool,
    lookups: AtomicUsize,
}

impl FakeDirectory {
    pub fn with_player(mut self, name: &str, raw_id: &str) -> Self {
        self.ids.insert(name.to_lowercase(), raw_id.to_string());
        self
    }

    pub fn failing(mut self) -> Self {
        self.fails = true;
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NameDirectory for FakeDirectory {
    async fn lookup_id(&self, name: &str) -> anyhow::Result<Option<String>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fails {
            return Err(anyhow!("directory timed out"));
        }
        Ok(self.ids.get(&name.to_lowercase()).cloned())
    }
}

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()),
        }
    }
}

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock");
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

/// Fakes plus the `AppState` wired to them.
pub struct Harness {
    pub records: Arc<FakeRecords>,
    pub history: Arc<FakeHistory>,
    pub directory: Arc<FakeDirectory>,
    pub clock: Arc<ManualClock>,
    pub state: AppState,
}

impl Harness {
    pub fn new(records: FakeRecords, history: FakeHistory, directory: FakeDirectory) -> Self {
        let records = Arc::new(records);
        let history = Arc::new(history);
        let directory = Arc::new(directory);
        let clock = Arc::new(ManualClock::default());
        let state = AppState {
            config: runtime_config(),
            record_repo: records.clone(),
            history_repo: history.clone(),
            name_directory: directory.clone(),
            clock: clock.clone(),
        };
        Self {
            records,
            history,
            directory,
            clock,
            state,
        }
    }
}
