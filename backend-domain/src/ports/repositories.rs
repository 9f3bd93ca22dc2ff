use async_trait::async_trait;

use crate::entities::{PageRequest, RecordRow, TableSpec};

#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Newest-first page of `spec.table`. `filter` is matched as a substring
    /// of `spec.filter_column`; `None` lists everything.
    async fn list_records(
        &self,
        spec: &TableSpec,
        filter: Option<&str>,
        page: PageRequest,
    ) -> anyhow::Result<Vec<RecordRow>>;
    async fn count_records(&self, table: &str) -> anyhow::Result<i64>;
    async fn ping(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Identifier of the most recent history entry whose name contains
    /// `name_fragment`, ignoring case.
    async fn latest_identifier_for_name(
        &self,
        table: &str,
        name_fragment: &str,
    ) -> anyhow::Result<Option<String>>;
}
