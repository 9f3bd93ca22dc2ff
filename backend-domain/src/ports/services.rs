use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait NameDirectory: Send + Sync {
    /// Raw directory id for `name`, `None` when the directory does not know it.
    async fn lookup_id(&self, name: &str) -> anyhow::Result<Option<String>>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
