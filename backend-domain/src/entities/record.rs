// Moderation record entity
// Rows keep the configured projection, so they stay untyped JSON objects

use serde::{Deserialize, Serialize};

pub type RecordRow = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowsResponse {
    pub rows: Vec<RecordRow>,
}

impl RowsResponse {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationStats {
    pub bans: i64,
    pub mutes: i64,
    pub kicks: i64,
}
