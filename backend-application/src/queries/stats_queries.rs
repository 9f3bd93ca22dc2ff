use tracing::error;

use crate::error::STATS_FAILED;
use crate::{AppError, AppState};
use backend_domain::{ModerationStats, RecordKind};

/// Row counts for the three moderation tables. One failed count fails the
/// whole call; partial stats are never returned.
pub async fn moderation_stats(state: &AppState) -> Result<ModerationStats, AppError> {
    let (bans, mutes, kicks) = tokio::try_join!(
        count(state, RecordKind::Bans),
        count(state, RecordKind::Mutes),
        count(state, RecordKind::Kicks),
    )?;
    Ok(ModerationStats { bans, mutes, kicks })
}

async fn count(state: &AppState, kind: RecordKind) -> Result<i64, AppError> {
    let table = &state.config.table(kind).table;
    state
        .bounded(state.record_repo.count_records(table))
        .await
        .map_err(|err| {
            error!("failed to count {} in {}: {}", kind.as_str(), table, err);
            AppError::internal(STATS_FAILED)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{moderation_row, FakeDirectory, FakeHistory, FakeRecords, Harness};

    fn rows(count: i64) -> Vec<backend_domain::RecordRow> {
        (1..=count)
            .map(|id| moderation_row(id, "069a79f4-44e9-4726-a5be-fca90e38aaf5", "Steve", "spam"))
            .collect()
    }

    #[tokio::test]
    async fn counts_each_table() {
        let harness = Harness::new(
            FakeRecords::default()
                .with_rows("litebans_bans", rows(3))
                .with_rows("litebans_mutes", rows(2))
                .with_rows("litebans_kicks", rows(7)),
            FakeHistory::default(),
            FakeDirectory::default(),
        );
        let stats = moderation_stats(&harness.state).await.expect("stats");
        assert_eq!(
            stats,
            ModerationStats {
                bans: 3,
                mutes: 2,
                kicks: 7
            }
        );
    }

    #[tokio::test]
    async fn one_failing_table_fails_the_whole_call() {
        let harness = Harness::new(
            FakeRecords::default()
                .with_rows("litebans_bans", rows(3))
                .with_rows("litebans_kicks", rows(7))
                .failing_table("litebans_mutes"),
            FakeHistory::default(),
            FakeDirectory::default(),
        );
        let err = moderation_stats(&harness.state).await.expect_err("mutes fail");
        assert_eq!(err.to_string(), STATS_FAILED);
    }
}
