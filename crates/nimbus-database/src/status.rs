//! Waiter helpers for table status transitions

use crate::api::{DatabaseApi, Table};
use crate::find::find_table_by_name;
use nimbus_tags::{WaitConfig, WaitError, wait_for_state};
use tokio_util::sync::CancellationToken;

pub const TABLE_STATUS_CREATING: &str = "creating";
pub const TABLE_STATUS_UPDATING: &str = "updating";
pub const TABLE_STATUS_ACTIVE: &str = "active";
pub const TABLE_STATUS_DELETING: &str = "deleting";

/// Poll a table until it reaches one of `target` statuses.
///
/// A table the describe call cannot see yet counts as still pending.
pub async fn wait_for_table_status(
    client: &dyn DatabaseApi,
    name: &str,
    target: &[&str],
    failure: &[&str],
    config: &WaitConfig,
    cancel: &CancellationToken,
) -> Result<Table, WaitError<Table>> {
    wait_for_state(
        move || async move {
            let table = find_table_by_name(client, name).await?;
            let status = table.status.clone();
            Ok((table, status))
        },
        target,
        failure,
        config,
        cancel,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{SnapshotPage, TagPage, WireTag};
    use async_trait::async_trait;
    use nimbus_tags::Result;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Table that is invisible for two polls, then active.
    #[derive(Default)]
    struct LateTable {
        polls: AtomicUsize,
    }

    #[async_trait]
    impl DatabaseApi for LateTable {
        async fn list_tags_of_resource(
            &self,
            _arn: &str,
            _page_token: Option<&str>,
        ) -> Result<TagPage> {
            Ok(TagPage::default())
        }

        async fn tag_resource(&self, _arn: &str, _tags: &[WireTag]) -> Result<()> {
            Ok(())
        }

        async fn untag_resource(&self, _arn: &str, _keys: &[String]) -> Result<()> {
            Ok(())
        }

        async fn describe_table(&self, name: &str) -> Result<Option<Table>> {
            let n = self.polls.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                return Ok(None);
            }
            Ok(Some(Table {
                name: name.to_string(),
                arn: format!("nrn:database:table/{name}"),
                status: TABLE_STATUS_ACTIVE.to_string(),
            }))
        }

        async fn list_snapshots(
            &self,
            _table: &str,
            _page_token: Option<&str>,
        ) -> Result<SnapshotPage> {
            Ok(SnapshotPage::default())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn absence_counts_as_not_yet() {
        let svc = LateTable::default();
        let table = wait_for_table_status(
            &svc,
            "users",
            &[TABLE_STATUS_ACTIVE],
            &[],
            &WaitConfig::new(Duration::from_secs(1), Duration::from_secs(30)),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(table.status, TABLE_STATUS_ACTIVE);
        assert_eq!(svc.polls.load(Ordering::SeqCst), 3);
    }
}
