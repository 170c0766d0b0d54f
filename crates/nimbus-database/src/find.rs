//! Table and snapshot lookups

use crate::api::{DatabaseApi, Table};
use nimbus_tags::{NotFoundError, Result, translate_not_found};

const NOT_FOUND_CODES: &[&str] = &["ResourceNotFoundException", "TableNotFoundException"];

/// Version reported for a snapshot that has never been published.
pub const SNAPSHOT_VERSION_UNPUBLISHED: &str = "$WORKING";

/// Fetch a table's current remote state by name.
///
/// A success envelope with no table payload counts as absence, not as
/// success with a null table.
pub async fn find_table_by_name(client: &dyn DatabaseApi, name: &str) -> Result<Table> {
    match client.describe_table(name).await {
        Ok(Some(table)) => Ok(table),
        Ok(None) => Err(NotFoundError::empty_result(name).into()),
        Err(err) => Err(translate_not_found(err, NOT_FOUND_CODES, name)),
    }
}

/// Latest published snapshot version of a table, or
/// [`SNAPSHOT_VERSION_UNPUBLISHED`] when nothing has been published yet.
///
/// Malformed version strings are skipped so one bad entry cannot block
/// the lookup, but they leave a warning instead of disappearing
/// silently.
pub async fn find_latest_snapshot_version(
    client: &dyn DatabaseApi,
    table: &str,
) -> Result<String> {
    let mut token: Option<String> = None;
    let mut latest: u64 = 0;

    loop {
        let page = client
            .list_snapshots(table, token.as_deref())
            .await
            .map_err(|err| translate_not_found(err, NOT_FOUND_CODES, table))?;

        for snapshot in page.snapshots {
            if snapshot.version == SNAPSHOT_VERSION_UNPUBLISHED {
                continue;
            }
            match snapshot.version.parse::<u64>() {
                Ok(version) if version > latest => latest = version,
                Ok(_) => {}
                Err(_) => {
                    tracing::warn!(
                        table,
                        snapshot = %snapshot.snapshot_id,
                        version = %snapshot.version,
                        "skipping snapshot with unparseable version"
                    );
                }
            }
        }

        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    if latest == 0 {
        Ok(SNAPSHOT_VERSION_UNPUBLISHED.to_string())
    } else {
        Ok(latest.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{SnapshotPage, SnapshotSummary, TagPage, WireTag};
    use async_trait::async_trait;
    use nimbus_tags::CloudError;

    struct Snapshots {
        table: Option<Table>,
        pages: Vec<SnapshotPage>,
    }

    #[async_trait]
    impl DatabaseApi for Snapshots {
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
            match name {
                "users" => Ok(self.table.clone()),
                "forbidden" => Err(CloudError::api("AccessDenied", "nope")),
                _ => Err(CloudError::api("TableNotFoundException", "no such table")),
            }
        }

        async fn list_snapshots(
            &self,
            _table: &str,
            page_token: Option<&str>,
        ) -> Result<SnapshotPage> {
            let index: usize = page_token.map_or(0, |t| t.parse().unwrap());
            Ok(self.pages.get(index).cloned().unwrap_or_default())
        }
    }

    fn snapshot(id: &str, version: &str) -> SnapshotSummary {
        SnapshotSummary {
            snapshot_id: id.to_string(),
            version: version.to_string(),
        }
    }

    fn service(pages: Vec<SnapshotPage>) -> Snapshots {
        Snapshots {
            table: Some(Table {
                name: "users".into(),
                arn: "nrn:database:table/users".into(),
                status: "active".into(),
            }),
            pages,
        }
    }

    #[tokio::test]
    async fn find_table_classifies_all_three_outcomes() {
        let svc = service(vec![]);

        assert!(find_table_by_name(&svc, "users").await.is_ok());
        assert!(
            find_table_by_name(&svc, "missing")
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(
            !find_table_by_name(&svc, "forbidden")
                .await
                .unwrap_err()
                .is_not_found()
        );

        let empty = Snapshots {
            table: None,
            pages: vec![],
        };
        assert!(
            find_table_by_name(&empty, "users")
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[tokio::test]
    async fn latest_version_spans_pages_and_skips_bad_entries() {
        let svc = service(vec![
            SnapshotPage {
                snapshots: vec![
                    snapshot("s-1", "3"),
                    snapshot("s-2", SNAPSHOT_VERSION_UNPUBLISHED),
                ],
                next_token: Some("1".into()),
            },
            SnapshotPage {
                snapshots: vec![snapshot("s-3", "not-a-number"), snapshot("s-4", "7")],
                next_token: None,
            },
        ]);

        let latest = find_latest_snapshot_version(&svc, "users").await.unwrap();
        assert_eq!(latest, "7");
    }

    #[tokio::test]
    async fn unpublished_table_reports_the_sentinel() {
        let svc = service(vec![SnapshotPage {
            snapshots: vec![snapshot("s-1", SNAPSHOT_VERSION_UNPUBLISHED)],
            next_token: None,
        }]);

        let latest = find_latest_snapshot_version(&svc, "users").await.unwrap();
        assert_eq!(latest, SNAPSHOT_VERSION_UNPUBLISHED);
    }
}
