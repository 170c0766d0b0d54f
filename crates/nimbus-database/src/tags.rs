//! Tag adapter for database resources

use crate::api::{DatabaseApi, TagPage, WireTag};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use futures_util::stream;
use nimbus_tags::{CloudError, Result, TagAdapter, TagSet, translate_not_found};
use std::collections::BTreeSet;

const NOT_FOUND_CODES: &[&str] = &["ResourceNotFoundException", "TableNotFoundException"];

/// [`TagAdapter`] over the paginated database tagging API.
pub struct DatabaseTags;

/// Drive the page-token chain as a lazy stream and fold it into one set.
///
/// Duplicate keys across page boundaries resolve last-write-wins like
/// everywhere else.
async fn list_all_pages(client: &dyn DatabaseApi, arn: &str) -> Result<TagSet> {
    enum State {
        Next(Option<String>),
        Done,
    }

    let pages = stream::try_unfold(State::Next(None), move |state| async move {
        match state {
            State::Done => Ok(None),
            State::Next(token) => {
                let page: TagPage = client.list_tags_of_resource(arn, token.as_deref()).await?;
                let next = match page.next_token.clone() {
                    Some(t) => State::Next(Some(t)),
                    None => State::Done,
                };
                Ok(Some((page, next)))
            }
        }
    });

    let folded = pages
        .try_fold(TagSet::new(), |mut acc, page| async move {
            for tag in page.tags {
                acc.insert(tag.key, tag.value.unwrap_or_default());
            }
            Ok::<_, CloudError>(acc)
        })
        .await?;

    Ok(folded.ignore_system())
}

#[async_trait]
impl TagAdapter for DatabaseTags {
    type Client = dyn DatabaseApi;
    type Identity = str;

    async fn list_tags(&self, client: &Self::Client, identity: &str) -> Result<TagSet> {
        list_all_pages(client, identity)
            .await
            .map_err(|err| translate_not_found(err, NOT_FOUND_CODES, identity))
    }

    async fn update_tags(
        &self,
        client: &Self::Client,
        identity: &str,
        to_add: &TagSet,
        to_remove: &BTreeSet<String>,
    ) -> Result<()> {
        let keys: Vec<String> = to_remove
            .iter()
            .filter(|k| !k.starts_with(nimbus_tags::SYSTEM_TAG_PREFIX))
            .cloned()
            .collect();
        if !keys.is_empty() {
            tracing::debug!(resource = identity, count = keys.len(), "untagging resource");
            client
                .untag_resource(identity, &keys)
                .await
                .map_err(|err| translate_not_found(err, NOT_FOUND_CODES, identity))?;
        }

        let adds: Vec<WireTag> = to_add
            .ignore_system()
            .iter()
            .map(|t| WireTag {
                key: t.key,
                value: Some(t.value),
            })
            .collect();
        if !adds.is_empty() {
            tracing::debug!(resource = identity, count = adds.len(), "tagging resource");
            client
                .tag_resource(identity, &adds)
                .await
                .map_err(|err| translate_not_found(err, NOT_FOUND_CODES, identity))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{SnapshotPage, Table};
    use std::sync::Mutex;

    /// Serves tags two per page to force the pagination path.
    pub(crate) struct PagedDatabase {
        pub tags: Mutex<Vec<WireTag>>,
        pub page_size: usize,
        pub list_calls: Mutex<usize>,
    }

    impl PagedDatabase {
        pub fn new(tags: Vec<WireTag>, page_size: usize) -> Self {
            Self {
                tags: Mutex::new(tags),
                page_size,
                list_calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl DatabaseApi for PagedDatabase {
        async fn list_tags_of_resource(
            &self,
            _arn: &str,
            page_token: Option<&str>,
        ) -> Result<TagPage> {
            *self.list_calls.lock().unwrap() += 1;
            let tags = self.tags.lock().unwrap();
            let offset: usize = page_token.map_or(0, |t| t.parse().unwrap());
            let page: Vec<WireTag> =
                tags.iter().skip(offset).take(self.page_size).cloned().collect();
            let next = offset + page.len();
            let next_token = (next < tags.len()).then(|| next.to_string());
            Ok(TagPage {
                tags: page,
                next_token,
            })
        }

        async fn tag_resource(&self, _arn: &str, tags: &[WireTag]) -> Result<()> {
            assert!(!tags.is_empty(), "empty tag batch");
            let mut stored = self.tags.lock().unwrap();
            for tag in tags {
                stored.retain(|t| t.key != tag.key);
                stored.push(tag.clone());
            }
            Ok(())
        }

        async fn untag_resource(&self, _arn: &str, keys: &[String]) -> Result<()> {
            assert!(!keys.is_empty(), "empty untag batch");
            self.tags
                .lock()
                .unwrap()
                .retain(|t| !keys.contains(&t.key));
            Ok(())
        }

        async fn describe_table(&self, _name: &str) -> Result<Option<Table>> {
            Err(CloudError::api("TableNotFoundException", "not used here"))
        }

        async fn list_snapshots(
            &self,
            _table: &str,
            _page_token: Option<&str>,
        ) -> Result<SnapshotPage> {
            Ok(SnapshotPage::default())
        }
    }

    fn wire(key: &str, value: Option<&str>) -> WireTag {
        WireTag {
            key: key.to_string(),
            value: value.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn aggregates_every_page_before_returning() {
        let fake = PagedDatabase::new(
            vec![
                wire("a", Some("1")),
                wire("b", Some("2")),
                wire("c", Some("3")),
                wire("d", None),
                wire("nimbus:origin", Some("controlplane")),
            ],
            2,
        );

        let tags = DatabaseTags
            .list_tags(&fake, "nrn:database:table/users")
            .await
            .unwrap();

        assert_eq!(*fake.list_calls.lock().unwrap(), 3);
        assert_eq!(tags.len(), 4);
        assert_eq!(tags.key_value("d"), Some(""));
        assert!(!tags.key_exists("nimbus:origin"));
    }

    #[tokio::test]
    async fn duplicate_key_across_pages_takes_the_later_value() {
        let fake = PagedDatabase::new(
            vec![wire("env", Some("dev")), wire("x", Some("1")), wire("env", Some("prod"))],
            2,
        );

        let tags = DatabaseTags
            .list_tags(&fake, "nrn:database:table/users")
            .await
            .unwrap();
        assert_eq!(tags.key_value("env"), Some("prod"));
    }

    #[tokio::test]
    async fn reconcile_via_paged_adapter_is_idempotent() {
        let fake = PagedDatabase::new(vec![wire("stale", Some("1"))], 2);
        let desired: nimbus_tags::TagSet = [("env", "prod")].into_iter().collect();

        nimbus_tags::reconcile(&DatabaseTags, &fake as &dyn DatabaseApi, "nrn:t", &desired)
            .await
            .unwrap();
        let calls_after_first = *fake.list_calls.lock().unwrap();

        nimbus_tags::reconcile(&DatabaseTags, &fake as &dyn DatabaseApi, "nrn:t", &desired)
            .await
            .unwrap();

        // Second pass lists again but finds nothing to change.
        assert!(*fake.list_calls.lock().unwrap() > calls_after_first);
        let stored = fake.tags.lock().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0], wire("env", Some("prod")));
    }
}
