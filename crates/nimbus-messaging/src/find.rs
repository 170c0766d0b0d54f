//! Queue lookup by name

use crate::api::QueueApi;
use nimbus_tags::{NotFoundError, Result};

/// Resolve a queue name to its URL.
///
/// The listing API only supports prefix matching, so the page is scanned
/// for the URL whose trailing segment equals `name` exactly. An empty
/// page or a prefix-only match is the absence signal; the service never
/// reports a not-found code for this call.
pub async fn find_queue_by_name(client: &dyn QueueApi, name: &str) -> Result<String> {
    let urls = client.list_queues(name).await?;

    urls.into_iter()
        .find(|url| url.rsplit('/').next() == Some(name))
        .ok_or_else(|| NotFoundError::empty_result(name).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::BTreeMap;

    struct TwoQueues;

    #[async_trait]
    impl QueueApi for TwoQueues {
        async fn list_queue_tags(
            &self,
            _queue_url: &str,
        ) -> Result<BTreeMap<String, Option<String>>> {
            Ok(BTreeMap::new())
        }

        async fn tag_queue(
            &self,
            _queue_url: &str,
            _tags: &BTreeMap<String, String>,
        ) -> Result<()> {
            Ok(())
        }

        async fn untag_queue(&self, _queue_url: &str, _keys: &[String]) -> Result<()> {
            Ok(())
        }

        async fn list_queues(&self, name_prefix: &str) -> Result<Vec<String>> {
            Ok(["jobs", "jobs-dead-letter"]
                .iter()
                .filter(|name| name.starts_with(name_prefix))
                .map(|name| format!("https://queue.api.nimbus.cloud/q/{name}"))
                .collect())
        }

        async fn get_queue_state(&self, _queue_url: &str) -> Result<String> {
            Ok("active".to_string())
        }
    }

    #[tokio::test]
    async fn exact_name_wins_over_prefix_siblings() {
        let url = find_queue_by_name(&TwoQueues, "jobs").await.unwrap();
        assert_eq!(url, "https://queue.api.nimbus.cloud/q/jobs");
    }

    #[tokio::test]
    async fn prefix_only_match_is_absent() {
        let err = find_queue_by_name(&TwoQueues, "jobs-dead").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn empty_page_is_absent() {
        let err = find_queue_by_name(&TwoQueues, "reports").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
