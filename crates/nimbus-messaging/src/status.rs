//! Waiter helper for queue lifecycle transitions

use crate::api::QueueApi;
use nimbus_tags::{CloudError, WaitConfig, WaitError, translate_not_found, wait_for_state};
use tokio_util::sync::CancellationToken;

pub const QUEUE_STATE_CREATING: &str = "creating";
pub const QUEUE_STATE_ACTIVE: &str = "active";
pub const QUEUE_STATE_DELETING: &str = "deleting";

const NOT_FOUND_CODES: &[&str] = &["QueueDoesNotExist"];

/// Poll a queue until it reaches one of `target` states.
///
/// Deleted queues vanish from the API rather than reporting a terminal
/// state, so a wait that should end when the queue is gone lists
/// [`nimbus_tags::STATE_ABSENT`] in `failure`.
pub async fn wait_for_queue_state(
    client: &dyn QueueApi,
    queue_url: &str,
    target: &[&str],
    failure: &[&str],
    config: &WaitConfig,
    cancel: &CancellationToken,
) -> Result<String, WaitError<String>> {
    wait_for_state(
        move || async move {
            let state = client
                .get_queue_state(queue_url)
                .await
                .map_err(|err| translate_not_found(err, NOT_FOUND_CODES, queue_url))?;
            Ok::<_, CloudError>((state.clone(), state))
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
    use async_trait::async_trait;
    use nimbus_tags::Result;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Queue that stays "creating" for two polls before going active.
    #[derive(Default)]
    struct SlowCreate {
        polls: AtomicUsize,
    }

    #[async_trait]
    impl QueueApi for SlowCreate {
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

        async fn list_queues(&self, _name_prefix: &str) -> Result<Vec<String>> {
            Ok(vec![])
        }

        async fn get_queue_state(&self, _queue_url: &str) -> Result<String> {
            let n = self.polls.fetch_add(1, Ordering::SeqCst);
            let state = if n < 2 {
                QUEUE_STATE_CREATING
            } else {
                QUEUE_STATE_ACTIVE
            };
            Ok(state.to_string())
        }
    }

    /// Queue that is active once, then gone from the API.
    #[derive(Default)]
    struct Draining {
        polls: AtomicUsize,
    }

    #[async_trait]
    impl QueueApi for Draining {
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

        async fn list_queues(&self, _name_prefix: &str) -> Result<Vec<String>> {
            Ok(vec![])
        }

        async fn get_queue_state(&self, _queue_url: &str) -> Result<String> {
            let n = self.polls.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                Ok(QUEUE_STATE_DELETING.to_string())
            } else {
                Err(CloudError::api("QueueDoesNotExist", "queue is gone"))
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn waits_through_creating_to_active() {
        let service = SlowCreate::default();
        let state = wait_for_queue_state(
            &service,
            "https://queue.api.nimbus.cloud/q/jobs",
            &[QUEUE_STATE_ACTIVE],
            &[],
            &WaitConfig::new(Duration::from_secs(1), Duration::from_secs(60)),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(state, QUEUE_STATE_ACTIVE);
        assert_eq!(service.polls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn listed_absence_ends_a_deletion_wait() {
        let service = Draining::default();
        let err = wait_for_queue_state(
            &service,
            "https://queue.api.nimbus.cloud/q/jobs",
            &[QUEUE_STATE_ACTIVE],
            &[nimbus_tags::STATE_ABSENT],
            &WaitConfig::new(Duration::from_secs(1), Duration::from_secs(60)),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            WaitError::Failure { ref state, .. } if state == nimbus_tags::STATE_ABSENT
        ));
        assert_eq!(service.polls.load(Ordering::SeqCst), 2);
    }
}
