//! Resource lookups with uniform not-found classification

use crate::api::{ComputeApi, Instance};
use nimbus_tags::{NotFoundError, Result, translate_not_found};

const NOT_FOUND_CODES: &[&str] = &["InvalidInstanceId.NotFound", "InvalidInstanceId.Malformed"];

/// Fetch an instance's current remote state by id.
///
/// The service's not-found code and a structurally empty describe result
/// both become the not-found signal; every other error propagates
/// unchanged with the request attached.
pub async fn find_instance_by_id(client: &dyn ComputeApi, instance_id: &str) -> Result<Instance> {
    let ids = [instance_id.to_owned()];
    let instances = client
        .describe_instances(&ids)
        .await
        .map_err(|err| translate_not_found(err, NOT_FOUND_CODES, &ids))?;

    instances
        .into_iter()
        .next()
        .ok_or_else(|| NotFoundError::empty_result(&ids).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Filter, TagDescription, WireTag};
    use async_trait::async_trait;
    use nimbus_tags::CloudError;

    struct OneInstance;

    #[async_trait]
    impl ComputeApi for OneInstance {
        async fn describe_tags(&self, _filters: &[Filter]) -> Result<Vec<TagDescription>> {
            Ok(vec![])
        }

        async fn create_tags(&self, _ids: &[String], _tags: &[WireTag]) -> Result<()> {
            Ok(())
        }

        async fn delete_tags(&self, _ids: &[String], _keys: &[String]) -> Result<()> {
            Ok(())
        }

        async fn describe_instances(&self, instance_ids: &[String]) -> Result<Vec<Instance>> {
            match instance_ids.first().map(String::as_str) {
                Some("i-present") => Ok(vec![Instance {
                    instance_id: "i-present".into(),
                    state: "running".into(),
                    image_id: None,
                }]),
                Some("i-empty") => Ok(vec![]),
                Some("i-throttled") => Err(CloudError::api("Throttled", "slow down")),
                _ => Err(CloudError::api("InvalidInstanceId.NotFound", "no such id")),
            }
        }
    }

    #[tokio::test]
    async fn present_instance_is_returned() {
        let instance = find_instance_by_id(&OneInstance, "i-present").await.unwrap();
        assert_eq!(instance.state, "running");
    }

    #[tokio::test]
    async fn known_code_and_empty_page_both_classify_as_absent() {
        let by_code = find_instance_by_id(&OneInstance, "i-gone").await.unwrap_err();
        assert!(by_code.is_not_found());

        let by_empty = find_instance_by_id(&OneInstance, "i-empty").await.unwrap_err();
        assert!(by_empty.is_not_found());
    }

    #[tokio::test]
    async fn transport_class_errors_propagate() {
        let err = find_instance_by_id(&OneInstance, "i-throttled")
            .await
            .unwrap_err();
        assert!(!err.is_not_found());
    }
}
