//! Waiter helpers for instance state transitions

use crate::api::{ComputeApi, Instance};
use crate::find::find_instance_by_id;
use nimbus_tags::{WaitConfig, WaitError, wait_for_state};
use tokio_util::sync::CancellationToken;

pub const INSTANCE_STATE_PENDING: &str = "pending";
pub const INSTANCE_STATE_RUNNING: &str = "running";
pub const INSTANCE_STATE_STOPPING: &str = "stopping";
pub const INSTANCE_STATE_STOPPED: &str = "stopped";
pub const INSTANCE_STATE_TERMINATED: &str = "terminated";

/// Poll an instance until it reaches one of `target` states.
///
/// An instance the describe call cannot see yet counts as still pending;
/// the freshly created id often lags behind the create response.
pub async fn wait_for_instance_state(
    client: &dyn ComputeApi,
    instance_id: &str,
    target: &[&str],
    failure: &[&str],
    config: &WaitConfig,
    cancel: &CancellationToken,
) -> Result<Instance, WaitError<Instance>> {
    wait_for_state(
        move || async move {
            let instance = find_instance_by_id(client, instance_id).await?;
            let state = instance.state.clone();
            Ok((instance, state))
        },
        target,
        failure,
        config,
        cancel,
    )
    .await
}
