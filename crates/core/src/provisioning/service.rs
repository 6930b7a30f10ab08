//! Provisioning service - control plane orchestration workflows

use std::sync::Arc;
use std::time::Duration;

use lattice_domain::constants::instance_status;
use lattice_domain::{
    CreateInstanceRequest, CreatedInstance, Instance, LatticeError, Result, Snapshot,
    UpdateInstanceRequest,
};
use tracing::{debug, warn};

use super::ports::ControlPlaneApi;
use crate::poll::{self, PollTimeout};

/// Default budget for an instance to converge (create, resize, pause, ...).
pub const DEFAULT_INSTANCE_TIMEOUT: Duration = Duration::from_secs(900);
/// Default budget for a snapshot to complete.
pub const DEFAULT_SNAPSHOT_TIMEOUT: Duration = Duration::from_secs(300);

const INSTANCE_POLL_INTERVAL: Duration = Duration::from_secs(1);
const SNAPSHOT_POLL_INTERVAL: Duration = Duration::from_secs(1);
const DELETION_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Result of a create-and-wait workflow.
///
/// `credentials` is the creation envelope - the only place the database
/// password ever appears. `instance` is the converged (running) detail.
#[derive(Debug, Clone)]
pub struct ProvisionedInstance {
    pub credentials: CreatedInstance,
    pub instance: Instance,
}

/// Composes typed control plane operations into blocking workflows.
///
/// Each workflow issues the mutation and then polls the corresponding read
/// endpoint until the entity converges or the deadline elapses. Deadlines
/// and poll intervals are owned here so callers never hand-roll polling
/// loops.
pub struct ProvisioningService {
    api: Arc<dyn ControlPlaneApi>,
    instance_timeout: Duration,
    snapshot_timeout: Duration,
    instance_poll_interval: Duration,
    snapshot_poll_interval: Duration,
    deletion_poll_interval: Duration,
}

impl ProvisioningService {
    /// Create a service with the default deadlines (900s for instances,
    /// 300s for snapshots).
    pub fn new(api: Arc<dyn ControlPlaneApi>) -> Self {
        Self {
            api,
            instance_timeout: DEFAULT_INSTANCE_TIMEOUT,
            snapshot_timeout: DEFAULT_SNAPSHOT_TIMEOUT,
            instance_poll_interval: INSTANCE_POLL_INTERVAL,
            snapshot_poll_interval: SNAPSHOT_POLL_INTERVAL,
            deletion_poll_interval: DELETION_POLL_INTERVAL,
        }
    }

    /// Override the instance convergence deadline.
    pub fn with_instance_timeout(mut self, timeout: Duration) -> Self {
        self.instance_timeout = timeout;
        self
    }

    /// Override the snapshot convergence deadline.
    pub fn with_snapshot_timeout(mut self, timeout: Duration) -> Self {
        self.snapshot_timeout = timeout;
        self
    }

    /// Override the poll intervals. Primarily useful for tests that want
    /// sub-millisecond polling against a fake control plane.
    pub fn with_poll_intervals(
        mut self,
        instance: Duration,
        snapshot: Duration,
        deletion: Duration,
    ) -> Self {
        self.instance_poll_interval = instance;
        self.snapshot_poll_interval = snapshot;
        self.deletion_poll_interval = deletion;
        self
    }

    /// Access the underlying typed API for operations that need no
    /// convergence handling (tenant listing, plain reads).
    pub fn api(&self) -> &Arc<dyn ControlPlaneApi> {
        &self.api
    }

    /// Create an instance and block until it is running.
    ///
    /// When the request clones from a source snapshot, the snapshot must
    /// have completed first; the workflow waits for that before issuing
    /// the create.
    pub async fn create_instance(
        &self,
        request: CreateInstanceRequest,
    ) -> Result<ProvisionedInstance> {
        if let (Some(source_instance), Some(source_snapshot)) =
            (request.source_instance_id.as_deref(), request.source_snapshot_id.as_deref())
        {
            debug!(source_instance, source_snapshot, "waiting for clone source snapshot");
            self.wait_until_snapshot(source_instance, source_snapshot, Snapshot::is_completed)
                .await?;
        }

        let credentials = self.api.create_instance(&request).await?;
        debug!(instance_id = %credentials.id, "instance creation accepted");

        let instance =
            self.wait_until_instance_in_state(&credentials.id, instance_status::RUNNING).await?;

        Ok(ProvisionedInstance { credentials, instance })
    }

    /// Apply a partial update and block until the control plane reports
    /// the requested values and the instance has settled (running or
    /// paused) again.
    pub async fn update_instance(
        &self,
        instance_id: &str,
        request: UpdateInstanceRequest,
    ) -> Result<Instance> {
        if request.is_empty() {
            return self.api.get_instance(instance_id).await;
        }

        self.api.patch_instance(instance_id, &request).await?;

        let expected_name = request.name.clone();
        let expected_memory = request.memory.clone();
        self.wait_until_instance(instance_id, move |instance| {
            expected_name.as_deref().map_or(true, |name| instance.name == name)
                && expected_memory.as_deref().map_or(true, |memory| instance.memory == memory)
                && (instance.is_in_state(instance_status::RUNNING)
                    || instance.is_in_state(instance_status::PAUSED))
        })
        .await
    }

    /// Pause an instance and block until it reports `paused`.
    pub async fn pause_instance(&self, instance_id: &str) -> Result<Instance> {
        self.api.pause_instance(instance_id).await?;
        self.wait_until_instance_in_state(instance_id, instance_status::PAUSED).await
    }

    /// Resume an instance and block until it reports `running`.
    pub async fn resume_instance(&self, instance_id: &str) -> Result<Instance> {
        self.api.resume_instance(instance_id).await?;
        self.wait_until_instance_in_state(instance_id, instance_status::RUNNING).await
    }

    /// Pause when the instance is currently running; otherwise return the
    /// current state untouched. The control plane rejects pause requests
    /// in any other state.
    pub async fn ensure_paused(&self, instance_id: &str) -> Result<Instance> {
        let instance = self.api.get_instance(instance_id).await?;
        if instance.can_be_paused() {
            return self.pause_instance(instance_id).await;
        }
        Ok(instance)
    }

    /// Resume when the instance is currently paused; otherwise return the
    /// current state untouched.
    pub async fn ensure_running(&self, instance_id: &str) -> Result<Instance> {
        let instance = self.api.get_instance(instance_id).await?;
        if instance.can_be_resumed() {
            return self.resume_instance(instance_id).await;
        }
        Ok(instance)
    }

    /// Delete an instance and block until the control plane confirms the
    /// absence with a not-found response.
    pub async fn delete_instance(&self, instance_id: &str) -> Result<()> {
        self.api.delete_instance(instance_id).await?;
        self.wait_until_instance_deleted(instance_id).await
    }

    /// Take an ad-hoc snapshot and block until it has completed.
    pub async fn create_snapshot(&self, instance_id: &str) -> Result<Snapshot> {
        let snapshot_id = self.api.create_snapshot(instance_id).await?;
        debug!(instance_id, snapshot_id = %snapshot_id, "snapshot creation accepted");
        self.wait_until_snapshot(instance_id, &snapshot_id, Snapshot::is_completed).await
    }

    /// Most recent snapshot of an instance, by RFC 3339 timestamp.
    ///
    /// Snapshots with unparseable timestamps are skipped with a warning
    /// rather than failing the whole lookup.
    pub async fn latest_snapshot(&self, instance_id: &str) -> Result<Option<Snapshot>> {
        let snapshots = self.api.list_snapshots(instance_id).await?;

        Ok(snapshots
            .into_iter()
            .filter_map(|snapshot| match snapshot.parsed_timestamp() {
                Some(timestamp) => Some((timestamp, snapshot)),
                None => {
                    warn!(
                        instance_id,
                        snapshot_id = %snapshot.snapshot_id,
                        timestamp = %snapshot.timestamp,
                        "skipping snapshot with unparseable timestamp"
                    );
                    None
                }
            })
            .max_by_key(|(timestamp, _)| *timestamp)
            .map(|(_, snapshot)| snapshot))
    }

    /// Poll instance detail until `condition` holds for it.
    ///
    /// Transient fetch errors do not abort the wait; the loop keeps
    /// polling until the condition holds or the deadline elapses.
    pub async fn wait_until_instance<C>(&self, instance_id: &str, condition: C) -> Result<Instance>
    where
        C: Fn(&Instance) -> bool,
    {
        let outcome = poll::wait_until(
            || self.api.get_instance(instance_id),
            |result| matches!(result, Ok(instance) if condition(instance)),
            self.instance_poll_interval,
            self.instance_timeout,
        )
        .await;

        match outcome {
            Ok(Ok(instance)) => Ok(instance),
            Ok(Err(err)) => Err(err),
            Err(timeout) => {
                if let Ok(instance) = &timeout.last {
                    warn!(
                        instance_id,
                        status = %instance.status,
                        "instance did not reach the desired state in time"
                    );
                }
                Err(Self::timeout_error(timeout))
            }
        }
    }

    /// Poll instance detail until its status equals `status`
    /// (case-insensitively).
    pub async fn wait_until_instance_in_state(
        &self,
        instance_id: &str,
        status: &str,
    ) -> Result<Instance> {
        self.wait_until_instance(instance_id, |instance| instance.is_in_state(status)).await
    }

    /// Poll instance detail until the control plane reports it absent.
    ///
    /// The predicate keys off the not-found error signal - a body saying
    /// "deleted" with a 200 status does not count.
    pub async fn wait_until_instance_deleted(&self, instance_id: &str) -> Result<()> {
        let outcome = poll::wait_until(
            || self.api.get_instance(instance_id),
            |result| matches!(result, Err(err) if err.is_not_found()),
            self.deletion_poll_interval,
            self.instance_timeout,
        )
        .await;

        match outcome {
            Ok(_) => Ok(()),
            Err(timeout) => {
                if let Ok(instance) = &timeout.last {
                    warn!(
                        instance_id,
                        status = %instance.status,
                        "instance still present after the deletion deadline"
                    );
                }
                Err(Self::timeout_error(timeout))
            }
        }
    }

    /// Poll one snapshot until `condition` holds for it.
    pub async fn wait_until_snapshot<C>(
        &self,
        instance_id: &str,
        snapshot_id: &str,
        condition: C,
    ) -> Result<Snapshot>
    where
        C: Fn(&Snapshot) -> bool,
    {
        let outcome = poll::wait_until(
            || self.api.get_snapshot(instance_id, snapshot_id),
            |result| matches!(result, Ok(snapshot) if condition(snapshot)),
            self.snapshot_poll_interval,
            self.snapshot_timeout,
        )
        .await;

        match outcome {
            Ok(Ok(snapshot)) => Ok(snapshot),
            Ok(Err(err)) => Err(err),
            Err(timeout) => {
                if let Ok(snapshot) = &timeout.last {
                    warn!(
                        instance_id,
                        snapshot_id,
                        status = %snapshot.status,
                        "snapshot did not reach the desired state in time"
                    );
                }
                Err(Self::timeout_error(timeout))
            }
        }
    }

    fn timeout_error<T>(timeout: PollTimeout<T, LatticeError>) -> LatticeError {
        LatticeError::WaitTimeout { waited: timeout.waited, attempts: timeout.attempts }
    }
}
