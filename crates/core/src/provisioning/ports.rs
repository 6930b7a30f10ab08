//! Control plane port interfaces

use async_trait::async_trait;
use lattice_domain::{
    CreateInstanceRequest, CreatedInstance, Instance, Result, Snapshot, Tenant,
    UpdateInstanceRequest,
};

/// Snapshot identifier returned by snapshot creation
pub type SnapshotId = String;

/// Typed operations against the control plane, one per remote endpoint.
///
/// Mutations are asynchronous on the remote side: a successful call means
/// the control plane *accepted* the request, not that the instance has
/// converged. Use [`crate::ProvisioningService`] to wait for convergence.
///
/// Reads surface the remote not-found condition as
/// [`lattice_domain::LatticeError::NotFound`] so deletion confirmation can
/// key off the HTTP status rather than response content.
#[async_trait]
pub trait ControlPlaneApi: Send + Sync {
    /// List the tenants the credential can create instances under.
    async fn list_tenants(&self) -> Result<Vec<Tenant>>;

    /// Request creation of a new instance. The returned envelope is the
    /// only place the database password is ever exposed.
    async fn create_instance(&self, request: &CreateInstanceRequest) -> Result<CreatedInstance>;

    /// Fetch instance detail by id.
    async fn get_instance(&self, instance_id: &str) -> Result<Instance>;

    /// Request deletion of an instance. Deletion itself is asynchronous;
    /// the instance keeps existing (status `destroying`) until the control
    /// plane finishes.
    async fn delete_instance(&self, instance_id: &str) -> Result<Instance>;

    /// Apply a partial update (name, memory, CDC enrichment mode).
    async fn patch_instance(
        &self,
        instance_id: &str,
        request: &UpdateInstanceRequest,
    ) -> Result<Instance>;

    /// Request a pause of a running instance.
    async fn pause_instance(&self, instance_id: &str) -> Result<Instance>;

    /// Request a resume of a paused instance.
    async fn resume_instance(&self, instance_id: &str) -> Result<Instance>;

    /// List all snapshots of an instance.
    async fn list_snapshots(&self, instance_id: &str) -> Result<Vec<Snapshot>>;

    /// Fetch one snapshot by id.
    async fn get_snapshot(&self, instance_id: &str, snapshot_id: &str) -> Result<Snapshot>;

    /// Request an ad-hoc snapshot; returns the id of the snapshot being
    /// taken.
    async fn create_snapshot(&self, instance_id: &str) -> Result<SnapshotId>;
}
