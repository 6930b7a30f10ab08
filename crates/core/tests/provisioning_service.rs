//! Integration tests for ProvisioningService against a scripted fake
//! control plane.
//!
//! **Coverage:**
//! - Create workflow: accepted creation -> poll until running
//! - Clone workflow: source snapshot must complete before the create
//! - Deletion confirmation keyed off the not-found signal
//! - Pause/resume guards (no-op when already in the desired state)
//! - Update convergence on name/memory
//! - Convergence-timeout surfaced distinctly
//! - Latest-snapshot selection by RFC 3339 timestamp
//!
//! No network involved; the fake returns a scripted sequence of states so
//! fetch counts are exact.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lattice_core::{ControlPlaneApi, ProvisioningService, SnapshotId};
use lattice_domain::{
    CreateInstanceRequest, CreatedInstance, Instance, LatticeError, Result, Snapshot, Tenant,
    UpdateInstanceRequest,
};

/// One scripted response for `get_instance`. The final entry repeats once
/// the script is exhausted.
enum ScriptedGet {
    Instance(Instance),
    NotFound,
}

#[derive(Default)]
struct FakeControlPlane {
    instance_script: Vec<ScriptedGet>,
    snapshot_script: Vec<Snapshot>,
    snapshot_list: Vec<Snapshot>,

    get_instance_calls: AtomicU32,
    get_snapshot_calls: AtomicU32,
    create_calls: AtomicU32,
    patch_calls: AtomicU32,
    pause_calls: AtomicU32,
    resume_calls: AtomicU32,
    delete_calls: AtomicU32,

    last_create_request: Mutex<Option<CreateInstanceRequest>>,
    last_patch_request: Mutex<Option<UpdateInstanceRequest>>,
}

impl FakeControlPlane {
    fn with_instance_script(script: Vec<ScriptedGet>) -> Self {
        Self { instance_script: script, ..Default::default() }
    }

    fn scripted<T: Clone>(script: &[T], call: u32) -> Option<T> {
        if script.is_empty() {
            return None;
        }
        let index = (call as usize).min(script.len() - 1);
        Some(script[index].clone())
    }
}

#[async_trait]
impl ControlPlaneApi for FakeControlPlane {
    async fn list_tenants(&self) -> Result<Vec<Tenant>> {
        Ok(vec![Tenant { id: "tenant-1".to_string(), name: "Staging".to_string() }])
    }

    async fn create_instance(&self, request: &CreateInstanceRequest) -> Result<CreatedInstance> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_create_request.lock().expect("lock") = Some(request.clone());
        Ok(created_instance("abc"))
    }

    async fn get_instance(&self, instance_id: &str) -> Result<Instance> {
        let call = self.get_instance_calls.fetch_add(1, Ordering::SeqCst);
        let index = (call as usize).min(self.instance_script.len().saturating_sub(1));
        match self.instance_script.get(index) {
            Some(ScriptedGet::Instance(instance)) => Ok(instance.clone()),
            Some(ScriptedGet::NotFound) => {
                Err(LatticeError::NotFound(format!("instances/{instance_id}")))
            }
            None => Err(LatticeError::Internal("unscripted get_instance call".to_string())),
        }
    }

    async fn delete_instance(&self, _instance_id: &str) -> Result<Instance> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        Ok(instance("abc", "destroying"))
    }

    async fn patch_instance(
        &self,
        _instance_id: &str,
        request: &UpdateInstanceRequest,
    ) -> Result<Instance> {
        self.patch_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_patch_request.lock().expect("lock") = Some(request.clone());
        Ok(instance("abc", "updating"))
    }

    async fn pause_instance(&self, _instance_id: &str) -> Result<Instance> {
        self.pause_calls.fetch_add(1, Ordering::SeqCst);
        Ok(instance("abc", "pausing"))
    }

    async fn resume_instance(&self, _instance_id: &str) -> Result<Instance> {
        self.resume_calls.fetch_add(1, Ordering::SeqCst);
        Ok(instance("abc", "resuming"))
    }

    async fn list_snapshots(&self, _instance_id: &str) -> Result<Vec<Snapshot>> {
        Ok(self.snapshot_list.clone())
    }

    async fn get_snapshot(&self, _instance_id: &str, _snapshot_id: &str) -> Result<Snapshot> {
        let call = self.get_snapshot_calls.fetch_add(1, Ordering::SeqCst);
        Self::scripted(&self.snapshot_script, call)
            .ok_or_else(|| LatticeError::Internal("unscripted get_snapshot call".to_string()))
    }

    async fn create_snapshot(&self, _instance_id: &str) -> Result<SnapshotId> {
        Ok("snap-1".to_string())
    }
}

fn instance(id: &str, status: &str) -> Instance {
    instance_with_memory(id, status, "1GB")
}

fn instance_with_memory(id: &str, status: &str, memory: &str) -> Instance {
    Instance {
        id: id.to_string(),
        name: "my-instance".to_string(),
        status: status.to_string(),
        tenant_id: "tenant-1".to_string(),
        cloud_provider: "gcp".to_string(),
        connection_url: format!("lattice+s://{id}.db.lattice.io"),
        region: "europe-west1".to_string(),
        instance_type: "free-db".to_string(),
        memory: memory.to_string(),
        storage: None,
        created_at: None,
        metrics_integration_url: None,
        graph_nodes: None,
        graph_relationships: None,
        secondaries_count: None,
        cdc_enrichment_mode: None,
        vector_optimized: None,
        graph_analytics_plugin: None,
    }
}

fn created_instance(id: &str) -> CreatedInstance {
    CreatedInstance {
        id: id.to_string(),
        name: "my-instance".to_string(),
        tenant_id: "tenant-1".to_string(),
        cloud_provider: "gcp".to_string(),
        connection_url: format!("lattice+s://{id}.db.lattice.io"),
        region: "europe-west1".to_string(),
        instance_type: "free-db".to_string(),
        username: "admin".to_string(),
        password: "generated-once".to_string(),
    }
}

fn snapshot(id: &str, status: &str, timestamp: &str) -> Snapshot {
    Snapshot {
        instance_id: "abc".to_string(),
        snapshot_id: id.to_string(),
        profile: "AdHoc".to_string(),
        status: status.to_string(),
        timestamp: timestamp.to_string(),
    }
}

fn fast_service(api: Arc<FakeControlPlane>) -> ProvisioningService {
    ProvisioningService::new(api)
        .with_poll_intervals(
            Duration::from_millis(1),
            Duration::from_millis(1),
            Duration::from_millis(1),
        )
        .with_instance_timeout(Duration::from_secs(5))
        .with_snapshot_timeout(Duration::from_secs(5))
}

#[tokio::test]
async fn create_instance_polls_until_running() {
    let api = Arc::new(FakeControlPlane::with_instance_script(vec![
        ScriptedGet::Instance(instance("abc", "creating")),
        ScriptedGet::Instance(instance("abc", "creating")),
        ScriptedGet::Instance(instance("abc", "running")),
    ]));
    let service = fast_service(Arc::clone(&api));

    let request =
        CreateInstanceRequest::new("5", "europe-west1", "1GB", "my-instance", "free-db", "tenant-1", "gcp");
    let provisioned = service.create_instance(request).await.expect("instance should provision");

    assert_eq!(provisioned.credentials.id, "abc");
    assert_eq!(provisioned.credentials.password, "generated-once");
    assert!(provisioned.instance.is_in_state("running"));
    assert_eq!(api.get_instance_calls.load(Ordering::SeqCst), 3, "exactly three polls");
    assert_eq!(api.create_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn create_instance_waits_for_clone_source_snapshot() {
    let mut api = FakeControlPlane::with_instance_script(vec![ScriptedGet::Instance(instance(
        "abc", "running",
    ))]);
    api.snapshot_script = vec![
        snapshot("snap-1", "InProgress", "2024-07-10T08:00:00Z"),
        snapshot("snap-1", "Completed", "2024-07-10T08:05:00Z"),
    ];
    let api = Arc::new(api);
    let service = fast_service(Arc::clone(&api));

    let mut request =
        CreateInstanceRequest::new("5", "europe-west1", "8GB", "clone", "enterprise-db", "tenant-1", "gcp");
    request.source_instance_id = Some("db1d1234".to_string());
    request.source_snapshot_id = Some("snap-1".to_string());

    service.create_instance(request).await.expect("clone should provision");

    assert_eq!(api.get_snapshot_calls.load(Ordering::SeqCst), 2, "polled until completed");
    let captured = api.last_create_request.lock().expect("lock").clone();
    let captured = captured.expect("create request captured");
    assert_eq!(captured.source_snapshot_id.as_deref(), Some("snap-1"));
}

#[tokio::test]
async fn delete_instance_confirms_absence_via_not_found() {
    let api = Arc::new(FakeControlPlane::with_instance_script(vec![
        ScriptedGet::Instance(instance("abc", "destroying")),
        ScriptedGet::NotFound,
    ]));
    let service = fast_service(Arc::clone(&api));

    service.delete_instance("abc").await.expect("deletion should confirm");

    assert_eq!(api.delete_calls.load(Ordering::SeqCst), 1);
    assert_eq!(api.get_instance_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn deletion_ignores_status_strings_in_bodies() {
    // A control plane that keeps answering 200 with a terminal-sounding
    // status must not satisfy the deletion predicate.
    let api = Arc::new(FakeControlPlane::with_instance_script(vec![ScriptedGet::Instance(
        instance("abc", "deleted"),
    )]));
    let service = ProvisioningService::new(api.clone())
        .with_poll_intervals(
            Duration::from_millis(1),
            Duration::from_millis(1),
            Duration::from_millis(1),
        )
        .with_instance_timeout(Duration::from_millis(30));

    let err = service.wait_until_instance_deleted("abc").await.err().expect("must time out");
    assert!(err.is_wait_timeout(), "got {err:?}");
}

#[tokio::test]
async fn wait_timeout_is_distinguishable() {
    let api = Arc::new(FakeControlPlane::with_instance_script(vec![ScriptedGet::Instance(
        instance("abc", "creating"),
    )]));
    let service = ProvisioningService::new(api.clone())
        .with_poll_intervals(
            Duration::from_millis(5),
            Duration::from_millis(5),
            Duration::from_millis(5),
        )
        .with_instance_timeout(Duration::from_millis(25));

    let err = service
        .wait_until_instance_in_state("abc", "running")
        .await
        .err()
        .expect("must time out");

    assert!(err.is_wait_timeout(), "got {err:?}");
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn ensure_paused_is_a_no_op_when_already_paused() {
    let api = Arc::new(FakeControlPlane::with_instance_script(vec![ScriptedGet::Instance(
        instance("abc", "Paused"),
    )]));
    let service = fast_service(Arc::clone(&api));

    let result = service.ensure_paused("abc").await.expect("should succeed");

    assert!(result.can_be_resumed());
    assert_eq!(api.pause_calls.load(Ordering::SeqCst), 0, "no pause issued");
}

#[tokio::test]
async fn ensure_paused_pauses_a_running_instance() {
    let api = Arc::new(FakeControlPlane::with_instance_script(vec![
        ScriptedGet::Instance(instance("abc", "running")),
        ScriptedGet::Instance(instance("abc", "pausing")),
        ScriptedGet::Instance(instance("abc", "paused")),
    ]));
    let service = fast_service(Arc::clone(&api));

    let result = service.ensure_paused("abc").await.expect("should pause");

    assert!(result.is_in_state("paused"));
    assert_eq!(api.pause_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn ensure_running_resumes_a_paused_instance() {
    let api = Arc::new(FakeControlPlane::with_instance_script(vec![
        ScriptedGet::Instance(instance("abc", "paused")),
        ScriptedGet::Instance(instance("abc", "resuming")),
        ScriptedGet::Instance(instance("abc", "running")),
    ]));
    let service = fast_service(Arc::clone(&api));

    let result = service.ensure_running("abc").await.expect("should resume");

    assert!(result.is_in_state("running"));
    assert_eq!(api.resume_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn update_instance_waits_for_requested_values() {
    let api = Arc::new(FakeControlPlane::with_instance_script(vec![
        ScriptedGet::Instance(instance_with_memory("abc", "updating", "1GB")),
        ScriptedGet::Instance(instance_with_memory("abc", "updating", "4GB")),
        ScriptedGet::Instance(instance_with_memory("abc", "running", "4GB")),
    ]));
    let service = fast_service(Arc::clone(&api));

    let update =
        UpdateInstanceRequest { memory: Some("4GB".to_string()), ..Default::default() };
    let result = service.update_instance("abc", update).await.expect("should converge");

    assert_eq!(result.memory, "4GB");
    assert!(result.is_in_state("running"));
    assert_eq!(api.patch_calls.load(Ordering::SeqCst), 1);
    assert_eq!(api.get_instance_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn empty_update_reads_without_patching() {
    let api = Arc::new(FakeControlPlane::with_instance_script(vec![ScriptedGet::Instance(
        instance("abc", "running"),
    )]));
    let service = fast_service(Arc::clone(&api));

    let result = service
        .update_instance("abc", UpdateInstanceRequest::default())
        .await
        .expect("should read current state");

    assert!(result.is_in_state("running"));
    assert_eq!(api.patch_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn create_snapshot_waits_until_completed() {
    let mut api = FakeControlPlane::default();
    api.snapshot_script = vec![
        snapshot("snap-1", "Pending", "2024-07-10T08:00:00Z"),
        snapshot("snap-1", "InProgress", "2024-07-10T08:01:00Z"),
        snapshot("snap-1", "Completed", "2024-07-10T08:02:00Z"),
    ];
    let api = Arc::new(api);
    let service = fast_service(Arc::clone(&api));

    let result = service.create_snapshot("abc").await.expect("snapshot should complete");

    assert!(result.is_completed());
    assert_eq!(api.get_snapshot_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn latest_snapshot_orders_by_rfc3339_timestamp() {
    let mut api = FakeControlPlane::default();
    api.snapshot_list = vec![
        snapshot("snap-old", "Completed", "2024-07-09T22:00:00Z"),
        // 15:04 on the 10th is later than 08:00 even though a 12-hour
        // parse would read it as 03:04.
        snapshot("snap-new", "Completed", "2024-07-10T15:04:05Z"),
        snapshot("snap-morning", "Completed", "2024-07-10T08:00:00Z"),
        snapshot("snap-broken", "Completed", "not-a-timestamp"),
    ];
    let api = Arc::new(api);
    let service = fast_service(api);

    let latest = service.latest_snapshot("abc").await.expect("listing should succeed");

    assert_eq!(latest.expect("snapshots exist").snapshot_id, "snap-new");
}

#[tokio::test]
async fn latest_snapshot_is_none_without_snapshots() {
    let api = Arc::new(FakeControlPlane::default());
    let service = fast_service(api);

    let latest = service.latest_snapshot("abc").await.expect("listing should succeed");
    assert!(latest.is_none());
}
