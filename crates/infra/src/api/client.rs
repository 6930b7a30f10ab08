//! Typed control plane operations
//!
//! One method per remote endpoint. Reads expect `200`; accepted
//! asynchronous mutations expect `202`. Anything else surfaces the status
//! code together with the raw response body, verbatim, so a failing call
//! can be diagnosed from the error alone.

use std::sync::Arc;

use async_trait::async_trait;
use lattice_core::provisioning::ports::{ControlPlaneApi, SnapshotId};
use lattice_domain::{
    CreateInstanceRequest, CreatedInstance, Instance, LatticeError, Result, Snapshot, Tenant,
    UpdateInstanceRequest,
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::responses::{DataEnvelope, SnapshotCreated};
use super::transport::{ApiTransport, RawResponse};
use crate::auth::{AccessTokenProvider, Authenticator};
use crate::config::ControlPlaneConfig;

/// Control plane client implementing the `ControlPlaneApi` port.
pub struct ControlPlaneClient {
    transport: ApiTransport,
}

impl ControlPlaneClient {
    /// Build a client with its own authenticator from configuration.
    pub fn new(config: &ControlPlaneConfig) -> Result<Self> {
        config.validate()?;
        let authenticator = Arc::new(Authenticator::new(config)?);
        Self::with_token_provider(config, authenticator)
    }

    /// Build a client around an existing token provider (shared
    /// authenticator, or a fixed token in tests).
    pub fn with_token_provider(
        config: &ControlPlaneConfig,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self> {
        Ok(Self { transport: ApiTransport::new(config, auth)? })
    }

    /// Unwrap the `{"data": ...}` envelope when the status matches the
    /// operation's expectation; map everything else onto the error
    /// taxonomy. 404 is its own signal - deletion confirmation keys off
    /// it.
    fn decode<T: DeserializeOwned>(
        path: &str,
        expected: StatusCode,
        response: RawResponse,
    ) -> Result<T> {
        if response.status == expected {
            return serde_json::from_str::<DataEnvelope<T>>(&response.body)
                .map(|envelope| envelope.data)
                .map_err(|err| {
                    LatticeError::Serialization(format!(
                        "failed to decode response from {path}: {err}"
                    ))
                });
        }

        if response.status == StatusCode::NOT_FOUND {
            return Err(LatticeError::NotFound(path.to_string()));
        }

        Err(LatticeError::UnexpectedStatus {
            status: response.status.as_u16(),
            body: response.body,
        })
    }
}

#[async_trait]
impl ControlPlaneApi for ControlPlaneClient {
    async fn list_tenants(&self) -> Result<Vec<Tenant>> {
        let path = "tenants";
        let response = self.transport.get(path).await?;
        Self::decode(path, StatusCode::OK, response)
    }

    async fn create_instance(&self, request: &CreateInstanceRequest) -> Result<CreatedInstance> {
        let path = "instances";
        let response = self.transport.post(path, request).await?;
        Self::decode(path, StatusCode::ACCEPTED, response)
    }

    async fn get_instance(&self, instance_id: &str) -> Result<Instance> {
        let path = format!("instances/{instance_id}");
        let response = self.transport.get(&path).await?;
        Self::decode(&path, StatusCode::OK, response)
    }

    async fn delete_instance(&self, instance_id: &str) -> Result<Instance> {
        let path = format!("instances/{instance_id}");
        let response = self.transport.delete(&path).await?;
        Self::decode(&path, StatusCode::ACCEPTED, response)
    }

    async fn patch_instance(
        &self,
        instance_id: &str,
        request: &UpdateInstanceRequest,
    ) -> Result<Instance> {
        let path = format!("instances/{instance_id}");
        let response = self.transport.patch(&path, request).await?;
        Self::decode(&path, StatusCode::ACCEPTED, response)
    }

    async fn pause_instance(&self, instance_id: &str) -> Result<Instance> {
        let path = format!("instances/{instance_id}/pause");
        let response = self.transport.post(&path, &json!({})).await?;
        Self::decode(&path, StatusCode::ACCEPTED, response)
    }

    async fn resume_instance(&self, instance_id: &str) -> Result<Instance> {
        let path = format!("instances/{instance_id}/resume");
        let response = self.transport.post(&path, &json!({})).await?;
        Self::decode(&path, StatusCode::ACCEPTED, response)
    }

    async fn list_snapshots(&self, instance_id: &str) -> Result<Vec<Snapshot>> {
        let path = format!("instances/{instance_id}/snapshots");
        let response = self.transport.get(&path).await?;
        Self::decode(&path, StatusCode::OK, response)
    }

    async fn get_snapshot(&self, instance_id: &str, snapshot_id: &str) -> Result<Snapshot> {
        let path = format!("instances/{instance_id}/snapshots/{snapshot_id}");
        let response = self.transport.get(&path).await?;
        Self::decode(&path, StatusCode::OK, response)
    }

    async fn create_snapshot(&self, instance_id: &str) -> Result<SnapshotId> {
        let path = format!("instances/{instance_id}/snapshots");
        let response = self.transport.post(&path, &json!({})).await?;
        let created: SnapshotCreated = Self::decode(&path, StatusCode::ACCEPTED, response)?;
        Ok(created.snapshot_id)
    }
}
