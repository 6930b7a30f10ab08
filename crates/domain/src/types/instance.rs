//! Instance entity and request payloads
//!
//! An instance is a provisioned database deployment with an asynchronous
//! lifecycle driven by the control plane. The read model mirrors the wire
//! format of `GET /v1/instances/{id}`; the request payloads mirror
//! `POST /v1/instances` and `PATCH /v1/instances/{id}`.

use serde::{Deserialize, Serialize};

use crate::constants::instance_status;

/// Instance detail as reported by the control plane.
///
/// Optional fields are absent for tiers that do not support them (for
/// example `storage` on free instances). The graph counters arrive as
/// strings on the wire; use [`Instance::graph_node_count`] and
/// [`Instance::graph_relationship_count`] for numeric access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub id: String,
    pub name: String,
    pub status: String,
    pub tenant_id: String,
    pub cloud_provider: String,
    pub connection_url: String,
    pub region: String,
    #[serde(rename = "type")]
    pub instance_type: String,
    pub memory: String,
    #[serde(default)]
    pub storage: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub metrics_integration_url: Option<String>,
    #[serde(default)]
    pub graph_nodes: Option<String>,
    #[serde(default)]
    pub graph_relationships: Option<String>,
    #[serde(default)]
    pub secondaries_count: Option<i32>,
    #[serde(default)]
    pub cdc_enrichment_mode: Option<String>,
    #[serde(default)]
    pub vector_optimized: Option<bool>,
    #[serde(default)]
    pub graph_analytics_plugin: Option<bool>,
}

impl Instance {
    /// Case-insensitive status comparison. The control plane is not
    /// consistent about casing across endpoints.
    pub fn is_in_state(&self, status: &str) -> bool {
        self.status.eq_ignore_ascii_case(status)
    }

    /// A pause request is only accepted while the instance is running.
    pub fn can_be_paused(&self) -> bool {
        self.is_in_state(instance_status::RUNNING)
    }

    /// A resume request is only accepted while the instance is paused.
    pub fn can_be_resumed(&self) -> bool {
        self.is_in_state(instance_status::PAUSED)
    }

    /// Node count parsed from the wire string, `None` when the control
    /// plane has not reported one or the value is malformed.
    pub fn graph_node_count(&self) -> Option<i64> {
        self.graph_nodes.as_deref().and_then(|raw| raw.parse().ok())
    }

    /// Relationship count parsed from the wire string.
    pub fn graph_relationship_count(&self) -> Option<i64> {
        self.graph_relationships.as_deref().and_then(|raw| raw.parse().ok())
    }
}

/// Creation envelope returned by `POST /v1/instances`.
///
/// The password is only ever returned here, never by a subsequent read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedInstance {
    pub id: String,
    pub name: String,
    pub tenant_id: String,
    pub cloud_provider: String,
    pub connection_url: String,
    pub region: String,
    #[serde(rename = "type")]
    pub instance_type: String,
    pub username: String,
    pub password: String,
}

/// Payload for `POST /v1/instances`.
///
/// Optional fields are serialized only when present; the control plane
/// rejects explicit nulls for them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateInstanceRequest {
    pub version: String,
    pub region: String,
    pub memory: String,
    pub name: String,
    #[serde(rename = "type")]
    pub instance_type: String,
    pub tenant_id: String,
    pub cloud_provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondaries_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cdc_enrichment_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_optimized: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_analytics_plugin: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_instance_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_snapshot_id: Option<String>,
}

impl CreateInstanceRequest {
    /// Minimal request with every optional field absent.
    pub fn new(
        version: impl Into<String>,
        region: impl Into<String>,
        memory: impl Into<String>,
        name: impl Into<String>,
        instance_type: impl Into<String>,
        tenant_id: impl Into<String>,
        cloud_provider: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            region: region.into(),
            memory: memory.into(),
            name: name.into(),
            instance_type: instance_type.into(),
            tenant_id: tenant_id.into(),
            cloud_provider: cloud_provider.into(),
            storage: None,
            secondaries_count: None,
            cdc_enrichment_mode: None,
            vector_optimized: None,
            graph_analytics_plugin: None,
            source_instance_id: None,
            source_snapshot_id: None,
        }
    }
}

/// Partial update payload for `PATCH /v1/instances/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateInstanceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cdc_enrichment_mode: Option<String>,
}

impl UpdateInstanceRequest {
    /// True when the payload carries no changes at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.memory.is_none() && self.cdc_enrichment_mode.is_none()
    }
}
