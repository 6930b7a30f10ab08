//! Wire envelopes for control plane responses
//!
//! Every endpoint wraps its payload in `{"data": ...}`. The envelope is an
//! adapter detail; domain types cross the port boundary unwrapped.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

/// Payload of `POST /v1/instances/{id}/snapshots`.
#[derive(Debug, Deserialize)]
pub(crate) struct SnapshotCreated {
    pub snapshot_id: String,
}
