//! Control plane orchestration
//!
//! The port trait describes the typed remote operations; the service
//! composes them with convergence polling into the multi-step workflows
//! callers actually want (create-and-wait, pause, resume, delete-and-confirm).

pub mod ports;
pub mod service;

pub use ports::{ControlPlaneApi, SnapshotId};
pub use service::{ProvisionedInstance, ProvisioningService};
