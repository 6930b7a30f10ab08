//! Control plane entity types

pub mod instance;
pub mod snapshot;
pub mod tenant;

pub use instance::{CreateInstanceRequest, CreatedInstance, Instance, UpdateInstanceRequest};
pub use snapshot::Snapshot;
pub use tenant::Tenant;
