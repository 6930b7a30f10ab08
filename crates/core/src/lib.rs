//! # Lattice Core
//!
//! Pure orchestration logic for the Lattice control plane client - no
//! infrastructure dependencies.
//!
//! This crate contains:
//! - The generic convergence polling primitive (`poll::wait_until`)
//! - The control plane port (trait) implemented by `lattice-infra`
//! - The provisioning service composing typed operations into workflows
//! - Time abstractions for deterministic tests
//!
//! ## Architecture Principles
//! - Only depends on `lattice-domain`
//! - No HTTP or platform code; all I/O goes through traits
//! - Deadline and poll-interval policy lives here, in one place

pub mod poll;
pub mod provisioning;
pub mod testing;

// Re-export specific items to avoid ambiguity
pub use poll::{wait_until, PollTimeout};
pub use provisioning::ports::{ControlPlaneApi, SnapshotId};
pub use provisioning::service::{ProvisionedInstance, ProvisioningService};
pub use testing::time::{Clock, MockClock, SystemClock};
