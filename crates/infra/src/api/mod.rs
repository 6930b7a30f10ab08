//! Typed control plane API client

pub mod client;
mod responses;
pub mod transport;

pub use client::ControlPlaneClient;
pub use transport::{ApiTransport, RawResponse};
