//! Tenant entity
//!
//! Tenants (projects) are the organizational scope an instance is created
//! under. This client only ever reads them.

use serde::{Deserialize, Serialize};

/// Tenant summary as reported by `GET /v1/tenants`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    pub name: String,
}
