//! Control plane constants
//!
//! Centralized location for the enumerations the remote API accepts and
//! reports. Status strings are compared case-insensitively everywhere; the
//! canonical lowercase forms live here.

/// Instance lifecycle statuses as reported by the control plane.
pub mod instance_status {
    pub const CREATING: &str = "creating";
    pub const DESTROYING: &str = "destroying";
    pub const RUNNING: &str = "running";
    pub const PAUSING: &str = "pausing";
    pub const PAUSED: &str = "paused";
    pub const SUSPENDING: &str = "suspending";
    pub const SUSPENDED: &str = "suspended";
    pub const RESUMING: &str = "resuming";
    pub const LOADING: &str = "loading";
    pub const LOADING_FAILED: &str = "loading failed";
    pub const RESTORING: &str = "restoring";
    pub const UPDATING: &str = "updating";
    pub const OVERWRITING: &str = "overwriting";
}

/// Snapshot statuses as reported by the control plane.
pub mod snapshot_status {
    pub const PENDING: &str = "pending";
    pub const IN_PROGRESS: &str = "inprogress";
    pub const COMPLETED: &str = "completed";
    pub const FAILED: &str = "failed";
}

/// Snapshot profiles.
pub mod snapshot_profile {
    pub const AD_HOC: &str = "adhoc";
    pub const SCHEDULED: &str = "scheduled";
}

/// Instance memory sizes accepted by the control plane.
pub mod memory {
    pub const GB_1: &str = "1GB";
    pub const GB_2: &str = "2GB";
    pub const GB_4: &str = "4GB";
    pub const GB_8: &str = "8GB";
    pub const GB_16: &str = "16GB";
    pub const GB_24: &str = "24GB";
    pub const GB_32: &str = "32GB";
    pub const GB_48: &str = "48GB";
    pub const GB_64: &str = "64GB";
    pub const GB_128: &str = "128GB";
    pub const GB_192: &str = "192GB";
    pub const GB_256: &str = "256GB";
    pub const GB_384: &str = "384GB";
    pub const GB_512: &str = "512GB";
}

/// Instance storage sizes accepted by the control plane.
pub mod storage {
    pub const GB_2: &str = "2GB";
    pub const GB_4: &str = "4GB";
    pub const GB_8: &str = "8GB";
    pub const GB_16: &str = "16GB";
    pub const GB_32: &str = "32GB";
    pub const GB_48: &str = "48GB";
    pub const GB_64: &str = "64GB";
    pub const GB_96: &str = "96GB";
    pub const GB_128: &str = "128GB";
    pub const GB_192: &str = "192GB";
    pub const GB_256: &str = "256GB";
    pub const GB_384: &str = "384GB";
    pub const GB_512: &str = "512GB";
    pub const GB_768: &str = "768GB";
    pub const GB_1024: &str = "1024GB";
    pub const GB_1536: &str = "1536GB";
    pub const GB_2048: &str = "2048GB";
}

/// Instance tiers.
pub mod instance_type {
    pub const ENTERPRISE_DB: &str = "enterprise-db";
    pub const ENTERPRISE_DS: &str = "enterprise-ds";
    pub const PROFESSIONAL_DB: &str = "professional-db";
    pub const PROFESSIONAL_DS: &str = "professional-ds";
    pub const FREE_DB: &str = "free-db";
    pub const BUSINESS_CRITICAL: &str = "business-critical";
}

/// Cloud providers the control plane can deploy to.
pub mod cloud_provider {
    pub const GCP: &str = "gcp";
    pub const AWS: &str = "aws";
    pub const AZURE: &str = "azure";
}

/// Change-data-capture enrichment modes.
pub mod cdc_enrichment_mode {
    pub const OFF: &str = "OFF";
    pub const DIFF: &str = "DIFF";
    pub const FULL: &str = "FULL";
}

/// Supported database version.
pub const INSTANCE_VERSION_5: &str = "5";
