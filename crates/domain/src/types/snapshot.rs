//! Snapshot entity
//!
//! A snapshot is an immutable point-in-time backup belonging to exactly one
//! instance. The control plane creates them on demand (`AdHoc`) or on a
//! schedule (`Scheduled`); once completed they can never be updated or
//! deleted through this client.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::constants::snapshot_status;

/// Snapshot detail as reported by the control plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub instance_id: String,
    pub snapshot_id: String,
    pub profile: String,
    pub status: String,
    /// RFC 3339 timestamp of the backup.
    pub timestamp: String,
}

impl Snapshot {
    /// Case-insensitive status comparison.
    pub fn is_in_state(&self, status: &str) -> bool {
        self.status.eq_ignore_ascii_case(status)
    }

    /// True once the backup has fully materialized. Only completed
    /// snapshots are usable as a clone source.
    pub fn is_completed(&self) -> bool {
        self.is_in_state(snapshot_status::COMPLETED)
    }

    /// Timestamp parsed as RFC 3339, `None` when malformed.
    pub fn parsed_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.timestamp).ok()
    }
}
