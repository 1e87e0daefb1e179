//! Shared value types for Krake.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// Timestamp
// =============================================================================

/// Unix timestamp in seconds (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp())
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.0, 0).unwrap_or_default()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_datetime().to_rfc3339())
    }
}

// =============================================================================
// Workspace
// =============================================================================

/// A named operating context that scopes which integrations and data a
/// command can reference.
///
/// Workspaces are immutable snapshots. Changing the selection replaces the
/// whole value; nothing mutates a workspace in place.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Workspace {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

impl Workspace {
    pub fn new(id: Uuid, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_roundtrip_datetime() {
        let dt = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let ts = Timestamp::from_datetime(dt);
        assert_eq!(ts.0, 1_700_000_000);
        assert_eq!(ts.to_datetime(), dt);
    }

    #[test]
    fn test_timestamp_display_is_rfc3339() {
        let ts = Timestamp(0);
        assert_eq!(ts.to_string(), "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_timestamp_now_is_recent() {
        let before = Utc::now().timestamp();
        let ts = Timestamp::now();
        assert!(ts.0 >= before);
    }

    #[test]
    fn test_workspace_display() {
        let id = Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap();
        let ws = Workspace::new(id, "Lunavo", "Lunavo workspace for e-commerce operations");
        assert_eq!(
            ws.to_string(),
            "Lunavo (00000000-0000-0000-0000-000000000001)"
        );
    }

    #[test]
    fn test_workspace_serialization() {
        let ws = Workspace::new(Uuid::nil(), "Monarch", "Monarch workspace for app management");
        let json = serde_json::to_value(&ws).unwrap();
        assert_eq!(json["name"], "Monarch");
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");

        let back: Workspace = serde_json::from_value(json).unwrap();
        assert_eq!(back, ws);
    }
}
