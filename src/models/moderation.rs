//! Moderation lifecycle fields shared by events and HackFinder posts.

use crate::models::UserSnapshot;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Lifecycle status of a submitted entity. Deletion is terminal and
/// represented by removing the document, not by a status value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    #[default]
    Pending,
    Published,
    Rejected,
}

impl ModerationStatus {
    /// The lowercase wire/storage name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Published => "published",
            ModerationStatus::Rejected => "rejected",
        }
    }
}

/// Moderation fields embedded (flattened) into each submitted entity.
///
/// Invariant: `approved_by` and `approved_at` are set together and cleared
/// together. The snapshots are historical records, never re-derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ModerationState {
    pub status: ModerationStatus,
    pub submitted_by: UserSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<UserSnapshot>,
    /// Submission time (RFC3339); doubles as the creation timestamp
    pub submitted_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ModerationStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&ModerationStatus::Published).unwrap(),
            "\"published\""
        );
        assert_eq!(
            serde_json::to_string(&ModerationStatus::Rejected).unwrap(),
            "\"rejected\""
        );
    }
}
