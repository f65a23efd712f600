//! User model and the denormalized snapshot embedded into submissions.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// User role. Ordered so that comparisons express privilege level:
/// `Student < EventHead < Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    #[default]
    Student,
    EventHead,
    Admin,
}

impl Role {
    /// Whether submissions from this role publish immediately, skipping the
    /// moderation queue.
    pub fn has_publishing_privileges(self) -> bool {
        matches!(self, Role::Admin | Role::EventHead)
    }
}

/// User account stored in Firestore, keyed by the identity provider's
/// subject id. Created and mutated only by account sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Subject id from the identity provider (also the document id)
    pub subject_id: String,
    /// Email address, lowercased (unique anchor field)
    pub email: String,
    /// Display name as asserted by the identity provider
    #[serde(default)]
    pub display_name: String,
    /// Profile picture URL, if the provider shared one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub role: Role,
    /// Last successful account sync (RFC3339)
    pub last_login_at: String,
    /// First account sync (RFC3339)
    pub created_at: String,
}

/// Point-in-time copy of a user's identity, embedded into a submission at
/// submit time and at approval time. Never re-derived from the live User.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct UserSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl UserSnapshot {
    /// Build a snapshot from a verified identity and the synced user record,
    /// if one exists. The db record wins for name/email/role; the assertion
    /// fills the gaps for submitters who have not synced yet.
    pub fn capture(
        identity: &crate::services::identity::VerifiedIdentity,
        user: Option<&User>,
    ) -> Self {
        let name = user
            .map(|u| u.display_name.clone())
            .filter(|n| !n.is_empty())
            .or_else(|| identity.display_name.clone())
            .or_else(|| identity.email.clone());
        let email = user
            .map(|u| u.email.clone())
            .or_else(|| identity.email.clone());

        Self {
            subject_id: Some(identity.subject_id.clone()),
            name: name.filter(|n| !n.is_empty()),
            email: email.filter(|e| !e.is_empty()),
            role: user.map(|u| u.role),
        }
    }
}
