// SPDX-License-Identifier: MIT
// Copyright 2026 EventsHub contributors

//! Account reconciliation: upserting the internal User and Profile records
//! from a verified identity assertion.
//!
//! Reconciliation is idempotent. The email claim is the required anchor
//! field; without it nothing is written. The User/Profile pair is not
//! written transactionally; a failure between the two upserts leaves an
//! inconsistency window that the next sync repairs.

use crate::config::Config;
use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{Profile, Role, User};
use crate::services::identity::VerifiedIdentity;
use crate::services::roles::{elevate, resolve_role};
use crate::time_utils::now_rfc3339;

/// Reconcile the User record with a verified identity.
///
/// Creates the record on first sync; afterwards refreshes the identity
/// fields and last-login timestamp on every sync. The role is re-derived
/// from the privilege lists each time but only ever raised.
pub fn reconcile_user(
    existing: Option<User>,
    identity: &VerifiedIdentity,
    config: &Config,
    now: &str,
) -> Result<User> {
    let email = identity
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| {
            AppError::Validation("Identity assertion is missing an email address".to_string())
        })?
        .to_lowercase();

    let target_role = resolve_role(&email, config);
    let display_name = identity.display_name.clone().unwrap_or_default();

    Ok(match existing {
        None => User {
            subject_id: identity.subject_id.clone(),
            email,
            display_name,
            photo_url: identity.picture_url.clone(),
            role: target_role,
            last_login_at: now.to_string(),
            created_at: now.to_string(),
        },
        Some(mut user) => {
            user.email = email;
            user.display_name = display_name;
            // A provider that stops sharing the picture should not wipe the
            // one we already have.
            if identity.picture_url.is_some() {
                user.photo_url = identity.picture_url.clone();
            }
            user.role = elevate(user.role, target_role);
            user.last_login_at = now.to_string();
            user
        }
    })
}

/// Reconcile the Profile record alongside the User.
///
/// Creates a profile seeded with the best-available name and contact email
/// if none exists; otherwise backfills those two fields only when they are
/// currently empty. Populated values are never overwritten here.
pub fn reconcile_profile(existing: Option<Profile>, user: &User) -> Profile {
    match existing {
        None => {
            let mut profile = Profile::empty(user.subject_id.clone());
            profile.name = user.display_name.clone();
            profile.contact_email = user.email.clone();
            profile
        }
        Some(mut profile) => {
            if profile.name.is_empty() && !user.display_name.is_empty() {
                profile.name = user.display_name.clone();
            }
            if profile.contact_email.is_empty() && !user.email.is_empty() {
                profile.contact_email = user.email.clone();
            }
            profile
        }
    }
}

/// Sync an account: reconcile and persist the User and Profile pair.
pub async fn sync_account(
    db: &FirestoreDb,
    config: &Config,
    identity: &VerifiedIdentity,
    existing_user: Option<User>,
) -> Result<(User, Profile)> {
    let now = now_rfc3339();

    let user = reconcile_user(existing_user, identity, config, &now)?;
    db.upsert_user(&user).await?;

    let existing_profile = db.get_profile(&identity.subject_id).await?;
    let profile = reconcile_profile(existing_profile, &user);
    db.upsert_profile(&profile).await?;

    tracing::info!(
        subject_id = %user.subject_id,
        role = ?user.role,
        "Account synced"
    );

    Ok((user, profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_email_list;

    fn identity(email: Option<&str>) -> VerifiedIdentity {
        VerifiedIdentity {
            subject_id: "uid-1".to_string(),
            email: email.map(str::to_string),
            display_name: Some("Casey".to_string()),
            picture_url: Some("https://img.example/casey.png".to_string()),
        }
    }

    fn config_with_lists(admins: &str, heads: &str) -> Config {
        let mut config = Config::test_default();
        config.admin_emails = parse_email_list(admins);
        config.event_head_emails = parse_email_list(heads);
        config
    }

    #[test]
    fn missing_email_aborts_before_any_write() {
        let err = reconcile_user(
            None,
            &identity(None),
            &Config::test_default(),
            "2025-01-01T00:00:00Z",
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn first_sync_creates_user_with_resolved_role() {
        let config = config_with_lists("casey@eventshub.edu", "");
        let user = reconcile_user(
            None,
            &identity(Some("Casey@EventsHub.EDU")),
            &config,
            "2025-01-01T00:00:00Z",
        )
        .unwrap();

        assert_eq!(user.email, "casey@eventshub.edu");
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.last_login_at, "2025-01-01T00:00:00Z");
        assert_eq!(user.created_at, "2025-01-01T00:00:00Z");
    }

    #[test]
    fn later_list_match_elevates_and_sticks() {
        // First sync: no list match, plain student.
        let plain = config_with_lists("", "");
        let user = reconcile_user(None, &identity(Some("casey@eventshub.edu")), &plain, "t0")
            .unwrap();
        assert_eq!(user.role, Role::Student);

        // Second sync: now on the event-head list.
        let heads = config_with_lists("", "casey@eventshub.edu");
        let user = reconcile_user(
            Some(user),
            &identity(Some("casey@eventshub.edu")),
            &heads,
            "t1",
        )
        .unwrap();
        assert_eq!(user.role, Role::EventHead);

        // Third sync: removed from every list; the role persists.
        let user = reconcile_user(
            Some(user),
            &identity(Some("casey@eventshub.edu")),
            &plain,
            "t2",
        )
        .unwrap();
        assert_eq!(user.role, Role::EventHead);
        assert_eq!(user.last_login_at, "t2");
        assert_eq!(user.created_at, "t0");
    }

    #[test]
    fn missing_picture_does_not_wipe_existing_photo() {
        let config = Config::test_default();
        let user = reconcile_user(None, &identity(Some("c@x.edu")), &config, "t0").unwrap();
        assert!(user.photo_url.is_some());

        let mut without_picture = identity(Some("c@x.edu"));
        without_picture.picture_url = None;
        let user = reconcile_user(Some(user), &without_picture, &config, "t1").unwrap();
        assert_eq!(user.photo_url.as_deref(), Some("https://img.example/casey.png"));
    }

    #[test]
    fn profile_created_with_best_available_fields() {
        let config = Config::test_default();
        let user = reconcile_user(None, &identity(Some("casey@eventshub.edu")), &config, "t0")
            .unwrap();

        let profile = reconcile_profile(None, &user);
        assert_eq!(profile.subject_id, "uid-1");
        assert_eq!(profile.name, "Casey");
        assert_eq!(profile.contact_email, "casey@eventshub.edu");
    }

    #[test]
    fn backfill_never_overwrites_populated_values() {
        let config = Config::test_default();
        let user = reconcile_user(None, &identity(Some("casey@eventshub.edu")), &config, "t0")
            .unwrap();

        let mut existing = Profile::empty("uid-1");
        existing.name = "Chosen Name".to_string();

        let profile = reconcile_profile(Some(existing), &user);
        assert_eq!(profile.name, "Chosen Name");
        // Empty contact email does get backfilled.
        assert_eq!(profile.contact_email, "casey@eventshub.edu");
    }
}
