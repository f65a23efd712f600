// SPDX-License-Identifier: MIT
// Copyright 2026 EventsHub contributors

//! The local-mode store: login, mutation dispatch, and file mirroring.

use crate::error::{AppError, Result};
use crate::local::state::{self, LocalEvent, LocalPost, LocalState};
use crate::models::event::EventSubmission;
use crate::models::hackfinder::PostSubmission;
use crate::models::{Role, UserSnapshot};
use crate::time_utils::now_rfc3339;
use std::path::PathBuf;
use std::sync::Mutex;
use subtle::ConstantTimeEq;

/// Access code gating the admin role in local mode. Compared verbatim (and
/// in constant time) against what the login form submits.
pub const ADMIN_ACCESS_CODE: &str = "eventshub-admin-2025";

/// A local-mode session. There is no identity provider; the role is chosen
/// at login.
#[derive(Debug, Clone)]
pub struct LocalSession {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl LocalSession {
    /// Snapshot attached to this session's submissions and approvals.
    pub fn snapshot(&self) -> UserSnapshot {
        UserSnapshot {
            subject_id: None,
            name: Some(self.name.clone()).filter(|n| !n.is_empty()),
            email: Some(self.email.clone()).filter(|e| !e.is_empty()),
            role: Some(self.role),
        }
    }
}

/// Start a local session with the chosen role. The admin role requires the
/// fixed access code; other roles take none.
pub fn login(name: &str, email: &str, role: Role, access_code: Option<&str>) -> Result<LocalSession> {
    if role == Role::Admin {
        let supplied = access_code.unwrap_or_default().as_bytes();
        if !bool::from(supplied.ct_eq(ADMIN_ACCESS_CODE.as_bytes())) {
            return Err(AppError::Forbidden);
        }
    }

    Ok(LocalSession {
        name: name.trim().to_string(),
        email: email.trim().to_lowercase(),
        role,
    })
}

/// State container mirroring every accepted mutation to a JSON file.
///
/// Mutations run as pure functions over a copy of the prior state; the file
/// write happens before the new state is swapped in, so memory and disk
/// cannot drift apart on a failed write.
pub struct LocalStore {
    path: PathBuf,
    state: Mutex<LocalState>,
}

impl LocalStore {
    /// Open a store backed by the given file, loading existing data if the
    /// file is present.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let state = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| AppError::Database(format!("Corrupt local data file: {e}")))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => LocalState::default(),
            Err(e) => {
                return Err(AppError::Database(format!(
                    "Failed to read local data file: {e}"
                )))
            }
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    fn mutate<T>(
        &self,
        apply: impl FnOnce(LocalState) -> Result<(LocalState, T)>,
    ) -> Result<T> {
        let mut guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let (next, output) = apply(guard.clone())?;
        self.persist(&next)?;
        *guard = next;
        Ok(output)
    }

    fn read<T>(&self, view: impl FnOnce(&LocalState) -> T) -> T {
        let guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        view(&guard)
    }

    fn persist(&self, state: &LocalState) -> Result<()> {
        let serialized = serde_json::to_string_pretty(state)
            .map_err(|e| AppError::Database(format!("Failed to serialize local data: {e}")))?;
        std::fs::write(&self.path, serialized)
            .map_err(|e| AppError::Database(format!("Failed to write local data file: {e}")))
    }

    // ─── Submissions ─────────────────────────────────────────────

    pub fn submit_event(
        &self,
        session: &LocalSession,
        submission: EventSubmission,
    ) -> Result<LocalEvent> {
        let details = submission.normalize()?;
        let now = now_rfc3339();
        self.mutate(|current| Ok(state::submit_event(current, details, session.snapshot(), &now)))
    }

    pub fn submit_post(
        &self,
        session: &LocalSession,
        submission: PostSubmission,
    ) -> Result<LocalPost> {
        let details = submission.normalize()?;
        let now = now_rfc3339();
        self.mutate(|current| Ok(state::submit_post(current, details, session.snapshot(), &now)))
    }

    // ─── Moderation (admin only) ─────────────────────────────────

    pub fn approve_event(&self, session: &LocalSession, id: u64) -> Result<LocalEvent> {
        require_admin(session)?;
        let now = now_rfc3339();
        self.mutate(|current| state::approve_event(current, id, session.snapshot(), &now))
    }

    pub fn approve_post(&self, session: &LocalSession, id: u64) -> Result<LocalPost> {
        require_admin(session)?;
        let now = now_rfc3339();
        self.mutate(|current| state::approve_post(current, id, session.snapshot(), &now))
    }

    pub fn reject_event(&self, session: &LocalSession, id: u64) -> Result<LocalEvent> {
        require_admin(session)?;
        self.mutate(|current| state::reject_event(current, id))
    }

    pub fn reject_post(&self, session: &LocalSession, id: u64) -> Result<LocalPost> {
        require_admin(session)?;
        self.mutate(|current| state::reject_post(current, id))
    }

    pub fn delete_event(&self, session: &LocalSession, id: u64) -> Result<LocalEvent> {
        require_admin(session)?;
        self.mutate(|current| state::delete_event(current, id))
    }

    pub fn delete_post(&self, session: &LocalSession, id: u64) -> Result<LocalPost> {
        require_admin(session)?;
        self.mutate(|current| state::delete_post(current, id))
    }

    // ─── Listings ────────────────────────────────────────────────

    pub fn published_events(&self) -> Vec<LocalEvent> {
        self.read(LocalState::published_events)
    }

    pub fn published_posts(&self) -> Vec<LocalPost> {
        self.read(LocalState::published_posts)
    }

    /// The moderation queues; admin only, like the API's queue endpoint.
    pub fn pending_queue(&self, session: &LocalSession) -> Result<(Vec<LocalEvent>, Vec<LocalPost>)> {
        require_admin(session)?;
        Ok(self.read(LocalState::pending_queue))
    }
}

fn require_admin(session: &LocalSession) -> Result<()> {
    if session.role == Role::Admin {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModerationStatus;
    use std::sync::atomic::{AtomicU32, Ordering};

    static TEMP_SEQ: AtomicU32 = AtomicU32::new(0);

    fn temp_path() -> PathBuf {
        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "eventshub-local-test-{}-{}.json",
            std::process::id(),
            seq
        ))
    }

    fn event_submission(title: &str) -> EventSubmission {
        EventSubmission {
            title: Some(title.to_string()),
            date: Some("2025-10-15".to_string()),
            time: Some("10:00".to_string()),
            department: Some("CS".to_string()),
            description: Some("d".to_string()),
            registration_link: Some("http://x".to_string()),
            featured: false,
        }
    }

    fn student() -> LocalSession {
        login("Casey", "casey@eventshub.edu", Role::Student, None).unwrap()
    }

    fn admin() -> LocalSession {
        login("Avery", "avery@eventshub.edu", Role::Admin, Some(ADMIN_ACCESS_CODE)).unwrap()
    }

    #[test]
    fn admin_login_requires_the_exact_access_code() {
        assert!(matches!(
            login("A", "a@x.edu", Role::Admin, None).unwrap_err(),
            AppError::Forbidden
        ));
        assert!(matches!(
            login("A", "a@x.edu", Role::Admin, Some("wrong")).unwrap_err(),
            AppError::Forbidden
        ));
        // Trailing whitespace is not forgiven; the comparison is verbatim.
        let padded = format!("{ADMIN_ACCESS_CODE} ");
        assert!(matches!(
            login("A", "a@x.edu", Role::Admin, Some(&padded)).unwrap_err(),
            AppError::Forbidden
        ));

        let session = login("A", "a@x.edu", Role::Admin, Some(ADMIN_ACCESS_CODE)).unwrap();
        assert_eq!(session.role, Role::Admin);
    }

    #[test]
    fn non_admin_roles_need_no_code() {
        let session = login("  Casey ", "Casey@EventsHub.EDU", Role::EventHead, None).unwrap();
        assert_eq!(session.name, "Casey");
        assert_eq!(session.email, "casey@eventshub.edu");
    }

    #[test]
    fn moderation_is_admin_only() {
        let path = temp_path();
        let store = LocalStore::open(&path).unwrap();
        let pending = store.submit_event(&student(), event_submission("Demo")).unwrap();

        assert!(matches!(
            store.approve_event(&student(), pending.id).unwrap_err(),
            AppError::Forbidden
        ));
        assert!(matches!(
            store.pending_queue(&student()).unwrap_err(),
            AppError::Forbidden
        ));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn full_flow_survives_a_reopen() {
        let path = temp_path();

        let pending_id = {
            let store = LocalStore::open(&path).unwrap();
            let pending = store.submit_event(&student(), event_submission("Demo")).unwrap();
            assert_eq!(pending.moderation.status, ModerationStatus::Pending);
            assert!(store.published_events().is_empty());
            pending.id
        };

        // Reopen from disk: the pending submission is still there.
        let store = LocalStore::open(&path).unwrap();
        let (queue_events, _) = store.pending_queue(&admin()).unwrap();
        assert_eq!(queue_events.len(), 1);
        assert_eq!(queue_events[0].id, pending_id);

        let approved = store.approve_event(&admin(), pending_id).unwrap();
        assert_eq!(approved.moderation.status, ModerationStatus::Published);
        assert_eq!(
            approved.moderation.approved_by.as_ref().and_then(|s| s.name.as_deref()),
            Some("Avery")
        );

        // And the approval is durable too.
        let store = LocalStore::open(&path).unwrap();
        assert_eq!(store.published_events().len(), 1);
        let (queue_events, _) = store.pending_queue(&admin()).unwrap();
        assert!(queue_events.is_empty());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn rejected_submissions_disappear_everywhere() {
        let path = temp_path();
        let store = LocalStore::open(&path).unwrap();

        let pending = store.submit_event(&student(), event_submission("Demo")).unwrap();
        let rejected = store.reject_event(&admin(), pending.id).unwrap();
        assert_eq!(rejected.moderation.status, ModerationStatus::Rejected);

        assert!(store.published_events().is_empty());
        let (queue_events, _) = store.pending_queue(&admin()).unwrap();
        assert!(queue_events.is_empty());

        std::fs::remove_file(&path).ok();
    }
}
