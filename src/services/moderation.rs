// SPDX-License-Identifier: MIT
// Copyright 2026 EventsHub contributors

//! The moderation state machine, shared by the API server and the local
//! mirror.
//!
//! Lifecycle: `pending -> published` (approve), `pending -> rejected`
//! (reject), and deletion from any status (handled by the storage layer).
//! Privilege checks belong to the caller; these functions only enforce the
//! transition rules themselves.

use crate::error::AppError;
use crate::models::{ModerationState, ModerationStatus, Role, UserSnapshot};

/// A transition was requested on an entity whose current status does not
/// allow it.
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error("only pending submissions can be moderated (current status: {0:?})")]
    NotPending(ModerationStatus),
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::NotPending(status) => AppError::Conflict(format!(
                "Submission is not pending (current status: {})",
                status.as_str()
            )),
        }
    }
}

/// Moderation state for a fresh submission.
///
/// Admins and event heads publish immediately; their snapshot is attached
/// both as submitter and approver with a matching timestamp. Everyone else
/// (including submitters with no synced account) lands in the pending queue.
pub fn initial_state(
    role: Option<Role>,
    submitted_by: UserSnapshot,
    now: &str,
) -> ModerationState {
    let publishes_immediately = role.is_some_and(Role::has_publishing_privileges);

    if publishes_immediately {
        ModerationState {
            status: ModerationStatus::Published,
            approved_by: Some(submitted_by.clone()),
            approved_at: Some(now.to_string()),
            submitted_by,
            submitted_at: now.to_string(),
        }
    } else {
        ModerationState {
            status: ModerationStatus::Pending,
            approved_by: None,
            approved_at: None,
            submitted_by,
            submitted_at: now.to_string(),
        }
    }
}

/// Publish a pending submission, stamping the acting admin's snapshot.
pub fn approve(
    state: &mut ModerationState,
    approver: UserSnapshot,
    now: &str,
) -> Result<(), TransitionError> {
    if state.status != ModerationStatus::Pending {
        return Err(TransitionError::NotPending(state.status));
    }

    state.status = ModerationStatus::Published;
    state.approved_by = Some(approver);
    state.approved_at = Some(now.to_string());
    Ok(())
}

/// Reject a pending submission. Clears the approval pair rather than
/// recording a rejecting actor.
pub fn reject(state: &mut ModerationState) -> Result<(), TransitionError> {
    if state.status != ModerationStatus::Pending {
        return Err(TransitionError::NotPending(state.status));
    }

    state.status = ModerationStatus::Rejected;
    state.approved_by = None;
    state.approved_at = None;
    Ok(())
}
