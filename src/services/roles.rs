// SPDX-License-Identifier: MIT
// Copyright 2026 EventsHub contributors

//! Role resolution from configured privilege lists.

use crate::config::Config;
use crate::models::Role;

/// Resolve the role an email is entitled to from the configured privilege
/// lists. Admin takes precedence over eventHead; everyone else is a student.
///
/// Comparison is case-insensitive; list entries are trimmed and lowercased
/// at config load time.
pub fn resolve_role(email: &str, config: &Config) -> Role {
    let normalized = email.trim().to_lowercase();

    if config.admin_emails.iter().any(|e| *e == normalized) {
        Role::Admin
    } else if config.event_head_emails.iter().any(|e| *e == normalized) {
        Role::EventHead
    } else {
        Role::Student
    }
}

/// The role a user ends up with after a sync: the configured target if it is
/// a promotion, otherwise the current role. Sync never demotes.
pub fn elevate(current: Role, target: Role) -> Role {
    current.max(target)
}
