// SPDX-License-Identifier: MIT
// Copyright 2026 EventsHub contributors

//! Authentication extractors.
//!
//! [`AuthContext`] verifies the bearer identity assertion and loads the
//! synced user record, if any; a missing or malformed Authorization header
//! is rejected with 401 before any verification is attempted. [`AdminUser`]
//! additionally requires the admin role.

use crate::error::AppError;
use crate::models::{Role, User};
use crate::services::identity::{extract_bearer_token, VerifiedIdentity};
use crate::AppState;
use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use std::sync::Arc;

/// A request with a verified identity assertion.
///
/// `user` is `None` for callers who have never synced an account.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub identity: VerifiedIdentity,
    pub user: Option<User>,
}

impl AuthContext {
    /// The synced user record, or 403 for callers without one.
    pub fn require_synced_user(&self) -> Result<&User, AppError> {
        self.user.as_ref().ok_or(AppError::Forbidden)
    }
}

impl FromRequestParts<Arc<AppState>> for AuthContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts.headers.get(header::AUTHORIZATION))?;
        let identity = state.identity_verifier.verify(token).await?;
        let user = state.db.get_user(&identity.subject_id).await?;

        Ok(AuthContext { identity, user })
    }
}

/// A request from a verified admin. Anyone else gets 403.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub identity: VerifiedIdentity,
    pub user: User,
}

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let ctx = AuthContext::from_request_parts(parts, state).await?;

        match ctx.user {
            Some(user) if user.role == Role::Admin => Ok(AdminUser {
                identity: ctx.identity,
                user,
            }),
            _ => Err(AppError::Forbidden),
        }
    }
}
