// SPDX-License-Identifier: MIT
// Copyright 2026 EventsHub contributors

//! Profile routes for the authenticated user.

use crate::error::Result;
use crate::middleware::auth::AuthContext;
use crate::models::{Profile, ProfileUpdate};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/profile/me", get(get_my_profile))
        .route("/api/profile/me", put(update_my_profile))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileResponse {
    pub profile: Profile,
}

/// Fetch the caller's profile, creating a blank one on first access.
async fn get_my_profile(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
) -> Result<Json<ProfileResponse>> {
    let subject_id = &ctx.identity.subject_id;

    let profile = match state.db.get_profile(subject_id).await? {
        Some(profile) => profile,
        None => {
            let mut profile = Profile::empty(subject_id.clone());
            profile.name = ctx
                .user
                .as_ref()
                .map(|u| u.display_name.clone())
                .filter(|n| !n.is_empty())
                .or_else(|| ctx.identity.display_name.clone())
                .unwrap_or_default();
            profile.contact_email = ctx
                .user
                .as_ref()
                .map(|u| u.email.clone())
                .or_else(|| ctx.identity.email.as_ref().map(|e| e.to_lowercase()))
                .unwrap_or_default();

            state.db.upsert_profile(&profile).await?;
            profile
        }
    };

    Ok(Json(ProfileResponse { profile }))
}

/// Apply an allow-listed partial update to the caller's profile.
async fn update_my_profile(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ProfileResponse>> {
    let subject_id = &ctx.identity.subject_id;

    let mut profile = state
        .db
        .get_profile(subject_id)
        .await?
        .unwrap_or_else(|| Profile::empty(subject_id.clone()));

    profile.apply_update(update);
    state.db.upsert_profile(&profile).await?;

    Ok(Json(ProfileResponse { profile }))
}
