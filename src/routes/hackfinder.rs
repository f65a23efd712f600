// SPDX-License-Identifier: MIT
// Copyright 2026 EventsHub contributors

//! HackFinder listing and submission routes.

use crate::error::Result;
use crate::middleware::auth::AuthContext;
use crate::models::hackfinder::PostSubmission;
use crate::models::{HackFinderPost, ModerationStatus, UserSnapshot};
use crate::services::moderation;
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/hackfinder", get(list_posts))
        .route("/api/hackfinder", post(create_post))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PostsResponse {
    pub posts: Vec<HackFinderPost>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PostResponse {
    pub post: HackFinderPost,
}

/// Public listing: published posts, newest first.
async fn list_posts(State(state): State<Arc<AppState>>) -> Result<Json<PostsResponse>> {
    let posts = state
        .db
        .list_posts_by_status(ModerationStatus::Published)
        .await?;

    Ok(Json(PostsResponse { posts }))
}

/// Submit a HackFinder post. Requires a synced account (any role);
/// privileged submitters publish immediately.
async fn create_post(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Json(submission): Json<PostSubmission>,
) -> Result<(StatusCode, Json<PostResponse>)> {
    let user = ctx.require_synced_user()?;
    let details = submission.normalize()?;

    let snapshot = UserSnapshot::capture(&ctx.identity, Some(user));
    let now = now_rfc3339();

    let post = HackFinderPost {
        id: None,
        details,
        moderation: moderation::initial_state(Some(user.role), snapshot, &now),
    };

    let post = state.db.insert_post(post).await?;

    tracing::info!(
        post_id = post.id.as_deref().unwrap_or_default(),
        status = ?post.moderation.status,
        "HackFinder post submitted"
    );

    Ok((StatusCode::CREATED, Json(PostResponse { post })))
}
