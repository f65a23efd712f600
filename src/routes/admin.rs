// SPDX-License-Identifier: MIT
// Copyright 2026 EventsHub contributors

//! Admin moderation routes: the pending queues and the approve / reject /
//! delete transitions. Every route requires the admin role.

use crate::error::{AppError, Result};
use crate::middleware::auth::AdminUser;
use crate::models::{Event, HackFinderPost, ModerationStatus, UserSnapshot};
use crate::routes::events::EventResponse;
use crate::routes::hackfinder::PostResponse;
use crate::services::moderation;
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/queues", get(get_queues))
        .route("/api/admin/events/{event_id}/approve", post(approve_event))
        .route("/api/admin/events/{event_id}/reject", post(reject_event))
        .route("/api/admin/events/{event_id}", delete(delete_event))
        .route("/api/admin/hackfinder/{post_id}/approve", post(approve_post))
        .route("/api/admin/hackfinder/{post_id}/reject", post(reject_post))
        .route("/api/admin/hackfinder/{post_id}", delete(delete_post))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct QueuesResponse {
    pub events: Vec<Event>,
    pub hackfinder_posts: Vec<HackFinderPost>,
}

/// The moderation queues: pending events and posts, newest first.
async fn get_queues(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<Json<QueuesResponse>> {
    let (events, hackfinder_posts) = tokio::try_join!(
        state.db.list_events_by_status(ModerationStatus::Pending),
        state.db.list_posts_by_status(ModerationStatus::Pending),
    )?;

    Ok(Json(QueuesResponse {
        events,
        hackfinder_posts,
    }))
}

/// Publish a pending event.
async fn approve_event(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(event_id): Path<String>,
) -> Result<Json<EventResponse>> {
    let snapshot = UserSnapshot::capture(&admin.identity, Some(&admin.user));
    let now = now_rfc3339();

    let event = state
        .db
        .transact_event(&event_id, move |event| {
            moderation::approve(&mut event.moderation, snapshot, &now).map_err(AppError::from)
        })
        .await?;

    tracing::info!(event_id = %event_id, admin = %admin.user.subject_id, "Event approved");

    Ok(Json(EventResponse { event }))
}

/// Reject a pending event. The approval pair is cleared, not restamped.
async fn reject_event(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(event_id): Path<String>,
) -> Result<Json<EventResponse>> {
    let event = state
        .db
        .transact_event(&event_id, |event| {
            moderation::reject(&mut event.moderation).map_err(AppError::from)
        })
        .await?;

    tracing::info!(event_id = %event_id, admin = %admin.user.subject_id, "Event rejected");

    Ok(Json(EventResponse { event }))
}

/// Remove an event regardless of status. Irreversible.
async fn delete_event(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(event_id): Path<String>,
) -> Result<Json<EventResponse>> {
    let event = state.db.delete_event(&event_id).await?;

    tracing::info!(event_id = %event_id, admin = %admin.user.subject_id, "Event deleted");

    Ok(Json(EventResponse { event }))
}

/// Publish a pending HackFinder post.
async fn approve_post(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(post_id): Path<String>,
) -> Result<Json<PostResponse>> {
    let snapshot = UserSnapshot::capture(&admin.identity, Some(&admin.user));
    let now = now_rfc3339();

    let post = state
        .db
        .transact_post(&post_id, move |post| {
            moderation::approve(&mut post.moderation, snapshot, &now).map_err(AppError::from)
        })
        .await?;

    tracing::info!(post_id = %post_id, admin = %admin.user.subject_id, "HackFinder post approved");

    Ok(Json(PostResponse { post }))
}

/// Reject a pending HackFinder post.
async fn reject_post(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(post_id): Path<String>,
) -> Result<Json<PostResponse>> {
    let post = state
        .db
        .transact_post(&post_id, |post| {
            moderation::reject(&mut post.moderation).map_err(AppError::from)
        })
        .await?;

    tracing::info!(post_id = %post_id, admin = %admin.user.subject_id, "HackFinder post rejected");

    Ok(Json(PostResponse { post }))
}

/// Remove a HackFinder post regardless of status. Irreversible.
async fn delete_post(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(post_id): Path<String>,
) -> Result<Json<PostResponse>> {
    let post = state.db.delete_post(&post_id).await?;

    tracing::info!(post_id = %post_id, admin = %admin.user.subject_id, "HackFinder post deleted");

    Ok(Json(PostResponse { post }))
}
