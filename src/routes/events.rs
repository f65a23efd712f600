// SPDX-License-Identifier: MIT
// Copyright 2026 EventsHub contributors

//! Event listing and submission routes.

use crate::error::Result;
use crate::middleware::auth::AuthContext;
use crate::models::event::EventSubmission;
use crate::models::{Event, ModerationStatus, UserSnapshot};
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
        .route("/api/events", get(list_events))
        .route("/api/events", post(create_event))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EventsResponse {
    pub events: Vec<Event>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EventResponse {
    pub event: Event,
}

/// Public listing: published events, soonest first.
async fn list_events(State(state): State<Arc<AppState>>) -> Result<Json<EventsResponse>> {
    let events = state
        .db
        .list_events_by_status(ModerationStatus::Published)
        .await?;

    Ok(Json(EventsResponse { events }))
}

/// Submit an event. Privileged submitters publish immediately; everyone
/// else lands in the moderation queue.
async fn create_event(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Json(submission): Json<EventSubmission>,
) -> Result<(StatusCode, Json<EventResponse>)> {
    let details = submission.normalize()?;

    let snapshot = UserSnapshot::capture(&ctx.identity, ctx.user.as_ref());
    let role = ctx.user.as_ref().map(|u| u.role);
    let now = now_rfc3339();

    let event = Event {
        id: None,
        details,
        moderation: moderation::initial_state(role, snapshot, &now),
    };

    let event = state.db.insert_event(event).await?;

    tracing::info!(
        event_id = event.id.as_deref().unwrap_or_default(),
        status = ?event.moderation.status,
        "Event submitted"
    );

    Ok((StatusCode::CREATED, Json(EventResponse { event })))
}
