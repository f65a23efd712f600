// SPDX-License-Identifier: MIT
// Copyright 2026 EventsHub contributors

//! Account sync route.

use crate::error::Result;
use crate::middleware::auth::AuthContext;
use crate::models::{Profile, User};
use crate::services::account;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/auth/sync", post(sync_account))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SyncResponse {
    pub user: User,
    pub profile: Profile,
}

/// Reconcile the caller's identity assertion with the internal User and
/// Profile records.
async fn sync_account(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
) -> Result<Json<SyncResponse>> {
    let (user, profile) =
        account::sync_account(&state.db, &state.config, &ctx.identity, ctx.user).await?;

    Ok(Json(SyncResponse { user, profile }))
}
