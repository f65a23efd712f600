// SPDX-License-Identifier: MIT
// Copyright 2026 EventsHub contributors

//! EventsHub API Server
//!
//! Campus events and team-matching backend: event and HackFinder post
//! submission, role-gated moderation queues, and account sync against the
//! external identity provider.

use eventshub::{config::Config, db::FirestoreDb, services::IdentityVerifier, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting EventsHub API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Initialize identity assertion verifier
    let identity_verifier = Arc::new(
        IdentityVerifier::new(&config.identity_project_id)
            .expect("Failed to initialize identity verifier"),
    );
    tracing::info!(
        admins = config.admin_emails.len(),
        event_heads = config.event_head_emails.len(),
        "Privilege lists loaded"
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        identity_verifier,
    });

    // Build router
    let app = eventshub::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("eventshub=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
