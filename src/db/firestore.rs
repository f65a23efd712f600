// SPDX-License-Identifier: MIT
// Copyright 2026 EventsHub contributors

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users and Profiles (keyed by the identity provider's subject id)
//! - Events and HackFinder posts (status-filtered, ordered listings plus
//!   atomic moderation transitions)
//!
//! The in-memory backend backs tests and offline development; it mirrors the
//! live backend's semantics, including the atomicity of `transact_*`.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Event, HackFinderPost, ModerationStatus, Profile, User};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    Live(firestore::FirestoreDb),
    Mem(Arc<MemStore>),
}

/// In-memory stand-in for Firestore, used by tests and offline development.
#[derive(Default)]
struct MemStore {
    users: DashMap<String, User>,
    profiles: DashMap<String, Profile>,
    events: DashMap<String, Event>,
    posts: DashMap<String, HackFinderPost>,
}

static DOC_SEQ: AtomicU64 = AtomicU64::new(0);

/// Generate a new document id: creation-time ordered, unique within the
/// process via a wrapping sequence suffix.
fn generate_doc_id() -> String {
    let micros = chrono::Utc::now().timestamp_micros().max(0) as u64;
    let seq = DOC_SEQ.fetch_add(1, Ordering::Relaxed) & 0xffff;
    format!("{micros:014x}{seq:04x}")
}

fn event_not_found() -> AppError {
    AppError::NotFound("Event not found".to_string())
}

fn post_not_found() -> AppError {
    AppError::NotFound("HackFinder post not found".to_string())
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            backend: Backend::Live(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            backend: Backend::Live(client),
        })
    }

    /// Create an in-memory database for testing (offline mode).
    pub fn new_mock() -> Self {
        Self {
            backend: Backend::Mem(Arc::new(MemStore::default())),
        }
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by their identity provider subject id.
    pub async fn get_user(&self, subject_id: &str) -> Result<Option<User>, AppError> {
        match &self.backend {
            Backend::Mem(store) => Ok(store.users.get(subject_id).map(|u| u.clone())),
            Backend::Live(client) => client
                .fluent()
                .select()
                .by_id_in(collections::USERS)
                .obj()
                .one(subject_id)
                .await
                .map_err(|e| AppError::Database(e.to_string())),
        }
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        match &self.backend {
            Backend::Mem(store) => {
                store.users.insert(user.subject_id.clone(), user.clone());
                Ok(())
            }
            Backend::Live(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::USERS)
                    .document_id(&user.subject_id)
                    .object(user)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }
        }
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Get a profile by subject id.
    pub async fn get_profile(&self, subject_id: &str) -> Result<Option<Profile>, AppError> {
        match &self.backend {
            Backend::Mem(store) => Ok(store.profiles.get(subject_id).map(|p| p.clone())),
            Backend::Live(client) => client
                .fluent()
                .select()
                .by_id_in(collections::PROFILES)
                .obj()
                .one(subject_id)
                .await
                .map_err(|e| AppError::Database(e.to_string())),
        }
    }

    /// Create or update a profile.
    pub async fn upsert_profile(&self, profile: &Profile) -> Result<(), AppError> {
        match &self.backend {
            Backend::Mem(store) => {
                store
                    .profiles
                    .insert(profile.subject_id.clone(), profile.clone());
                Ok(())
            }
            Backend::Live(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::PROFILES)
                    .document_id(&profile.subject_id)
                    .object(profile)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }
        }
    }

    // ─── Event Operations ────────────────────────────────────────

    /// Store a new event, assigning its document id.
    pub async fn insert_event(&self, mut event: Event) -> Result<Event, AppError> {
        let doc_id = generate_doc_id();
        event.id = Some(doc_id.clone());

        match &self.backend {
            Backend::Mem(store) => {
                store.events.insert(doc_id, event.clone());
                Ok(event)
            }
            Backend::Live(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::EVENTS)
                    .document_id(&doc_id)
                    .object(&event)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(event)
            }
        }
    }

    /// List events with the given status.
    ///
    /// Published events come back ordered by event date ascending with ties
    /// broken by submission time descending; pending (and rejected) events by
    /// submission time descending.
    pub async fn list_events_by_status(
        &self,
        status: ModerationStatus,
    ) -> Result<Vec<Event>, AppError> {
        let mut events: Vec<Event> = match &self.backend {
            Backend::Mem(store) => store
                .events
                .iter()
                .filter(|entry| entry.value().moderation.status == status)
                .map(|entry| entry.value().clone())
                .collect(),
            Backend::Live(client) => {
                let status_name = status.as_str();
                client
                    .fluent()
                    .select()
                    .from(collections::EVENTS)
                    .filter(move |q| q.field("status").eq(status_name))
                    .obj()
                    .query()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?
            }
        };

        // Ordering is applied in-process so both backends agree exactly.
        match status {
            ModerationStatus::Published => events.sort_by(|a, b| {
                a.details
                    .date
                    .cmp(&b.details.date)
                    .then_with(|| b.moderation.submitted_at.cmp(&a.moderation.submitted_at))
            }),
            _ => events
                .sort_by(|a, b| b.moderation.submitted_at.cmp(&a.moderation.submitted_at)),
        }

        Ok(events)
    }

    /// Atomically mutate an event: read, apply `mutate`, write back.
    ///
    /// Live mode wraps the write in a Firestore transaction so concurrent
    /// transitions on the same id cannot both commit against stale state; the
    /// in-memory mode holds the entry lock across the closure.
    pub async fn transact_event<F>(&self, event_id: &str, mutate: F) -> Result<Event, AppError>
    where
        F: FnOnce(&mut Event) -> Result<(), AppError>,
    {
        match &self.backend {
            Backend::Mem(store) => {
                let mut entry = store.events.get_mut(event_id).ok_or_else(event_not_found)?;
                mutate(entry.value_mut())?;
                Ok(entry.value().clone())
            }
            Backend::Live(client) => {
                let mut transaction = client
                    .begin_transaction()
                    .await
                    .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

                let mut event: Event = client
                    .fluent()
                    .select()
                    .by_id_in(collections::EVENTS)
                    .obj()
                    .one(event_id)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?
                    .ok_or_else(event_not_found)?;

                if let Err(err) = mutate(&mut event) {
                    let _ = transaction.rollback().await;
                    return Err(err);
                }

                client
                    .fluent()
                    .update()
                    .in_col(collections::EVENTS)
                    .document_id(event_id)
                    .object(&event)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!("Failed to add event to transaction: {}", e))
                    })?;

                transaction
                    .commit()
                    .await
                    .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

                Ok(event)
            }
        }
    }

    /// Delete an event regardless of status, returning the removed record.
    pub async fn delete_event(&self, event_id: &str) -> Result<Event, AppError> {
        match &self.backend {
            Backend::Mem(store) => store
                .events
                .remove(event_id)
                .map(|(_, event)| event)
                .ok_or_else(event_not_found),
            Backend::Live(client) => {
                let event: Event = client
                    .fluent()
                    .select()
                    .by_id_in(collections::EVENTS)
                    .obj()
                    .one(event_id)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?
                    .ok_or_else(event_not_found)?;

                client
                    .fluent()
                    .delete()
                    .from(collections::EVENTS)
                    .document_id(event_id)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;

                Ok(event)
            }
        }
    }

    // ─── HackFinder Post Operations ──────────────────────────────

    /// Store a new post, assigning its document id.
    pub async fn insert_post(&self, mut post: HackFinderPost) -> Result<HackFinderPost, AppError> {
        let doc_id = generate_doc_id();
        post.id = Some(doc_id.clone());

        match &self.backend {
            Backend::Mem(store) => {
                store.posts.insert(doc_id, post.clone());
                Ok(post)
            }
            Backend::Live(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::HACKFINDER_POSTS)
                    .document_id(&doc_id)
                    .object(&post)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(post)
            }
        }
    }

    /// List posts with the given status, ordered by submission time
    /// descending.
    pub async fn list_posts_by_status(
        &self,
        status: ModerationStatus,
    ) -> Result<Vec<HackFinderPost>, AppError> {
        let mut posts: Vec<HackFinderPost> = match &self.backend {
            Backend::Mem(store) => store
                .posts
                .iter()
                .filter(|entry| entry.value().moderation.status == status)
                .map(|entry| entry.value().clone())
                .collect(),
            Backend::Live(client) => {
                let status_name = status.as_str();
                client
                    .fluent()
                    .select()
                    .from(collections::HACKFINDER_POSTS)
                    .filter(move |q| q.field("status").eq(status_name))
                    .obj()
                    .query()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?
            }
        };

        posts.sort_by(|a, b| b.moderation.submitted_at.cmp(&a.moderation.submitted_at));

        Ok(posts)
    }

    /// Atomically mutate a post; see [`FirestoreDb::transact_event`].
    pub async fn transact_post<F>(
        &self,
        post_id: &str,
        mutate: F,
    ) -> Result<HackFinderPost, AppError>
    where
        F: FnOnce(&mut HackFinderPost) -> Result<(), AppError>,
    {
        match &self.backend {
            Backend::Mem(store) => {
                let mut entry = store.posts.get_mut(post_id).ok_or_else(post_not_found)?;
                mutate(entry.value_mut())?;
                Ok(entry.value().clone())
            }
            Backend::Live(client) => {
                let mut transaction = client
                    .begin_transaction()
                    .await
                    .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

                let mut post: HackFinderPost = client
                    .fluent()
                    .select()
                    .by_id_in(collections::HACKFINDER_POSTS)
                    .obj()
                    .one(post_id)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?
                    .ok_or_else(post_not_found)?;

                if let Err(err) = mutate(&mut post) {
                    let _ = transaction.rollback().await;
                    return Err(err);
                }

                client
                    .fluent()
                    .update()
                    .in_col(collections::HACKFINDER_POSTS)
                    .document_id(post_id)
                    .object(&post)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!("Failed to add post to transaction: {}", e))
                    })?;

                transaction
                    .commit()
                    .await
                    .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

                Ok(post)
            }
        }
    }

    /// Delete a post regardless of status, returning the removed record.
    pub async fn delete_post(&self, post_id: &str) -> Result<HackFinderPost, AppError> {
        match &self.backend {
            Backend::Mem(store) => store
                .posts
                .remove(post_id)
                .map(|(_, post)| post)
                .ok_or_else(post_not_found),
            Backend::Live(client) => {
                let post: HackFinderPost = client
                    .fluent()
                    .select()
                    .by_id_in(collections::HACKFINDER_POSTS)
                    .obj()
                    .one(post_id)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?
                    .ok_or_else(post_not_found)?;

                client
                    .fluent()
                    .delete()
                    .from(collections::HACKFINDER_POSTS)
                    .document_id(post_id)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;

                Ok(post)
            }
        }
    }
}
