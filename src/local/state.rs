// SPDX-License-Identifier: MIT
// Copyright 2026 EventsHub contributors

//! The local-mode state container and its pure mutations.
//!
//! Four collections: published events, published posts, and the two pending
//! queues. Collection membership and the embedded moderation status agree at
//! all times. Mutations are pure functions over the prior state; the store
//! persists the result after each accepted mutation.

use crate::error::AppError;
use crate::models::{EventDetails, ModerationState, ModerationStatus, PostDetails, UserSnapshot};
use crate::services::moderation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalEvent {
    pub id: u64,
    #[serde(flatten)]
    pub details: EventDetails,
    #[serde(flatten)]
    pub moderation: ModerationState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalPost {
    pub id: u64,
    #[serde(flatten)]
    pub details: PostDetails,
    #[serde(flatten)]
    pub moderation: ModerationState,
}

/// The whole local-mode dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalState {
    #[serde(default)]
    pub events: Vec<LocalEvent>,
    #[serde(default)]
    pub hackfinder_posts: Vec<LocalPost>,
    #[serde(default)]
    pub pending_events: Vec<LocalEvent>,
    #[serde(default)]
    pub pending_hackfinder_posts: Vec<LocalPost>,
}

impl LocalState {
    /// Assign the next entity id: one more than the highest id found across
    /// all four collections. Entities move between the pending and published
    /// collections, so every collection has to be scanned to avoid reissuing
    /// an id.
    pub fn next_id(&self) -> u64 {
        let max_id = self
            .events
            .iter()
            .map(|e| e.id)
            .chain(self.pending_events.iter().map(|e| e.id))
            .chain(self.hackfinder_posts.iter().map(|p| p.id))
            .chain(self.pending_hackfinder_posts.iter().map(|p| p.id))
            .max()
            .unwrap_or(0);
        max_id + 1
    }

    /// Published events, soonest first (ties: newest submission first).
    pub fn published_events(&self) -> Vec<LocalEvent> {
        let mut events = self.events.clone();
        events.sort_by(|a, b| {
            a.details
                .date
                .cmp(&b.details.date)
                .then_with(|| b.moderation.submitted_at.cmp(&a.moderation.submitted_at))
        });
        events
    }

    /// Published posts, newest first.
    pub fn published_posts(&self) -> Vec<LocalPost> {
        let mut posts = self.hackfinder_posts.clone();
        posts.sort_by(|a, b| b.moderation.submitted_at.cmp(&a.moderation.submitted_at));
        posts
    }

    /// The moderation queues, newest submission first.
    pub fn pending_queue(&self) -> (Vec<LocalEvent>, Vec<LocalPost>) {
        let mut events = self.pending_events.clone();
        events.sort_by(|a, b| b.moderation.submitted_at.cmp(&a.moderation.submitted_at));

        let mut posts = self.pending_hackfinder_posts.clone();
        posts.sort_by(|a, b| b.moderation.submitted_at.cmp(&a.moderation.submitted_at));

        (events, posts)
    }
}

fn event_not_found() -> AppError {
    AppError::NotFound("Event not found".to_string())
}

fn post_not_found() -> AppError {
    AppError::NotFound("HackFinder post not found".to_string())
}

/// Add a submitted event to the right collection for the submitter's role.
pub fn submit_event(
    mut state: LocalState,
    details: EventDetails,
    submitted_by: UserSnapshot,
    now: &str,
) -> (LocalState, LocalEvent) {
    let moderation = moderation::initial_state(submitted_by.role, submitted_by, now);
    let event = LocalEvent {
        id: state.next_id(),
        details,
        moderation,
    };

    match event.moderation.status {
        ModerationStatus::Published => state.events.push(event.clone()),
        _ => state.pending_events.push(event.clone()),
    }

    (state, event)
}

/// Add a submitted post to the right collection for the submitter's role.
pub fn submit_post(
    mut state: LocalState,
    details: PostDetails,
    submitted_by: UserSnapshot,
    now: &str,
) -> (LocalState, LocalPost) {
    let moderation = moderation::initial_state(submitted_by.role, submitted_by, now);
    let post = LocalPost {
        id: state.next_id(),
        details,
        moderation,
    };

    match post.moderation.status {
        ModerationStatus::Published => state.hackfinder_posts.push(post.clone()),
        _ => state.pending_hackfinder_posts.push(post.clone()),
    }

    (state, post)
}

/// Move a pending event to the published collection.
pub fn approve_event(
    mut state: LocalState,
    id: u64,
    approver: UserSnapshot,
    now: &str,
) -> Result<(LocalState, LocalEvent), AppError> {
    let index = state
        .pending_events
        .iter()
        .position(|e| e.id == id)
        .ok_or_else(event_not_found)?;

    let mut event = state.pending_events.remove(index);
    moderation::approve(&mut event.moderation, approver, now)?;
    state.events.push(event.clone());

    Ok((state, event))
}

/// Move a pending post to the published collection.
pub fn approve_post(
    mut state: LocalState,
    id: u64,
    approver: UserSnapshot,
    now: &str,
) -> Result<(LocalState, LocalPost), AppError> {
    let index = state
        .pending_hackfinder_posts
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(post_not_found)?;

    let mut post = state.pending_hackfinder_posts.remove(index);
    moderation::approve(&mut post.moderation, approver, now)?;
    state.hackfinder_posts.push(post.clone());

    Ok((state, post))
}

/// Reject a pending event. Rejected entities disappear from every listing,
/// so the record is discarded rather than re-filed.
pub fn reject_event(mut state: LocalState, id: u64) -> Result<(LocalState, LocalEvent), AppError> {
    let index = state
        .pending_events
        .iter()
        .position(|e| e.id == id)
        .ok_or_else(event_not_found)?;

    let mut event = state.pending_events.remove(index);
    moderation::reject(&mut event.moderation)?;

    Ok((state, event))
}

/// Reject a pending post.
pub fn reject_post(mut state: LocalState, id: u64) -> Result<(LocalState, LocalPost), AppError> {
    let index = state
        .pending_hackfinder_posts
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(post_not_found)?;

    let mut post = state.pending_hackfinder_posts.remove(index);
    moderation::reject(&mut post.moderation)?;

    Ok((state, post))
}

/// Remove an event from whichever collection holds it. Irreversible.
pub fn delete_event(mut state: LocalState, id: u64) -> Result<(LocalState, LocalEvent), AppError> {
    if let Some(index) = state.events.iter().position(|e| e.id == id) {
        let event = state.events.remove(index);
        return Ok((state, event));
    }
    if let Some(index) = state.pending_events.iter().position(|e| e.id == id) {
        let event = state.pending_events.remove(index);
        return Ok((state, event));
    }
    Err(event_not_found())
}

/// Remove a post from whichever collection holds it. Irreversible.
pub fn delete_post(mut state: LocalState, id: u64) -> Result<(LocalState, LocalPost), AppError> {
    if let Some(index) = state.hackfinder_posts.iter().position(|p| p.id == id) {
        let post = state.hackfinder_posts.remove(index);
        return Ok((state, post));
    }
    if let Some(index) = state
        .pending_hackfinder_posts
        .iter()
        .position(|p| p.id == id)
    {
        let post = state.pending_hackfinder_posts.remove(index);
        return Ok((state, post));
    }
    Err(post_not_found())
}
