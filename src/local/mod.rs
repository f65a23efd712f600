// SPDX-License-Identifier: MIT
// Copyright 2026 EventsHub contributors

//! Local-first deployment mode.
//!
//! A self-contained re-implementation of account handling, submission, and
//! moderation without the external identity provider: the role is chosen
//! directly at login (the admin role gated by a fixed access code), state
//! lives in one in-memory structure, and every accepted mutation is mirrored
//! to a JSON file. The moderation rules themselves are the shared
//! [`crate::services::moderation`] state machine.

pub mod state;
pub mod store;

pub use state::{LocalEvent, LocalPost, LocalState};
pub use store::{login, LocalSession, LocalStore};
