// SPDX-License-Identifier: MIT
// Copyright 2026 EventsHub contributors

//! Services module - business logic layer.

pub mod account;
pub mod identity;
pub mod moderation;
pub mod roles;

pub use identity::{IdentityError, IdentityVerifier, VerifiedIdentity};
pub use moderation::TransitionError;
pub use roles::resolve_role;
