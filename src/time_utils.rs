// SPDX-License-Identifier: MIT
// Copyright 2026 EventsHub contributors

//! Shared helpers for date/time formatting.
//!
//! Timestamps are stored and serialized as RFC3339 strings so that the
//! documents stay human-readable and sort lexicographically.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The current UTC time as an RFC3339 string.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}
