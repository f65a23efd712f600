//! Event model and submission normalization.

use crate::error::{AppError, Result};
use crate::models::ModerationState;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Content fields of an event, shared by the API server and the local
/// mirror (which embeds them with its own numeric ids).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub title: String,
    /// Event date, `YYYY-MM-DD` (sorts lexicographically)
    pub date: String,
    pub time: String,
    pub department: String,
    pub description: String,
    pub registration_link: String,
    #[serde(default)]
    pub featured: bool,
}

/// A campus event as stored and served.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Document id, assigned by the database layer on insert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub details: EventDetails,
    #[serde(flatten)]
    pub moderation: ModerationState,
}

/// Raw create-event payload before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSubmission {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub department: Option<String>,
    pub description: Option<String>,
    pub registration_link: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

impl EventSubmission {
    /// Validate and clean the payload into canonical event fields.
    ///
    /// Fails fast, naming the first missing or blank required field.
    pub fn normalize(self) -> Result<EventDetails> {
        let title = required_field(self.title, "title")?;
        let date = required_field(self.date, "date")?;
        let time = required_field(self.time, "time")?;
        let department = required_field(self.department, "department")?;
        let description = required_field(self.description, "description")?;
        let registration_link = required_field(self.registration_link, "registrationLink")?;

        Ok(EventDetails {
            title,
            date,
            time,
            department,
            description,
            registration_link,
            featured: self.featured,
        })
    }
}

/// Trim a required string field, rejecting missing or blank values.
pub(crate) fn required_field(value: Option<String>, name: &str) -> Result<String> {
    match value {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Err(AppError::Validation(format!(
                    "Missing required field: {name}"
                )))
            } else {
                Ok(trimmed.to_string())
            }
        }
        None => Err(AppError::Validation(format!(
            "Missing required field: {name}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_submission() -> EventSubmission {
        EventSubmission {
            title: Some("  Demo  ".to_string()),
            date: Some("2025-01-01".to_string()),
            time: Some("10:00".to_string()),
            department: Some("CS".to_string()),
            description: Some("d".to_string()),
            registration_link: Some("http://x".to_string()),
            featured: false,
        }
    }

    #[test]
    fn normalize_trims_all_string_fields() {
        let details = full_submission().normalize().unwrap();
        assert_eq!(details.title, "Demo");
        assert!(!details.featured);
    }

    #[test]
    fn normalize_fails_fast_on_first_missing_field() {
        let mut submission = full_submission();
        submission.date = None;
        submission.description = None;

        let err = submission.normalize().unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "Missing required field: date"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blank_field_counts_as_missing() {
        let mut submission = full_submission();
        submission.registration_link = Some("   ".to_string());

        let err = submission.normalize().unwrap_err();
        match err {
            AppError::Validation(msg) => {
                assert_eq!(msg, "Missing required field: registrationLink")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
