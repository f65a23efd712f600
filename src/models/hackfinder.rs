//! HackFinder post model and submission normalization.
//!
//! Posts are either a team looking for members or an individual looking for
//! a team; `teamSize` is only meaningful for team posts.

use crate::error::{AppError, Result};
use crate::models::event::required_field;
use crate::models::ModerationState;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Team,
    Individual,
}

/// Content fields of a HackFinder post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct PostDetails {
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub title: String,
    pub description: String,
    /// Ordered, trimmed, blank-filtered; duplicates kept
    #[serde(default)]
    pub skills: Vec<String>,
    /// Only retained for team posts, e.g. "4/6"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_size: Option<String>,
    pub contact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// A HackFinder post as stored and served.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct HackFinderPost {
    /// Document id, assigned by the database layer on insert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub details: PostDetails,
    #[serde(flatten)]
    pub moderation: ModerationState,
}

/// Skills arrive either pre-split or as one comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
    List(Vec<String>),
    Text(String),
}

/// Raw create-post payload before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSubmission {
    #[serde(rename = "type")]
    pub post_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub skills: Option<SkillsInput>,
    pub team_size: Option<String>,
    pub contact: Option<String>,
    pub author: Option<String>,
    pub department: Option<String>,
}

impl PostSubmission {
    /// Validate and clean the payload into canonical post fields.
    pub fn normalize(self) -> Result<PostDetails> {
        let raw_type = required_field(self.post_type, "type")?;
        let post_type = match raw_type.to_lowercase().as_str() {
            "team" => PostType::Team,
            "individual" => PostType::Individual,
            _ => {
                return Err(AppError::Validation(
                    "HackFinder post type must be either \"team\" or \"individual\"".to_string(),
                ))
            }
        };

        let title = required_field(self.title, "title")?;
        let description = required_field(self.description, "description")?;
        let contact = required_field(self.contact, "contact")?;

        let skills = normalize_skills(self.skills);

        let team_size = match post_type {
            PostType::Team => self
                .team_size
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            PostType::Individual => None,
        };

        Ok(PostDetails {
            post_type,
            title,
            description,
            skills,
            team_size,
            contact,
            author: trim_optional(self.author),
            department: trim_optional(self.department),
        })
    }
}

/// Normalize skills to a trimmed, blank-filtered, order-preserving list.
fn normalize_skills(input: Option<SkillsInput>) -> Vec<String> {
    let raw = match input {
        None => return Vec::new(),
        Some(SkillsInput::List(items)) => items,
        Some(SkillsInput::Text(text)) => text.split(',').map(str::to_string).collect(),
    };

    raw.into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn trim_optional(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
