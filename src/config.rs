//! Application configuration loaded from environment variables.
//!
//! Privilege lists (admin / event-head emails) and allowed CORS origins are
//! comma-separated strings; entries are trimmed and blank entries dropped.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Identity provider project id (issuer/audience of identity assertions)
    pub identity_project_id: String,
    /// GCP project ID for Firestore
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Emails granted the admin role on account sync (lowercased)
    pub admin_emails: Vec<String>,
    /// Emails granted the eventHead role on account sync (lowercased)
    pub event_head_emails: Vec<String>,
    /// Allowed CORS origins; empty means any origin is allowed
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            identity_project_id: env::var("FIREBASE_PROJECT_ID")
                .map_err(|_| ConfigError::Missing("FIREBASE_PROJECT_ID"))?,
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5001".to_string())
                .parse()
                .unwrap_or(5001),
            admin_emails: parse_email_list(&env::var("ADMIN_EMAILS").unwrap_or_default()),
            event_head_emails: parse_email_list(&env::var("EVENT_HEAD_EMAILS").unwrap_or_default()),
            allowed_origins: parse_list(&env::var("ALLOWED_ORIGINS").unwrap_or_default()),
        })
    }

    /// Default config for tests.
    pub fn test_default() -> Self {
        Self {
            identity_project_id: "test-project".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 5001,
            admin_emails: vec!["admin@eventshub.edu".to_string()],
            event_head_emails: vec!["head@eventshub.edu".to_string()],
            allowed_origins: vec![],
        }
    }
}

/// Split a comma-separated value, trimming entries and dropping blanks.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Like [`parse_list`], but lowercases entries for case-insensitive matching.
pub fn parse_email_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|entry| entry.trim().to_lowercase())
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
