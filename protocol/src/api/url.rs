//! Link API DTOs
//!
//! Bodies for the `/urls` endpoints and the password gate on protected
//! short links (`POST /s/{code}/verify`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create a short link, `POST /urls`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    #[validate(url)]
    pub original_url: String,
    #[validate(length(max = 255))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(length(min = 3, max = 64))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,
    #[validate(range(min = 1))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_clicks: Option<u64>,
}

impl CreateLinkRequest {
    /// Minimal request shortening `original_url` with server-picked code
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            ..Self::default()
        }
    }
}

/// Partial update of a link, `PATCH /urls/{id}`
///
/// Only present fields are sent; the backend leaves the rest untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Password challenge for a protected short link, `POST /s/{code}/verify`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyLinkPasswordRequest {
    #[validate(length(min = 1))]
    pub password: String,
}

/// Successful password challenge: destination to follow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyLinkPasswordResponse {
    pub original_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_omits_unset_fields() {
        let req = CreateLinkRequest::new("https://example.com/a/very/long/path");
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("originalUrl"));
        assert!(!json.contains("customAlias"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn update_request_sends_only_changes() {
        let req = UpdateLinkRequest {
            is_active: Some(false),
            ..UpdateLinkRequest::default()
        };
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"isActive":false}"#);
    }
}
