//! Contributor types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user allowed to edit a survey they do not own
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    /// User id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    /// Sign-in email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Name shown in the contributor list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Contributors of a survey plus invitations not yet accepted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributors {
    /// Survey the list belongs to
    pub survey_id: i32,
    /// Accepted contributors
    #[serde(default)]
    pub contributors: Vec<Contributor>,
    /// Pending invitations
    #[serde(default)]
    pub requests: Vec<ContributorRequest>,
}

/// Invitation for an email address to contribute to a survey
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorRequest {
    /// Server-assigned id, absent until created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    /// Survey the invitation is for
    pub survey_id: i32,
    /// Invitee address
    pub email_address: String,
    /// Set by the backend when the invitation is stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

impl ContributorRequest {
    /// New unsaved invitation
    pub fn new(survey_id: i32, email_address: impl Into<String>) -> Self {
        Self { id: None, survey_id, email_address: email_address.into(), created: None }
    }
}
