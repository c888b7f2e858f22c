//! Survey types

use serde::{Deserialize, Serialize};

use super::question::Question;

/// A survey and, when loaded in full, its questions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    /// Server-assigned id, absent until created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    /// Display title
    pub title: String,
    /// Creating user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i32>,
    /// Tenant the survey belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<i32>,
    /// Whether respondents can see the survey
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub published: bool,
    /// Questions, present only when the survey is loaded in full
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<Question>,
}

impl Survey {
    /// New unsaved survey with only a title
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Self::default() }
    }
}

/// Surveys visible to a single user, grouped by relationship
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSurveys {
    /// Published surveys the user can see
    #[serde(default)]
    pub published: Vec<Survey>,
    /// Surveys the user owns
    #[serde(default)]
    pub own: Vec<Survey>,
    /// Surveys the user contributes to
    #[serde(default)]
    pub contribute: Vec<Survey>,
}

/// Surveys belonging to a tenant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantSurveys {
    /// Tenant surveys visible to respondents
    #[serde(default)]
    pub published: Vec<Survey>,
    /// Tenant surveys still being drafted
    #[serde(default)]
    pub unpublished: Vec<Survey>,
}
