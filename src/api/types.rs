//! API request and response types

use crate::runtime::Reply;
use crate::state_machine::Attributes;
use crate::tree::Issue;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Response for a newly opened session
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreatedResponse {
    pub session_id: String,
    pub reply: Reply,
}

/// Debug view of a stored session
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    pub attributes: Attributes,
    pub updated_at: DateTime<Utc>,
}

/// Validation report for the loaded tree
#[derive(Debug, Serialize)]
pub struct TreeIssuesResponse {
    pub root: String,
    pub nodes: usize,
    pub issues: Vec<Issue>,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
