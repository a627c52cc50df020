use serde::Serialize;
use uuid::Uuid;

use super::model::FeedbackSubmission;
use crate::config::CredentialTier;

/// Response for the website form and the debug harness.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackResponse {
    pub success: bool,
    pub message: String,
    pub data: FeedbackSubmission,
    /// `null` when the post-insert count could not be read.
    pub total_submissions: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub success: bool,
    pub submission_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct StoreStatusResponse {
    pub success: bool,
    pub data: StoreStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatus {
    pub backend: &'static str,
    pub tier: CredentialTier,
    pub reachable: bool,
    pub total_records: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
