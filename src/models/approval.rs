use crate::models::{ClientFeedback, RecordKey};
use serde::{Deserialize, Serialize};

/// Frozen copy of a client's draft at submission time. Never modified.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    pub approval_id: i64,
    #[schema(value_type = String)]
    pub feed_id: RecordKey,
    pub client_email: String,
    pub payload: ApprovalPayload,
    pub submitted_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalPayload {
    pub grid_comment: String,
    pub posts: Vec<ApprovedPost>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedPost {
    pub post_id: String,
    pub liked: bool,
    pub comments: Vec<String>,
}

impl ApprovalPayload {
    pub fn snapshot(draft: &ClientFeedback) -> Self {
        ApprovalPayload {
            grid_comment: draft.grid_comment.clone(),
            posts: draft
                .posts
                .iter()
                .map(|p| ApprovedPost {
                    post_id: p.post_id.clone(),
                    liked: p.liked,
                    comments: p.comments.iter().map(|c| c.text.clone()).collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApprovalRequest {
    #[schema(value_type = Option<String>)]
    pub feed_id: Option<RecordKey>,
    pub client_email: Option<String>,
}
