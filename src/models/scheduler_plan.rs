use crate::models::RecordKey;
use serde::{Deserialize, Serialize};

/// Publish-readiness flags for the posts of one feed, shared with whoever
/// does the actual posting.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerPlan {
    pub scheduler_id: i64,
    #[schema(value_type = String)]
    pub feed_id: RecordKey,
    #[serde(default)]
    pub scheduler_email: String,
    #[serde(default)]
    pub posts: Vec<ScheduledPost>,
    pub created_at: i64,
    pub shared_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledPost {
    pub post_id: String,
    #[serde(default)]
    pub scheduled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSchedulerRequest {
    #[schema(value_type = Option<String>)]
    pub feed_id: Option<RecordKey>,
    pub scheduler_email: Option<String>,
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduledPostRequest {
    pub scheduled: Option<bool>,
    pub scheduled_date: Option<String>,
    pub scheduled_time: Option<String>,
    pub caption: Option<String>,
}
