use crate::models::RecordKey;
use serde::{Deserialize, Serialize};

/// Reviewer email captured when a client opens a shared feed.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientEmail {
    #[schema(value_type = String)]
    pub feed_id: RecordKey,
    pub email: String,
    pub timestamp: i64,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientEmailRequest {
    #[schema(value_type = Option<String>)]
    pub feed_id: Option<RecordKey>,
    pub email: Option<String>,
}
