use crate::models::RecordKey;
use serde::{Deserialize, Serialize};

/// Mutable review draft of one client on one feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientFeedback {
    pub feed_id: RecordKey,
    pub client_email: String,
    #[serde(default)]
    pub grid_comment: String,
    #[serde(default)]
    pub posts: Vec<PostFeedback>,
    pub last_updated: i64,
}

impl ClientFeedback {
    pub fn empty(feed_id: RecordKey, client_email: &str, now: i64) -> Self {
        ClientFeedback {
            feed_id,
            client_email: client_email.to_string(),
            grid_comment: String::new(),
            posts: Vec::new(),
            last_updated: now,
        }
    }

    pub fn belongs_to(&self, feed_id: &RecordKey, client_email: &str) -> bool {
        &self.feed_id == feed_id && self.client_email == client_email
    }

    /// Entry for `post_id`, created unliked and without comments when absent.
    pub fn post_entry(&mut self, post_id: &str) -> &mut PostFeedback {
        let idx = match self.posts.iter().position(|p| p.post_id == post_id) {
            Some(idx) => idx,
            None => {
                self.posts.push(PostFeedback {
                    post_id: post_id.to_string(),
                    liked: false,
                    comments: Vec::new(),
                });
                self.posts.len() - 1
            }
        };
        &mut self.posts[idx]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFeedback {
    pub post_id: String,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub timestamp: i64,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackQuery {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveFeedbackRequest {
    #[schema(value_type = Option<String>)]
    pub feed_id: Option<RecordKey>,
    pub client_email: Option<String>,
    pub grid_comment: Option<String>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub posts: Option<Vec<PostFeedback>>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    #[schema(value_type = Option<String>)]
    pub feed_id: Option<RecordKey>,
    pub client_email: Option<String>,
    pub post_id: Option<String>,
    pub liked: Option<bool>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentRequest {
    #[schema(value_type = Option<String>)]
    pub feed_id: Option<RecordKey>,
    pub client_email: Option<String>,
    pub post_id: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCommentRequest {
    #[schema(value_type = Option<String>)]
    pub feed_id: Option<RecordKey>,
    pub client_email: Option<String>,
    pub post_id: Option<String>,
    pub comment_id: Option<String>,
}
