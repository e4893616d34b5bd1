use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedKind {
    #[default]
    Grid,
    Single,
}

/// A saved mockup: account header plus ordered posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: FeedKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: FeedState,
    /// Feeds saved before sign-in existed have no owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Feed {
    pub fn is_owned_by_other(&self, user_id: &str) -> bool {
        matches!(&self.user_id, Some(owner) if owner != user_id)
    }
}

/// Editor state. Keys the server does not model (active tab, selection, ...) are
/// kept as-is so the editor can restore them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedState {
    #[serde(default)]
    pub account_info: AccountInfo,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pfp: String,
    #[serde(default)]
    pub followers: String,
    #[serde(default)]
    pub following: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_pfp: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Post,
    Reel,
    Carousel,
}

/// One tile of the grid. Media fields depend on the kind: `url` for posts,
/// `videoUrl`/`thumbnail` for reels, `images` for carousels, each with the
/// matching `cached*` local copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PostKind,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_video_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    // The editor fills this by index, so it can contain holes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_images: Option<Vec<Option<String>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateFeedRequest {
    #[serde(rename = "type", default)]
    #[schema(value_type = Option<String>, example = "Grid")]
    pub kind: Option<FeedKind>,
    pub name: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub state: Option<FeedState>,
}

/// Saved account header the editor can re-apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    #[serde(default)]
    pub data: AccountInfo,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
