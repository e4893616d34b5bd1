use crate::models::RecordKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cached file name -> where it came from.
pub type CacheMetadata = BTreeMap<String, CacheEntry>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: RecordKey,
    #[serde(default)]
    pub index: Option<u32>,
    pub original_url: String,
    pub cached_at: String,
    pub cached_at_ms: i64,
}

impl CacheEntry {
    pub fn describes(&self, kind: &str, id: &RecordKey, index: Option<u32>, url: &str) -> bool {
        self.kind == kind && &self.id == id && self.index == index && self.original_url == url
    }
}

/// Folder under the cache root for a media type.
pub fn type_folder(kind: &str) -> String {
    match kind {
        "post" => "posts".to_string(),
        "reel" => "reels".to_string(),
        "carousel" => "carousels".to_string(),
        "profile" => "profiles".to_string(),
        other => format!("{}s", other),
    }
}

pub const CACHE_FOLDERS: [&str; 4] = ["posts", "reels", "carousels", "profiles"];

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CacheDownloadRequest {
    pub google_drive_url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[schema(value_type = Option<String>)]
    pub id: Option<RecordKey>,
    pub index: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CacheDownloadResponse {
    pub local_path: String,
    pub message: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CacheDeleteRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[schema(value_type = Option<String>)]
    pub id: Option<RecordKey>,
    #[schema(value_type = Option<Vec<String>>)]
    pub paths: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CacheDeleteResponse {
    pub deleted: usize,
    pub message: String,
}
