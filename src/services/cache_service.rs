//! Local copies of Drive-hosted media.
//!
//! Files live under `<cache root>/<type folder>/` and are served at
//! `/CachedImages/...`. `metadata.json` at the cache root maps each file name
//! to the request that produced it so repeat requests reuse the file instead of
//! downloading it again.

use crate::{
    database::JsonStore,
    models::{type_folder, CacheDownloadResponse, CacheEntry, CacheMetadata, RecordKey, CACHE_FOLDERS},
    utils::{drive, ids, validation, AppError},
};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

const METADATA_FILE: &str = "metadata.json";
pub const PUBLIC_PREFIX: &str = "/CachedImages";
const MAX_REDIRECTS: usize = 5;
const DAY_SECS: u64 = 24 * 60 * 60;

#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError>;
}

/// Downloads over HTTP(S), following at most five redirects.
pub struct HttpMediaFetcher {
    client: reqwest::Client,
    max_bytes: usize,
}

impl HttpMediaFetcher {
    pub fn new(max_bytes: usize) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, max_bytes })
    }
}

fn download_failed(details: impl Into<String>) -> AppError {
    AppError::UpstreamError {
        message: "Failed to download image".to_string(),
        details: details.into(),
    }
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| download_failed(e.to_string()))?;

        let status = response.status();
        log::debug!("📡 Cache: Response status = {}", status);
        if !status.is_success() {
            return Err(download_failed(format!("HTTP {}", status.as_u16())));
        }

        if let Some(len) = response.content_length() {
            if len > self.max_bytes as u64 {
                return Err(download_failed(format!("File too large ({} bytes)", len)));
            }
        }

        // Chunked bodies carry no length, so the cap is enforced while reading.
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| download_failed(e.to_string()))? {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(download_failed(format!("File too large (over {} bytes)", self.max_bytes)));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct SweepReport {
    pub deleted: usize,
    pub pruned: usize,
}

#[derive(Clone)]
pub struct MediaCache {
    root: PathBuf,
    metadata: JsonStore,
    fetcher: Arc<dyn MediaFetcher>,
    max_age: Duration,
}

impl MediaCache {
    pub fn new(root: impl Into<PathBuf>, fetcher: Arc<dyn MediaFetcher>, max_age: Duration) -> Self {
        let root = root.into();
        Self {
            metadata: JsonStore::new(root.clone()),
            root,
            fetcher,
            max_age,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Creates the per-type folders.
    pub async fn initialize(&self) -> Result<(), AppError> {
        for folder in CACHE_FOLDERS {
            tokio::fs::create_dir_all(self.root.join(folder)).await?;
        }
        log::info!("📁 Cache directory initialized at {}", self.root.display());
        Ok(())
    }

    fn file_path(&self, folder: &str, file_name: &str) -> PathBuf {
        self.root.join(folder).join(file_name)
    }

    /// Public path of a cached file matching the request, if one is still on disk.
    /// Index entries whose files have disappeared are dropped along the way.
    pub async fn find_existing(
        &self,
        kind: &str,
        id: &RecordKey,
        index: Option<u32>,
        url: &str,
    ) -> Result<Option<String>, AppError> {
        self.metadata
            .update(METADATA_FILE, |metadata: &mut CacheMetadata| {
                let mut found = None;
                metadata.retain(|file_name, entry| {
                    let folder = type_folder(&entry.kind);
                    let exists = self.file_path(&folder, file_name).is_file();
                    if exists && found.is_none() && entry.describes(kind, id, index, url) {
                        found = Some(format!("{}/{}/{}", PUBLIC_PREFIX, folder, file_name));
                    }
                    exists
                });
                Ok(found)
            })
            .await
    }

    async fn record(&self, file_name: String, entry: CacheEntry) -> Result<(), AppError> {
        self.metadata
            .update(METADATA_FILE, move |metadata: &mut CacheMetadata| {
                metadata.insert(file_name, entry);
                Ok(())
            })
            .await
    }

    async fn forget(&self, file_name: &str) -> Result<(), AppError> {
        self.metadata
            .update(METADATA_FILE, |metadata: &mut CacheMetadata| {
                metadata.remove(file_name);
                Ok(())
            })
            .await
    }

    /// Returns a local copy of `url`, downloading it only when no usable copy exists.
    pub async fn download(
        &self,
        url: Option<String>,
        kind: Option<String>,
        id: Option<RecordKey>,
        index: Option<u32>,
    ) -> Result<CacheDownloadResponse, AppError> {
        let (url, kind, id) = match (url, kind, id) {
            (Some(url), Some(kind), Some(id)) if !url.is_empty() && !kind.is_empty() && !id.is_blank() => {
                (url, kind, id)
            }
            _ => {
                log::warn!("❌ Cache: Missing parameters");
                return Err(AppError::InvalidRequest("Missing required parameters".to_string()));
            }
        };
        if !validation::is_slug(&kind) {
            return Err(AppError::InvalidRequest("Invalid media type".to_string()));
        }

        log::info!("📥 Cache: Starting download for {}_{}", kind, id);
        log::debug!("📥 Cache: URL = {}", url.chars().take(80).collect::<String>());

        match self.find_existing(&kind, &id, index, &url).await {
            Ok(Some(local_path)) => {
                log::info!("✅ Cache: Reusing existing file {}", local_path);
                return Ok(CacheDownloadResponse {
                    local_path,
                    message: "Image served from cache".to_string(),
                });
            }
            Ok(None) => {}
            Err(e) => log::warn!("⚠️ Cache: metadata lookup failed, downloading again: {}", e),
        }

        let folder = type_folder(&kind);
        let suffix = match index {
            Some(i) if i != 0 => format!("_{}", i),
            _ => String::new(),
        };
        let file_name = format!(
            "{}_{}{}_{}.jpg",
            kind,
            validation::sanitize_file_fragment(&id.as_string()),
            suffix,
            ids::next_id()
        );

        let dir = self.root.join(&folder);
        tokio::fs::create_dir_all(&dir).await?;

        let fetch_url = if drive::is_share_link(&url) {
            drive::direct_image_url(&url)
        } else {
            url.clone()
        };
        let bytes = self.fetcher.fetch(&fetch_url).await.map_err(|e| {
            log::error!("❌ Cache: Download error: {}", e);
            e
        })?;

        let path = dir.join(&file_name);
        if let Err(e) = tokio::fs::write(&path, &bytes).await {
            log::error!("❌ Cache: File write error: {}", e);
            let _ = tokio::fs::remove_file(&path).await;
            return Err(AppError::StorageError(format!("Failed to write cache file: {}", e)));
        }
        log::info!(
            "✅ Cache: File saved successfully ({:.2} KB) at {}",
            bytes.len() as f64 / 1024.0,
            path.display()
        );

        let entry = CacheEntry {
            kind,
            id,
            index,
            original_url: url,
            cached_at: ids::now_iso(),
            cached_at_ms: ids::now_millis(),
        };
        if let Err(e) = self.record(file_name.clone(), entry).await {
            log::error!("❌ Failed to save cache metadata: {}", e);
        }

        Ok(CacheDownloadResponse {
            local_path: format!("{}/{}/{}", PUBLIC_PREFIX, folder, file_name),
            message: "Image cached successfully".to_string(),
        })
    }

    /// Maps `/CachedImages/<folder>/<file>` onto the cache root. The folder must
    /// be one of the type folders; anything else, the metadata index and
    /// paths trying to climb out of the root included, maps to `None`.
    pub fn resolve_public_path(&self, public_path: &str) -> Option<PathBuf> {
        let relative = public_path
            .trim_start_matches('/')
            .strip_prefix(PUBLIC_PREFIX.trim_start_matches('/'))?
            .strip_prefix('/')?;

        let mut components = Path::new(relative).components();
        let (Some(Component::Normal(folder)), Some(Component::Normal(file)), None) =
            (components.next(), components.next(), components.next())
        else {
            return None;
        };
        let folder = folder.to_str()?;
        if !CACHE_FOLDERS.contains(&folder) {
            return None;
        }

        Some(self.root.join(folder).join(file))
    }

    /// Deletes cached files by public path. Returns how many were removed.
    pub async fn delete_paths(&self, paths: &[String]) -> usize {
        let mut deleted = 0;

        for public_path in paths.iter().filter(|p| !p.is_empty()) {
            let Some(path) = self.resolve_public_path(public_path) else {
                log::debug!("Skipping non-cache path {}", public_path);
                continue;
            };
            if !path.is_file() {
                continue;
            }

            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    deleted += 1;
                    log::info!("🗑️ Deleted cache: {}", public_path);
                    if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
                        if let Err(e) = self.forget(file_name).await {
                            log::error!("❌ Failed to remove cache metadata: {}", e);
                        }
                    }
                }
                Err(e) => log::error!("❌ Failed to delete {}: {}", public_path, e),
            }
        }

        deleted
    }

    /// Removes files older than the configured age, then drops index entries
    /// whose files are gone.
    pub async fn sweep_expired(&self) -> SweepReport {
        let mut report = SweepReport::default();
        let now = SystemTime::now();

        for folder in CACHE_FOLDERS {
            let dir = self.root.join(folder);
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(_) => continue,
            };

            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => {
                        log::error!("❌ Cache cleanup: reading {} failed: {}", dir.display(), e);
                        break;
                    }
                };

                let modified = match entry.metadata().await.and_then(|m| {
                    if m.is_file() {
                        m.modified().map(Some)
                    } else {
                        Ok(None)
                    }
                }) {
                    Ok(Some(modified)) => modified,
                    Ok(None) => continue,
                    Err(e) => {
                        log::warn!("⚠️ Cache cleanup: cannot stat {}: {}", entry.path().display(), e);
                        continue;
                    }
                };

                let age = now.duration_since(modified).unwrap_or_default();
                if age <= self.max_age {
                    continue;
                }

                match tokio::fs::remove_file(entry.path()).await {
                    Ok(()) => {
                        report.deleted += 1;
                        log::info!(
                            "🧹 Cleanup: Deleted {} (age: {} days)",
                            entry.file_name().to_string_lossy(),
                            age.as_secs() / DAY_SECS
                        );
                    }
                    Err(e) => log::error!("❌ Failed to delete old cache {}: {}", entry.path().display(), e),
                }
            }
        }

        let pruned = self
            .metadata
            .update(METADATA_FILE, |metadata: &mut CacheMetadata| {
                let before = metadata.len();
                metadata.retain(|file_name, entry| self.file_path(&type_folder(&entry.kind), file_name).is_file());
                Ok(before - metadata.len())
            })
            .await;
        match pruned {
            Ok(pruned) => report.pruned = pruned,
            Err(e) => log::error!("❌ Cache cleanup: metadata prune failed: {}", e),
        }

        report
    }
}
