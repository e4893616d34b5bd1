//! Flat-file JSON store.
//!
//! Every collection lives in its own pretty-printed JSON file and is read and
//! rewritten wholesale. Each file has an async lock so that a read-modify-write
//! cycle on one file never interleaves with another, and writes land through a
//! temporary file plus rename.

use crate::utils::AppError;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;

pub mod collections {
    pub const FEEDS: &str = "feed_data.json";
    pub const PRESETS: &str = "client_info.json";
    pub const CLIENT_EMAILS: &str = "client_emails.json";
    pub const CLIENT_FEEDBACK: &str = "client_feedback.json";
    pub const APPROVALS: &str = "approvals.json";
    pub const SCHEDULERS: &str = "scheduler.json";
    pub const USERS: &str = "users.json";
}

#[derive(Clone)]
pub struct JsonStore {
    dir: PathBuf,
    locks: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

/// Raw file content alongside its decoded value.
struct Loaded<T> {
    value: T,
    raw: Option<String>,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn ensure_dir(&self) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    fn lock_for(&self, file: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(file.to_string()).or_default().clone()
    }

    /// Reads a collection. Missing, empty or unreadable files read as the default.
    pub async fn read<T>(&self, file: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        let lock = self.lock_for(file);
        let _guard = lock.lock().await;

        match self.load::<T>(file).await {
            Ok(loaded) => loaded.value,
            Err(e) => {
                log::error!("❌ Error reading {}: {}", self.path(file).display(), e);
                T::default()
            }
        }
    }

    /// Replaces a collection.
    pub async fn write<T>(&self, file: &str, value: &T) -> Result<(), AppError>
    where
        T: Serialize,
    {
        let lock = self.lock_for(file);
        let _guard = lock.lock().await;

        let json = serde_json::to_string_pretty(value)?;
        self.persist(file, &json).await
    }

    /// Read-modify-write under the file's lock.
    ///
    /// Nothing is written when `f` fails or leaves the collection unchanged.
    /// A corrupt file is reported instead of being overwritten.
    pub async fn update<T, R, F>(&self, file: &str, f: F) -> Result<R, AppError>
    where
        T: DeserializeOwned + Serialize + Default,
        F: FnOnce(&mut T) -> Result<R, AppError>,
    {
        let lock = self.lock_for(file);
        let _guard = lock.lock().await;

        let Loaded { mut value, raw } = self.load::<T>(file).await?;
        let result = f(&mut value)?;

        let json = serde_json::to_string_pretty(&value)?;
        if raw.as_deref() != Some(json.as_str()) {
            self.persist(file, &json).await?;
        }

        Ok(result)
    }

    async fn load<T>(&self, file: &str) -> Result<Loaded<T>, AppError>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.path(file);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(Loaded { value: T::default(), raw: None });
            }
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Loaded { value: T::default(), raw: None });
        }

        let value = serde_json::from_str(&raw)
            .map_err(|e| AppError::StorageError(format!("{} is corrupt: {}", path.display(), e)))?;

        Ok(Loaded { value, raw: Some(raw) })
    }

    async fn persist(&self, file: &str, json: &str) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path(file);
        let tmp = self.dir.join(format!(".{}.tmp", file));
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;

        log::debug!("💾 Wrote {}", path.display());
        Ok(())
    }
}
