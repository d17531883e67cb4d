//! File-backed duration store.
//!
//! The whole store is one flat JSON object, `{ "<deployment id>": <epoch seconds> }`,
//! rewritten on every mutation through a temp file that is synced and then
//! renamed over the original. The directory is synced after the rename so
//! the new entry survives a crash too.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use herald_domain::{DeploymentId, EpochSeconds, StoreError};
use herald_ports::DurationStore;

use crate::decode_timestamp;

pub struct FileDurationStore {
    path: PathBuf,
    records: Mutex<Map<String, Value>>,
}

impl FileDurationStore {
    /// Loads the store at `path`. A missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let records = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Map::new(),
            Ok(bytes) => serde_json::from_slice::<Map<String, Value>>(&bytes).map_err(|source| {
                StoreError::Malformed {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        tracing::info!(path = %path.display(), records = records.len(), "duration store loaded");
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    fn parent_dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn commit(&self, records: &Map<String, Value>) -> Result<(), StoreError> {
        let content = serde_json::to_vec_pretty(records)?;
        let temp = self.temp_path();

        let mut file = tokio::fs::File::create(&temp)
            .await
            .map_err(|e| StoreError::io(&temp, e))?;
        file.write_all(&content)
            .await
            .map_err(|e| StoreError::io(&temp, e))?;
        file.sync_all().await.map_err(|e| StoreError::io(&temp, e))?;
        drop(file);

        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        sync_dir(self.parent_dir()).await
    }
}

#[cfg(unix)]
async fn sync_dir(dir: &Path) -> Result<(), StoreError> {
    let handle = tokio::fs::File::open(dir)
        .await
        .map_err(|e| StoreError::io(dir, e))?;
    handle.sync_all().await.map_err(|e| StoreError::io(dir, e))
}

// Directories cannot be opened for syncing here; the rename is all we get.
#[cfg(not(unix))]
async fn sync_dir(_dir: &Path) -> Result<(), StoreError> {
    Ok(())
}

#[async_trait]
impl DurationStore for FileDurationStore {
    async fn put(&self, id: &DeploymentId, started_at: EpochSeconds) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        let mut next = records.clone();
        next.insert(id.to_string(), Value::from(started_at));
        self.commit(&next).await?;
        *records = next;
        Ok(())
    }

    async fn get(&self, id: &DeploymentId) -> Result<Option<EpochSeconds>, StoreError> {
        let records = self.records.lock().await;
        records
            .get(id.as_str())
            .map(|value| decode_timestamp(id.as_str(), value))
            .transpose()
    }

    async fn delete(&self, id: &DeploymentId) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        if !records.contains_key(id.as_str()) {
            return Ok(());
        }
        let mut next = records.clone();
        next.remove(id.as_str());
        self.commit(&next).await?;
        *records = next;
        Ok(())
    }
}
