//! Processed clips on disk, addressed by id.
//!
//! Every file name carries a fresh UUID so concurrent requests never share a
//! path. The store only tracks clips it wrote; clearing one deletes its file.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Default)]
struct Clips {
    paths: HashMap<Uuid, PathBuf>,
    // Most recently processed clip, for the "clear" action.
    last: Option<Uuid>,
}

pub struct ClipStore {
    work_dir: PathBuf,
    clips: Mutex<Clips>,
}

impl ClipStore {
    /// Use `work_dir` for all files, creating it if needed.
    pub fn open<P: AsRef<Path>>(work_dir: P) -> std::io::Result<Self> {
        let work_dir = work_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&work_dir)?;
        Ok(Self {
            work_dir,
            clips: Mutex::new(Clips::default()),
        })
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Where the raw synthesized audio for request `id` is downloaded to.
    pub fn raw_path(&self, id: Uuid, extension: &str) -> PathBuf {
        self.work_dir.join(format!("{id}.{extension}"))
    }

    /// Where the processed clip `id` lives.
    pub fn clip_path(&self, id: Uuid) -> PathBuf {
        self.work_dir.join(format!("{id}_processed.wav"))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Clips>, ApiError> {
        self.clips
            .lock()
            .map_err(|_| ApiError::InternalError("Clip store lock poisoned".to_string()))
    }

    /// Write a processed clip and start tracking it.
    pub async fn save(&self, id: Uuid, wav: &[u8]) -> Result<PathBuf, ApiError> {
        let path = self.clip_path(id);
        tokio::fs::write(&path, wav).await.map_err(|e| {
            ApiError::InternalError(format!("Failed to write {}: {e}", path.display()))
        })?;

        let mut clips = self.lock()?;
        clips.paths.insert(id, path.clone());
        clips.last = Some(id);
        Ok(path)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.lock().map(|c| c.paths.contains_key(&id)).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.lock().map(|c| c.paths.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read a processed clip back.
    pub async fn read(&self, id: Uuid) -> Result<Vec<u8>, ApiError> {
        let path = self
            .lock()?
            .paths
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("No processed audio with id {id}")))?;

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // Deleted behind our back; forget it.
                self.forget(id)?;
                Err(ApiError::NotFound(format!("No processed audio with id {id}")))
            }
            Err(e) => Err(ApiError::InternalError(format!(
                "Failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    /// Delete clip `id`.
    pub async fn remove(&self, id: Uuid) -> Result<(), ApiError> {
        let path = self
            .forget(id)?
            .ok_or_else(|| ApiError::NotFound(format!("No processed audio with id {id}")))?;
        delete_file(&path).await?;
        info!("Cleared processed audio {}", id);
        Ok(())
    }

    /// Delete the most recently processed clip, if it is still around.
    pub async fn clear_last(&self) -> Result<Option<Uuid>, ApiError> {
        let last = self.lock()?.last;
        match last {
            Some(id) if self.contains(id) => {
                self.remove(id).await?;
                Ok(Some(id))
            }
            _ => Ok(None),
        }
    }

    /// Delete every tracked clip. Failures are logged, not returned.
    pub async fn clear_all(&self) {
        let paths: Vec<PathBuf> = match self.lock() {
            Ok(mut clips) => {
                clips.last = None;
                clips.paths.drain().map(|(_, p)| p).collect()
            }
            Err(e) => {
                warn!("Could not clear clips: {e}");
                return;
            }
        };
        for path in paths {
            if let Err(e) = delete_file(&path).await {
                warn!("{e}");
            }
        }
    }

    fn forget(&self, id: Uuid) -> Result<Option<PathBuf>, ApiError> {
        let mut clips = self.lock()?;
        if clips.last == Some(id) {
            clips.last = None;
        }
        Ok(clips.paths.remove(&id))
    }
}

async fn delete_file(path: &Path) -> Result<(), ApiError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ApiError::InternalError(format!(
            "Failed to delete {}: {e}",
            path.display()
        ))),
    }
}
