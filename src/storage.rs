use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// A list of records kept in memory and mirrored to a single JSON file.
///
/// Reads take a snapshot. Writes go through [`JsonStore::begin`], which holds
/// the store lock until the transaction is committed or dropped.
pub struct JsonStore<T> {
    path: PathBuf,
    items: Mutex<Vec<T>>,
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send,
{
    /// Load the file at `path`. A missing file is an empty list; the parent
    /// directory is created on demand.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(io_err(parent))?;
        }

        let items = match tokio::fs::read(&path).await {
            Ok(raw) if raw.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(raw) => serde_json::from_slice(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(io_err(&path)(e)),
        };
        debug!(path = %path.display(), count = items.len(), "json store loaded");

        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn all(&self) -> Vec<T> {
        self.items.lock().await.clone()
    }

    pub async fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.items.lock().await.iter().find(|item| pred(item)).cloned()
    }

    /// Lock the store and stage a copy of its contents for mutation.
    pub async fn begin(&self) -> StoreTxn<'_, T> {
        let guard = self.items.lock().await;
        let staged = guard.clone();
        StoreTxn {
            path: &self.path,
            guard,
            staged,
        }
    }
}

/// Staged changes to a [`JsonStore`]. Dropping without `commit` discards them.
pub struct StoreTxn<'a, T> {
    path: &'a Path,
    guard: MutexGuard<'a, Vec<T>>,
    staged: Vec<T>,
}

impl<T> StoreTxn<'_, T>
where
    T: Serialize,
{
    pub fn items(&self) -> &[T] {
        &self.staged
    }

    pub fn items_mut(&mut self) -> &mut Vec<T> {
        &mut self.staged
    }

    /// Write the staged list to disk, then publish it in memory.
    pub async fn commit(mut self) -> Result<(), StoreError> {
        if let Err(e) = persist(self.path, &self.staged).await {
            error!(error = %e, path = %self.path.display(), "persist failed");
            return Err(e);
        }
        *self.guard = std::mem::take(&mut self.staged);
        Ok(())
    }
}

async fn persist<T: Serialize>(path: &Path, items: &[T]) -> Result<(), StoreError> {
    let body = serde_json::to_vec_pretty(items)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, &body).await.map_err(io_err(&tmp))?;
    tokio::fs::rename(&tmp, path).await.map_err(io_err(path))?;
    debug!(path = %path.display(), count = items.len(), "json store persisted");
    Ok(())
}
