use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use log::debug;

use crate::error::{SvbinError, SvbinResult};

// ---------------------------------------------------------------------------
// StorageBackend trait
// ---------------------------------------------------------------------------

/// Async byte storage that record files are loaded from and saved to.
///
/// Implementations can target the local filesystem or anything the
/// `object_store` crate reaches (S3, GCS, Azure, in-memory).
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Fetch the contents at `path`, or `Ok(None)` when the key does not exist.
    async fn get(&self, path: &str) -> SvbinResult<Option<Bytes>>;

    /// Store `data` at `path`, replacing any previous contents.
    async fn put(&self, path: &str, data: Bytes) -> SvbinResult<()>;

    /// List entries under `prefix`.
    async fn list(&self, prefix: &str) -> SvbinResult<Vec<String>>;

    /// Join a base path with a relative segment.
    fn join(&self, base: &str, segment: &str) -> String;
}

// ---------------------------------------------------------------------------
// LocalBackend  (tokio::fs)
// ---------------------------------------------------------------------------

/// Local-filesystem backend using `tokio::fs`.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    /// Create a new backend rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

#[async_trait]
impl StorageBackend for LocalBackend {
    async fn get(&self, path: &str) -> SvbinResult<Option<Bytes>> {
        let full = self.resolve(path);
        match tokio::fs::read(&full).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SvbinError::Storage(format!(
                "Failed to read {}: {e}",
                full.display()
            ))),
        }
    }

    async fn put(&self, path: &str, data: Bytes) -> SvbinResult<()> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                SvbinError::Storage(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
        tokio::fs::write(&full, &data).await.map_err(|e| {
            SvbinError::Storage(format!("Failed to write {}: {e}", full.display()))
        })?;
        debug!("wrote {} bytes to {}", data.len(), full.display());
        Ok(())
    }

    async fn list(&self, prefix: &str) -> SvbinResult<Vec<String>> {
        let dir = self.resolve(prefix);
        let mut entries = Vec::new();
        let mut reader = tokio::fs::read_dir(&dir).await.map_err(|e| {
            SvbinError::Storage(format!("Failed to list {}: {e}", dir.display()))
        })?;
        while let Some(entry) = reader.next_entry().await.map_err(|e| {
            SvbinError::Storage(format!("Failed to read entry in {}: {e}", dir.display()))
        })? {
            if let Some(name) = entry.file_name().to_str() {
                entries.push(name.to_string());
            }
        }
        entries.sort();
        Ok(entries)
    }

    fn join(&self, base: &str, segment: &str) -> String {
        Path::new(base).join(segment).to_string_lossy().into_owned()
    }
}

// ---------------------------------------------------------------------------
// ObjectStoreBackend  (wraps object_store crate)
// ---------------------------------------------------------------------------

/// Backend that wraps any [`object_store::ObjectStore`] implementation.
pub struct ObjectStoreBackend {
    store: Box<dyn object_store::ObjectStore>,
    prefix: String,
}

impl ObjectStoreBackend {
    pub fn new(store: Box<dyn object_store::ObjectStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    fn full_path(&self, path: &str) -> object_store::path::Path {
        if self.prefix.is_empty() {
            object_store::path::Path::from(path)
        } else {
            object_store::path::Path::from(format!("{}/{}", self.prefix, path))
        }
    }
}

#[async_trait]
impl StorageBackend for ObjectStoreBackend {
    async fn get(&self, path: &str) -> SvbinResult<Option<Bytes>> {
        let location = self.full_path(path);
        match self
            .store
            .get_opts(&location, object_store::GetOptions::default())
            .await
        {
            Ok(result) => {
                let data = result.bytes().await.map_err(|e| {
                    SvbinError::Storage(format!("Failed to read bytes from {path}: {e}"))
                })?;
                Ok(Some(data))
            }
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(SvbinError::Storage(format!(
                "Object store error for {path}: {e}"
            ))),
        }
    }

    async fn put(&self, path: &str, data: Bytes) -> SvbinResult<()> {
        let location = self.full_path(path);
        self.store
            .put_opts(
                &location,
                object_store::PutPayload::from(data),
                object_store::PutOptions::default(),
            )
            .await
            .map_err(|e| SvbinError::Storage(format!("Object store put failed for {path}: {e}")))?;
        Ok(())
    }

    async fn list(&self, prefix: &str) -> SvbinResult<Vec<String>> {
        use futures::TryStreamExt;
        let location = self.full_path(prefix);
        let mut entries = Vec::new();
        let mut stream = self.store.list(Some(&location));
        while let Some(meta) = stream.try_next().await.map_err(|e| {
            SvbinError::Storage(format!("Object store list error for {prefix}: {e}"))
        })? {
            entries.push(meta.location.to_string());
        }
        entries.sort();
        Ok(entries)
    }

    fn join(&self, base: &str, segment: &str) -> String {
        if base.is_empty() {
            segment.to_string()
        } else {
            format!("{base}/{segment}")
        }
    }
}
