//! # Image Storage
//!
//! Object bucket for menu photos.
//!
//! Keys look like `menu/<millis>-<suffix>.<ext>` and are public once written,
//! the storefront links them directly through the configured public URL.
//!
//! - `LocalImageStore` writes under a directory that the server also mounts at
//!   `/images`
//! - `MemoryImageStore` keeps everything in a map, used by the tests
use std::{
    collections::HashMap,
    path::{Component, Path, PathBuf},
    sync::RwLock,
};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::fs;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

#[async_trait]
pub trait ImageStore: Send + Sync + 'static {
    /// Writes the object, replacing whatever was stored under `key`.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StorageError>;
}

pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key);

        if key.is_empty()
            || !relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)))
        {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn put(&self, key: &str, data: Bytes, _content_type: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(&path, &data).await?;

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct StoredImage {
    pub data: Bytes,
    pub content_type: String,
}

#[derive(Default)]
pub struct MemoryImageStore {
    objects: RwLock<HashMap<String, StoredImage>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<StoredImage> {
        self.objects.read().ok()?.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|objects| objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StorageError> {
        let mut objects = self.objects.write().map_err(|_| StorageError::Poisoned)?;

        objects.insert(
            key.to_string(),
            StoredImage {
                data,
                content_type: content_type.to_string(),
            },
        );

        Ok(())
    }
}
