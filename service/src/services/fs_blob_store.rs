// darkroom_service/src/services/fs_blob_store.rs

use anyhow::{bail, Context};
use async_trait::async_trait;
use darkroom::services::BlobStore;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, instrument};

/// Stores blobs as files under a root directory. The storage key is the
/// relative path.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
  root: PathBuf,
}

impl FsBlobStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  fn resolve(&self, path: &str) -> anyhow::Result<PathBuf> {
    let relative = Path::new(path);
    if relative
      .components()
      .any(|c| !matches!(c, Component::Normal(_)))
    {
      bail!("refusing to store blob outside the root: {path}");
    }
    Ok(self.root.join(relative))
  }
}

#[async_trait]
impl BlobStore for FsBlobStore {
  #[instrument(name = "FsBlobStore::put", skip(self, bytes), fields(size = bytes.len()))]
  async fn put(&self, bytes: Vec<u8>, path: &str) -> anyhow::Result<String> {
    let target = self.resolve(path)?;
    if let Some(parent) = target.parent() {
      tokio::fs::create_dir_all(parent)
        .await
        .with_context(|| format!("creating {}", parent.display()))?;
    }
    tokio::fs::write(&target, &bytes)
      .await
      .with_context(|| format!("writing {}", target.display()))?;
    debug!(target = %target.display(), "Blob written.");
    Ok(path.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn writes_under_root_and_rejects_escapes() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let store = FsBlobStore::new(root);

    let key = store.put(b"pixels".to_vec(), "orders/DR-1/001-a.jpg").await.unwrap();
    assert_eq!(key, "orders/DR-1/001-a.jpg");
    assert_eq!(tokio::fs::read(root.join(&key)).await.unwrap(), b"pixels");

    assert!(store.put(b"x".to_vec(), "../escape.jpg").await.is_err());
    assert!(store.put(b"x".to_vec(), "/etc/passwd").await.is_err());
  }
}
