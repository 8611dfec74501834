use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

/// Where uploaded attachments live. Keys are flat object names.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Writes the object, replacing any previous one under the same key, and returns
    /// the path recorded alongside it.
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<String>;
    async fn delete_object(&self, key: &str) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct LocalDiskStorage {
    root: PathBuf,
}

impl LocalDiskStorage {
    pub async fn new(root: impl AsRef<Path>) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("create upload dir {}", root.display()))?;
        Ok(Self { root })
    }

    fn object_path(&self, key: &str) -> anyhow::Result<PathBuf> {
        anyhow::ensure!(
            !key.is_empty() && !key.contains(['/', '\\']) && key != "." && key != "..",
            "invalid object key {key:?}"
        );
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ContentStore for LocalDiskStorage {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<String> {
        let path = self.object_path(key)?;
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        debug!(key, content_type, bytes = body.len(), "object stored");
        Ok(path.to_string_lossy().into_owned())
    }

    async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        let path = self.object_path(key)?;
        tokio::fs::remove_file(&path)
            .await
            .with_context(|| format!("remove {}", path.display()))?;
        debug!(key, "object deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDiskStorage::new(dir.path().join("uploads")).await.unwrap();

        let path = store
            .put_object("1700000000000-cv.pdf", Bytes::from_static(b"%PDF-1.7"), "application/pdf")
            .await
            .unwrap();
        assert!(path.ends_with("uploads/1700000000000-cv.pdf"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"%PDF-1.7");

        store.delete_object("1700000000000-cv.pdf").await.unwrap();
        assert!(!Path::new(&path).exists());
    }

    #[tokio::test]
    async fn same_key_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDiskStorage::new(dir.path()).await.unwrap();
        store.put_object("k.pdf", Bytes::from_static(b"one"), "application/pdf").await.unwrap();
        let path = store
            .put_object("k.pdf", Bytes::from_static(b"two"), "application/pdf")
            .await
            .unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"two");
    }

    #[tokio::test]
    async fn keys_cannot_escape_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDiskStorage::new(dir.path()).await.unwrap();
        for key in ["../evil.pdf", "a/b.pdf", "..", ""] {
            assert!(store.put_object(key, Bytes::new(), "application/pdf").await.is_err());
        }
    }
}
