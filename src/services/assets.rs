/// Image asset lifecycle
///
/// Release is best-effort and idempotent: a missing file is success, and any
/// other I/O failure is logged and swallowed. By the time an asset is
/// released the owning mutation has already committed, so a cleanup failure
/// must never surface to the caller.
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Delete the stored file behind an image reference, best effort
    async fn release(&self, reference: &str);
}

/// Filesystem-backed asset store. References are store-relative paths
/// (`images/duck.jpg`) resolved against the configured root.
pub struct LocalAssetStore {
    root: PathBuf,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// Reject references that would escape the asset root
fn relative_path(reference: &str) -> Option<PathBuf> {
    let path = Path::new(reference);
    if path.is_absolute() {
        return None;
    }
    if path
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return None;
    }
    Some(path.to_path_buf())
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn release(&self, reference: &str) {
        let Some(relative) = relative_path(reference) else {
            tracing::warn!(%reference, "refusing to release asset outside the store root");
            return;
        };

        let path = self.root.join(relative);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "released image asset"),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(path = %path.display(), "failed to release image asset: {}", err)
            }
        }
    }
}
