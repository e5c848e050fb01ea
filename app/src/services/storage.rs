use std::path::{Path, PathBuf};
use tracing::{error, info};

/// a key to store registry artifacts under the media root
///
/// this is primarily used to create banner file keys in the format:
///
/// `folder`/`filename`
#[derive(Clone)]
pub struct ArtifactKey {
    /// the "folder" a file using this key will be stored into
    ///
    /// in practice this determines the middle of the path
    pub folder: String,

    /// filename with extension, eg: `banner_AB3XY789_ABC1234.png`
    pub filename: String,
}

impl From<ArtifactKey> for String {
    fn from(v: ArtifactKey) -> Self {
        format!("{}/{}", v.folder, v.filename)
    }
}

/// Local filesystem storage for generated artifacts
///
/// keys are slash separated paths relative to the media root, the same
/// value stored on banner rows
#[derive(Clone)]
pub struct ArtifactStorage {
    media_root: PathBuf,
}

impl ArtifactStorage {
    pub fn new(media_root: PathBuf) -> Self {
        Self { media_root }
    }

    /// absolute filesystem path for a artifact key
    pub fn absolute_path(&self, key: &str) -> PathBuf {
        self.media_root.join(key)
    }

    pub async fn upload(&self, key: String, bytes: Vec<u8>) -> std::io::Result<()> {
        let path = self.absolute_path(&key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let result = tokio::fs::write(&path, bytes).await;

        if result.is_err() {
            error!("[STORAGE] failed to write artifact: {}", key);
        }

        result
    }

    /// deletes a artifact and prunes its directory when left empty
    ///
    /// deleting a key whose file no longer exists is a no-op
    pub async fn delete(&self, key: String) -> std::io::Result<()> {
        let path = self.absolute_path(&key);

        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        let result = tokio::fs::remove_file(&path).await;

        match &result {
            Ok(_) => {
                info!("[STORAGE] removed artifact: {}", key);
                self.remove_parent_if_empty(&path).await;
            }
            Err(_) => error!("[STORAGE] failed to delete artifact: {}", key),
        }

        result
    }

    /// removes the parent directory of a deleted artifact when it is
    /// empty, best effort, never the media root itself
    async fn remove_parent_if_empty(&self, path: &Path) {
        if let Some(dir) = path.parent() {
            if dir == self.media_root {
                return;
            }

            if let Ok(mut entries) = tokio::fs::read_dir(dir).await {
                if let Ok(None) = entries.next_entry().await {
                    if tokio::fs::remove_dir(dir).await.is_ok() {
                        info!("[STORAGE] removed empty directory: {}", dir.display());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_keys_join_folder_and_filename() {
        let key = ArtifactKey {
            folder: String::from("banners_identificacao/veiculo/taxi/AB3XY789"),
            filename: String::from("banner_AB3XY789_ABC1234.png"),
        };

        assert_eq!(
            String::from(key),
            "banners_identificacao/veiculo/taxi/AB3XY789/banner_AB3XY789_ABC1234.png"
        );
    }

    #[tokio::test]
    async fn upload_creates_missing_directories() {
        let root = tempfile::tempdir().unwrap();
        let storage = ArtifactStorage::new(root.path().to_path_buf());

        storage
            .upload(String::from("a/b/c/file.png"), vec![1, 2, 3])
            .await
            .unwrap();

        let written = std::fs::read(root.path().join("a/b/c/file.png")).unwrap();
        assert_eq!(written, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn delete_removes_file_and_prunes_empty_directory() {
        let root = tempfile::tempdir().unwrap();
        let storage = ArtifactStorage::new(root.path().to_path_buf());

        storage
            .upload(String::from("banners/taxi/X/file.png"), vec![0])
            .await
            .unwrap();

        storage.delete(String::from("banners/taxi/X/file.png")).await.unwrap();

        assert!(!root.path().join("banners/taxi/X/file.png").exists());
        // only the innermost directory is pruned
        assert!(!root.path().join("banners/taxi/X").exists());
        assert!(root.path().join("banners/taxi").exists());
    }

    #[tokio::test]
    async fn delete_keeps_directories_with_other_files() {
        let root = tempfile::tempdir().unwrap();
        let storage = ArtifactStorage::new(root.path().to_path_buf());

        storage.upload(String::from("x/one.png"), vec![0]).await.unwrap();
        storage.upload(String::from("x/two.png"), vec![0]).await.unwrap();

        storage.delete(String::from("x/one.png")).await.unwrap();

        assert!(root.path().join("x/two.png").exists());
        assert!(root.path().join("x").exists());
    }

    #[tokio::test]
    async fn deleting_missing_files_is_a_noop() {
        let root = tempfile::tempdir().unwrap();
        let storage = ArtifactStorage::new(root.path().to_path_buf());

        assert!(storage.delete(String::from("nope/file.png")).await.is_ok());
    }

    #[tokio::test]
    async fn the_media_root_is_never_pruned() {
        let root = tempfile::tempdir().unwrap();
        let storage = ArtifactStorage::new(root.path().to_path_buf());

        storage.upload(String::from("file.png"), vec![0]).await.unwrap();
        storage.delete(String::from("file.png")).await.unwrap();

        assert!(root.path().exists());
    }
}
