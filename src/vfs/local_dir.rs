use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, error, info};

use super::{validate_name, ProfileStorage, VfsError};

/// Profiles stored as files in one directory
#[derive(Debug, Clone)]
pub struct LocalDirStorage {
    root: PathBuf,
    /// Only files with this extension are listed
    extension: String,
}

impl LocalDirStorage {
    pub fn new<P: AsRef<Path>>(root: P, extension: &str) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, VfsError> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }
}

impl ProfileStorage for LocalDirStorage {
    async fn list_documents(&self) -> Result<Vec<String>, VfsError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                error!("Profile directory not found: {}", self.root.display());
                return Err(VfsError::ConfigError(format!(
                    "profile directory {} does not exist",
                    self.root.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(self.extension.as_str()) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        debug!("Listed {} profiles in {}", names.len(), self.root.display());
        Ok(names)
    }

    async fn read_document(&self, name: &str) -> Result<String, VfsError> {
        let path = self.path_for(name)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                info!("Read profile {} ({} bytes)", name, content.len());
                Ok(content)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                error!("Profile not found: {}", path.display());
                Err(VfsError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write_document(&self, name: &str, content: &str) -> Result<(), VfsError> {
        let path = self.path_for(name)?;
        tokio::fs::write(&path, content).await.map_err(|e| {
            error!("Failed to write profile {}: {}", path.display(), e);
            VfsError::from(e)
        })?;
        info!("Wrote profile {} ({} bytes)", name, content.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn test_list_read_write() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.ini"), "[custom]").unwrap();
        std::fs::write(dir.path().join("a.ini"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("sub.ini")).unwrap();

        let storage = LocalDirStorage::new(dir.path(), "ini");
        runtime().block_on(async {
            assert_eq!(storage.list_documents().await.unwrap(), vec!["a.ini", "b.ini"]);
            assert_eq!(storage.read_document("b.ini").await.unwrap(), "[custom]");

            storage.write_document("a.ini", "a=1").await.unwrap();
            assert_eq!(storage.read_document("a.ini").await.unwrap(), "a=1");
        });
    }

    #[test]
    fn test_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalDirStorage::new(dir.path(), ".ini");
        runtime().block_on(async {
            assert!(matches!(
                storage.read_document("missing.ini").await,
                Err(VfsError::NotFound(_))
            ));
        });
    }

    #[test]
    fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalDirStorage::new(dir.path(), "ini");
        runtime().block_on(async {
            assert!(matches!(
                storage.read_document("../secret.ini").await,
                Err(VfsError::InvalidName(_))
            ));
            assert!(matches!(
                storage.write_document("..", "x").await,
                Err(VfsError::InvalidName(_))
            ));
        });
    }

    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalDirStorage::new(dir.path().join("nope"), "ini");
        runtime().block_on(async {
            assert!(matches!(
                storage.list_documents().await,
                Err(VfsError::ConfigError(_))
            ));
        });
    }
}
