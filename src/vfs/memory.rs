use std::collections::BTreeMap;
use std::io;

use tokio::sync::RwLock;

use super::{validate_name, ProfileStorage, VfsError};

/// In-memory profile storage, for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: RwLock<BTreeMap<String, String>>,
    read_only: RwLock<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-filled with documents
    pub fn with_documents<I, K, V>(documents: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let documents = documents
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            documents: RwLock::new(documents),
            read_only: RwLock::new(false),
        }
    }

    /// Make every write fail with an I/O error
    pub async fn set_read_only(&self, read_only: bool) {
        *self.read_only.write().await = read_only;
    }

    /// Current content of a document, bypassing the gateway
    pub async fn snapshot(&self, name: &str) -> Option<String> {
        self.documents.read().await.get(name).cloned()
    }
}

impl ProfileStorage for MemoryStorage {
    async fn list_documents(&self) -> Result<Vec<String>, VfsError> {
        Ok(self.documents.read().await.keys().cloned().collect())
    }

    async fn read_document(&self, name: &str) -> Result<String, VfsError> {
        self.documents
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| VfsError::NotFound(name.to_string()))
    }

    async fn write_document(&self, name: &str, content: &str) -> Result<(), VfsError> {
        validate_name(name)?;
        if *self.read_only.read().await {
            return Err(VfsError::IoError(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "storage is read-only",
            )));
        }
        self.documents
            .write()
            .await
            .insert(name.to_string(), content.to_string());
        Ok(())
    }
}
