pub mod local_dir;
pub mod memory;

use std::future::Future;

use thiserror::Error;

pub use local_dir::LocalDirStorage;
pub use memory::MemoryStorage;

#[derive(Error, Debug)]
pub enum VfsError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid document name: {0}")]
    InvalidName(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway to wherever profile documents are kept
///
/// Documents are addressed by bare file name. Implementations decide which
/// names are listed and how missing documents are reported, but must use
/// [`VfsError::NotFound`] for the latter.
pub trait ProfileStorage {
    fn list_documents(&self) -> impl Future<Output = Result<Vec<String>, VfsError>>;
    fn read_document(&self, name: &str) -> impl Future<Output = Result<String, VfsError>>;
    fn write_document(
        &self,
        name: &str,
        content: &str,
    ) -> impl Future<Output = Result<(), VfsError>>;
}

/// Reject names that would escape the storage root
pub(crate) fn validate_name(name: &str) -> Result<(), VfsError> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
    {
        return Err(VfsError::InvalidName(name.to_string()));
    }
    Ok(())
}
