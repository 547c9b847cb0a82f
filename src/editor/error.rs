use thiserror::Error;

/// Reasons a structural edit is rejected
///
/// A rejected edit leaves the store exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Group name \"{0}\" already exists")]
    NameCollision(String),

    #[error("Circular group reference: {}", .path.join(" -> "))]
    CycleDetected { path: Vec<String> },

    #[error("No group named \"{0}\"")]
    GroupNotFound(String),

    #[error("Document cannot be parsed into sections")]
    MalformedDocument,
}
