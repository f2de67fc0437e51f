/// Error types for pbl-projects
///
/// Every fallible operation in the crate reports through `WorkspaceError`.
/// Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Main error type for project discovery and cache operations
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// I/O errors (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Project name is empty, `.`/`..`, or contains a path separator
    #[error("Invalid project name: {0}")]
    InvalidProjectName(String),

    /// Cache was written by an incompatible format version
    #[error("Unsupported cache version {found} (expected {expected})")]
    CacheVersion { found: String, expected: String },

    /// Cache describes a different workspace than the one being queried
    #[error("Cache belongs to workspace {cached}, not {current}")]
    CacheWorkspaceMismatch { cached: String, current: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for pbl-projects operations
pub type Result<T> = std::result::Result<T, WorkspaceError>;

impl WorkspaceError {
    /// Convert the error into a message suitable for the terminal
    pub fn user_message(&self) -> String {
        match self {
            WorkspaceError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            WorkspaceError::Serialization(e) => {
                format!("Project cache is not valid JSON. Details: {}", e)
            }
            WorkspaceError::InvalidProjectName(name) => {
                format!(
                    "'{}' is not a valid project name (it must be a single directory name)",
                    name
                )
            }
            WorkspaceError::CacheVersion { found, .. } => {
                format!("Project cache uses format {}; it will be rebuilt", found)
            }
            WorkspaceError::CacheWorkspaceMismatch { cached, .. } => {
                format!("Project cache was built for {}; it will be rebuilt", cached)
            }
            WorkspaceError::Config(msg) => format!("Configuration issue: {}", msg),
        }
    }

    /// True when the error means the cache should be ignored and rebuilt
    pub fn is_stale_cache(&self) -> bool {
        matches!(
            self,
            WorkspaceError::Serialization(_)
                | WorkspaceError::CacheVersion { .. }
                | WorkspaceError::CacheWorkspaceMismatch { .. }
        )
    }
}
