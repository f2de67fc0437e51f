//! pbl-projects library
//!
//! Discovers the learning projects in a workspace, derives a short
//! description for each, and keeps the result in a versioned JSON cache
//! that the rest of the workspace tooling reads through `ProjectConfig`.

pub mod config;
pub mod core;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod store;

// Re-exports for convenience
pub use config::WorkspaceLayout;
pub use crate::core::ProjectConfig;
pub use error::{Result, WorkspaceError};
pub use store::{ConfigSnapshot, ProjectRecord};
