/// Core functionality modules
///
/// Contains the project index that combines discovery and the cache.

pub mod project_config;

pub use project_config::{validate_project_name, ProjectConfig};
