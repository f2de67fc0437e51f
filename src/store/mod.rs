/// Persistence for discovered projects
///
/// Snapshots are stored as a single pretty-printed JSON file under the
/// workspace's tooling directory.

pub mod cache;
pub mod models;

pub use cache::ConfigStore;
pub use models::*;
