// The project index that every other tool goes through
//
// Reads trust the cache unless asked to refresh. Mutations only ever touch
// the cache file, never a project directory.

use crate::config::WorkspaceLayout;
use crate::discovery::Discoverer;
use crate::error::{Result, WorkspaceError};
use crate::store::{ConfigSnapshot, ConfigStore, ProjectRecord};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

pub struct ProjectConfig {
    layout: WorkspaceLayout,
    discoverer: Discoverer,
    store: ConfigStore,
}

impl ProjectConfig {
    /// Open the index for the workspace at `workspace_root` with the default
    /// layout
    pub fn new<P: AsRef<Path>>(workspace_root: P) -> Result<Self> {
        Ok(Self::with_layout(WorkspaceLayout::new(workspace_root)?))
    }

    pub fn with_layout(layout: WorkspaceLayout) -> Self {
        let store = ConfigStore::new(layout.cache_path(), layout.workspace_root().to_path_buf());
        Self {
            discoverer: Discoverer::new(&layout),
            store,
            layout,
        }
    }

    pub fn layout(&self) -> &WorkspaceLayout {
        &self.layout
    }

    pub fn workspace_root(&self) -> &Path {
        self.layout.workspace_root()
    }

    pub fn cache_path(&self) -> &Path {
        self.store.path()
    }

    /// Run discovery without touching the cache
    pub fn discover(&self) -> Vec<ProjectRecord> {
        self.discoverer.discover()
    }

    /// All projects, from the cache unless `refresh` is set or there is no
    /// cache yet
    ///
    /// A cached read is not checked against the filesystem. If the cache
    /// can't be used, a fresh discovery result is returned instead (without
    /// rewriting the cache).
    pub fn get_projects(&self, refresh: bool) -> Result<Vec<ProjectRecord>> {
        if refresh || !self.store.exists() {
            return self.rediscover_and_save();
        }
        Ok(self.cached_projects())
    }

    /// Shorthand for `get_projects(true)`
    pub fn refresh(&self) -> Result<Vec<ProjectRecord>> {
        self.get_projects(true)
    }

    pub fn get_names(&self, refresh: bool) -> Result<Vec<String>> {
        Ok(self
            .get_projects(refresh)?
            .into_iter()
            .map(|project| project.name)
            .collect())
    }

    /// Paths relative to the workspace root
    pub fn get_paths(&self, refresh: bool) -> Result<Vec<PathBuf>> {
        Ok(self
            .get_projects(refresh)?
            .into_iter()
            .map(|project| project.relative_path)
            .collect())
    }

    pub fn get_full_paths(&self, refresh: bool) -> Result<Vec<PathBuf>> {
        Ok(self
            .get_projects(refresh)?
            .into_iter()
            .map(|project| project.absolute_path)
            .collect())
    }

    /// Register an existing project directory by rebuilding the cache
    ///
    /// Returns `Ok(false)` when the name is invalid, the directory does not
    /// exist, or the directory doesn't qualify as a project. The directory is
    /// never created here.
    pub fn add_project(&self, name: &str) -> Result<bool> {
        if let Err(e) = validate_project_name(name) {
            warn!("{}", e.user_message());
            return Ok(false);
        }

        let project_dir = self.layout.project_dir(name);
        if !project_dir.is_dir() {
            warn!(project = name, "Project directory {} does not exist", project_dir.display());
            return Ok(false);
        }

        let projects = self.rediscover_and_save()?;
        Ok(projects.iter().any(|project| project.name == name))
    }

    /// Drop a project from the cache; its directory is left alone
    ///
    /// Returns whether a record was actually removed. The next refresh will
    /// bring it back if the directory still qualifies.
    pub fn remove_project(&self, name: &str) -> Result<bool> {
        let mut projects = self.cached_projects();
        let original_count = projects.len();
        projects.retain(|project| project.name != name);

        if projects.len() < original_count {
            self.save(projects)?;
            Ok(true)
        } else {
            debug!(project = name, "nothing to remove");
            Ok(false)
        }
    }

    pub fn get_project_info(&self, name: &str) -> Result<Option<ProjectRecord>> {
        Ok(self
            .get_projects(false)?
            .into_iter()
            .find(|project| project.name == name))
    }

    fn rediscover_and_save(&self) -> Result<Vec<ProjectRecord>> {
        let projects = self.discoverer.discover();
        self.save(projects.clone())?;
        Ok(projects)
    }

    /// Cached list, falling back to discovery when the cache is missing or
    /// unusable
    fn cached_projects(&self) -> Vec<ProjectRecord> {
        if !self.store.exists() {
            return self.discoverer.discover();
        }
        match self.store.load() {
            Some(snapshot) => snapshot.projects,
            None => self.discoverer.discover(),
        }
    }

    fn save(&self, projects: Vec<ProjectRecord>) -> Result<()> {
        let snapshot = ConfigSnapshot::new(self.workspace_root().to_path_buf(), projects);
        self.store.save(&snapshot)
    }
}

/// A project name must be exactly one plain path component, so it can never
/// point outside the projects directory
pub fn validate_project_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    let valid = single_normal && !name.contains('/') && !name.contains('\\');

    if valid {
        Ok(())
    } else {
        Err(WorkspaceError::InvalidProjectName(name.to_string()))
    }
}
