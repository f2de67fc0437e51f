/// Workspace layout and root resolution
///
/// Holds every fixed file and directory name the discovery pass looks for,
/// and resolves the workspace root once at the outermost entry point.

use crate::error::{Result, WorkspaceError};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable consulted when no explicit root is given
pub const WORKSPACE_ENV_VAR: &str = "PBL_WORKSPACE";

/// Names that make up a learning-project workspace
#[derive(Debug, Clone)]
pub struct WorkspaceLayout {
    root: PathBuf,
    pub projects_dir_name: String,
    pub tools_dir_name: String,
    pub cache_file_name: String,
    pub entry_file: String,
    pub manifest_file: String,
    pub environment_dir: String,
    pub package_file: String,
    /// Tried in order; the first one that yields a line wins
    pub readme_names: Vec<String>,
    /// Case-sensitive; one of these must appear on an output line
    pub trigger_keywords: Vec<String>,
}

impl WorkspaceLayout {
    /// Create a layout with the default names rooted at `root`
    ///
    /// Relative roots are made absolute against the current directory. The
    /// root does not have to exist yet.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = std::path::absolute(root.as_ref())?;

        Ok(Self {
            root,
            projects_dir_name: "projects".to_string(),
            tools_dir_name: "tools".to_string(),
            cache_file_name: "project_config.json".to_string(),
            entry_file: "main.py".to_string(),
            manifest_file: "requirements.txt".to_string(),
            environment_dir: "venv".to_string(),
            package_file: "pyproject.toml".to_string(),
            readme_names: ["README.md", "README.txt", "readme.md", "readme.txt"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            trigger_keywords: vec!["Learning".to_string(), "Project".to_string()],
        })
    }

    pub fn workspace_root(&self) -> &Path {
        &self.root
    }

    /// Directory whose children are scanned for projects
    pub fn projects_dir(&self) -> PathBuf {
        self.root.join(&self.projects_dir_name)
    }

    /// Location of the persisted snapshot
    pub fn cache_path(&self) -> PathBuf {
        self.root.join(&self.tools_dir_name).join(&self.cache_file_name)
    }

    /// Directory a project called `name` would live in
    pub fn project_dir(&self, name: &str) -> PathBuf {
        self.projects_dir().join(name)
    }
}

/// Resolve the workspace root based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. PBL_WORKSPACE environment variable (with tilde expansion)
/// 3. Current working directory
pub fn resolve_workspace_root(explicit: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return expand_tilde(path);
    }

    if let Ok(env_path) = env::var(WORKSPACE_ENV_VAR) {
        if !env_path.trim().is_empty() {
            return expand_tilde(env_path.trim());
        }
    }

    Ok(env::current_dir()?)
}

/// Expand a leading `~/` to the user's home directory
fn expand_tilde(path: &str) -> Result<PathBuf> {
    if path == "~" || path.starts_with("~/") {
        let home = dirs::home_dir().ok_or_else(|| {
            WorkspaceError::Config("Could not determine home directory".to_string())
        })?;
        let rest = path.trim_start_matches('~').trim_start_matches('/');
        return Ok(if rest.is_empty() { home } else { home.join(rest) });
    }
    Ok(PathBuf::from(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_layout_paths() {
        let temp = TempDir::new().unwrap();
        let layout = WorkspaceLayout::new(temp.path()).unwrap();

        assert_eq!(layout.workspace_root(), temp.path());
        assert_eq!(layout.projects_dir(), temp.path().join("projects"));
        assert_eq!(
            layout.cache_path(),
            temp.path().join("tools").join("project_config.json")
        );
        assert_eq!(
            layout.project_dir("01-file-organizer"),
            temp.path().join("projects").join("01-file-organizer")
        );
    }

    #[test]
    fn test_relative_root_made_absolute() {
        let layout = WorkspaceLayout::new("some/relative/root").unwrap();
        assert!(layout.workspace_root().is_absolute());
        assert!(layout.workspace_root().ends_with("some/relative/root"));
    }

    #[test]
    fn test_explicit_root_wins() {
        let root = resolve_workspace_root(Some("/srv/pbl")).unwrap();
        assert_eq!(root, PathBuf::from("/srv/pbl"));
    }

    #[test]
    fn test_expand_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/pbl").unwrap(), home.join("pbl"));
            assert_eq!(expand_tilde("~").unwrap(), home);
        }
        assert_eq!(expand_tilde("/abs/path").unwrap(), PathBuf::from("/abs/path"));
    }
}
