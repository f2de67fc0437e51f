/// Project discovery
///
/// Scans the immediate children of the workspace's projects directory and
/// builds a record for every one that looks like a project.

use crate::config::WorkspaceLayout;
use crate::discovery::DescriptionExtractor;
use crate::store::ProjectRecord;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// Walks a workspace's projects directory
pub struct Discoverer {
    layout: WorkspaceLayout,
    extractor: DescriptionExtractor,
}

impl Discoverer {
    pub fn new(layout: &WorkspaceLayout) -> Self {
        Self {
            layout: layout.clone(),
            extractor: DescriptionExtractor::new(layout),
        }
    }

    /// Build a fresh record list from the filesystem
    ///
    /// Records come back sorted by directory name. Hidden directories and
    /// directories with neither an entry file nor a manifest are skipped.
    /// A missing projects directory gives an empty list.
    pub fn discover(&self) -> Vec<ProjectRecord> {
        let projects_dir = self.layout.projects_dir();

        let entries = match fs::read_dir(&projects_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %projects_dir.display(), "no projects directory");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %projects_dir.display(), "Could not read projects directory: {}", e);
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| match entry.file_name().into_string() {
                Ok(name) => Some(name),
                Err(raw) => {
                    // The JSON cache can only hold UTF-8 names
                    warn!(
                        path = %entry.path().display(),
                        "Skipping directory with non-UTF-8 name {:?}",
                        raw
                    );
                    None
                }
            })
            .filter(|name| !name.starts_with('.'))
            .collect();
        names.sort();

        names
            .into_iter()
            .filter_map(|name| self.inspect(&projects_dir, name))
            .collect()
    }

    /// Check one directory; `None` if it isn't a project
    fn inspect(&self, projects_dir: &Path, name: String) -> Option<ProjectRecord> {
        let dir = projects_dir.join(&name);

        let has_entry_file = dir.join(&self.layout.entry_file).exists();
        let has_manifest = dir.join(&self.layout.manifest_file).exists();
        if !has_entry_file && !has_manifest {
            debug!(project = %name, "skipping directory without entry file or manifest");
            return None;
        }

        let relative_path = self
            .layout
            .projects_dir()
            .strip_prefix(self.layout.workspace_root())
            .map(|rel| rel.join(&name))
            .unwrap_or_else(|_| dir.clone());

        Some(ProjectRecord {
            relative_path,
            has_entry_file,
            has_manifest,
            has_environment: dir.join(&self.layout.environment_dir).exists(),
            has_package_config: dir.join(&self.layout.package_file).exists(),
            description: self.extractor.extract(&dir),
            absolute_path: dir,
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn discoverer(temp: &TempDir) -> Discoverer {
        Discoverer::new(&WorkspaceLayout::new(temp.path()).unwrap())
    }

    fn make_project(temp: &TempDir, name: &str, files: &[&str]) -> PathBuf {
        let dir = temp.path().join("projects").join(name);
        fs::create_dir_all(&dir).unwrap();
        for file in files {
            fs::write(dir.join(file), "").unwrap();
        }
        dir
    }

    #[test]
    fn test_missing_projects_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(discoverer(&temp).discover().is_empty());
    }

    #[test]
    fn test_qualifying_directories_sorted() {
        let temp = TempDir::new().unwrap();
        make_project(&temp, "03-expense-tracker", &["main.py"]);
        make_project(&temp, "01-file-organizer", &["requirements.txt"]);
        make_project(&temp, "02-password-generator", &["main.py", "requirements.txt"]);

        let names: Vec<String> = discoverer(&temp)
            .discover()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(
            names,
            vec!["01-file-organizer", "02-password-generator", "03-expense-tracker"]
        );
    }

    #[test]
    fn test_skips_hidden_and_non_projects() {
        let temp = TempDir::new().unwrap();
        make_project(&temp, ".cache", &["main.py"]);
        make_project(&temp, "docs", &["notes.md"]);
        make_project(&temp, "real", &["main.py"]);
        fs::write(temp.path().join("projects").join("stray.py"), "").unwrap();

        let projects = discoverer(&temp).discover();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "real");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_directory_skipped_without_losing_others() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().unwrap();
        make_project(&temp, "good", &["main.py"]);
        let raw_dir = temp
            .path()
            .join("projects")
            .join(OsStr::from_bytes(b"bad-\xff-name"));
        if fs::create_dir(&raw_dir).is_err() {
            // Some filesystems refuse non-UTF-8 names outright
            return;
        }
        fs::write(raw_dir.join("main.py"), "").unwrap();

        let names: Vec<String> = discoverer(&temp)
            .discover()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["good"]);
    }

    #[test]
    fn test_flags_match_filesystem() {
        let temp = TempDir::new().unwrap();
        let dir = make_project(&temp, "06-task-scheduler", &["main.py", "pyproject.toml"]);
        fs::create_dir(dir.join("venv")).unwrap();

        let projects = discoverer(&temp).discover();
        let project = &projects[0];

        assert!(project.has_entry_file);
        assert!(!project.has_manifest);
        assert!(project.has_environment);
        assert!(project.has_package_config);
        assert_eq!(
            project.relative_path,
            PathBuf::from("projects").join("06-task-scheduler")
        );
        assert_eq!(project.absolute_path, dir);
    }

    #[test]
    fn test_description_attached() {
        let temp = TempDir::new().unwrap();
        let dir = make_project(&temp, "05-api-client", &[]);
        fs::write(dir.join("main.py"), "print(\"API Client Learning Project\")\n").unwrap();

        let projects = discoverer(&temp).discover();
        assert_eq!(
            projects[0].description.as_deref(),
            Some("API Client Learning Project")
        );
    }
}
