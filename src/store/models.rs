/// Data models for the project cache
///
/// Field names on disk follow the existing `project_config.json` format so
/// caches written by earlier tooling stay readable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// Format tag written into every snapshot
pub const CACHE_VERSION: &str = "1.0";

/// One discovered project directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Directory base name, unique within a snapshot
    pub name: String,
    /// Path relative to the workspace root, e.g. `projects/01-file-organizer`
    #[serde(rename = "path")]
    pub relative_path: PathBuf,
    #[serde(rename = "full_path")]
    pub absolute_path: PathBuf,
    #[serde(rename = "has_main", default)]
    pub has_entry_file: bool,
    #[serde(rename = "has_requirements", default)]
    pub has_manifest: bool,
    #[serde(rename = "has_venv", default)]
    pub has_environment: bool,
    #[serde(rename = "has_pyproject", default)]
    pub has_package_config: bool,
    /// Advisory summary pulled from source comments or a README
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProjectRecord {
    /// Short markers for the flags that are set, in a fixed order
    pub fn status_labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.has_entry_file {
            labels.push("entry");
        }
        if self.has_manifest {
            labels.push("deps");
        }
        if self.has_environment {
            labels.push("env");
        }
        if self.has_package_config {
            labels.push("pkg");
        }
        labels
    }
}

/// The persisted unit: every record from one discovery pass plus metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub version: String,
    pub workspace_root: PathBuf,
    pub projects: Vec<ProjectRecord>,
    /// Written as RFC 3339; older caches stored epoch seconds
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub last_updated: DateTime<Utc>,
}

impl ConfigSnapshot {
    /// Build a snapshot stamped with the current time
    pub fn new(workspace_root: PathBuf, projects: Vec<ProjectRecord>) -> Self {
        Self {
            version: CACHE_VERSION.to_string(),
            workspace_root,
            projects,
            last_updated: Utc::now(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Seconds(f64),
}

/// Accept an RFC 3339 string, or epoch seconds as a number or a string
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let parsed = match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Text(text) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| parse_epoch_text(text.trim())),
        RawTimestamp::Seconds(secs) => from_epoch_float(secs),
    };

    parsed.ok_or_else(|| D::Error::custom("last_updated is neither RFC 3339 nor epoch seconds"))
}

/// `"1727000000.123"`, parsed digit by digit so no precision is lost
fn parse_epoch_text(text: &str) -> Option<DateTime<Utc>> {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let secs: i64 = whole.parse().ok()?;
    let mut digits: String = fraction.chars().take(9).collect();
    while digits.len() < 9 {
        digits.push('0');
    }
    let nanos: u32 = digits.parse().ok()?;
    DateTime::from_timestamp(secs, nanos)
}

// Microsecond resolution is all an f64 epoch reliably carries
fn from_epoch_float(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    let whole = secs.floor();
    let micros = ((secs - whole) * 1e6).round().min(999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, micros * 1_000)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> ProjectRecord {
        ProjectRecord {
            name: name.to_string(),
            relative_path: PathBuf::from("projects").join(name),
            absolute_path: PathBuf::from("/ws/projects").join(name),
            has_entry_file: true,
            has_manifest: false,
            has_environment: true,
            has_package_config: false,
            description: None,
        }
    }

    #[test]
    fn test_record_uses_cache_field_names() {
        let json = serde_json::to_value(record("03-expense-tracker")).unwrap();

        assert_eq!(json["path"], "projects/03-expense-tracker");
        assert_eq!(json["full_path"], "/ws/projects/03-expense-tracker");
        assert_eq!(json["has_main"], true);
        assert_eq!(json["has_requirements"], false);
        assert_eq!(json["has_venv"], true);
        assert_eq!(json["has_pyproject"], false);
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_record_reads_legacy_entry_without_flags() {
        let legacy = r#"{"name": "x", "path": "projects/x", "full_path": "/ws/projects/x"}"#;
        let parsed: ProjectRecord = serde_json::from_str(legacy).unwrap();

        assert_eq!(parsed.name, "x");
        assert!(!parsed.has_entry_file);
        assert!(parsed.description.is_none());
    }

    #[test]
    fn test_status_labels() {
        let rec = record("a");
        assert_eq!(rec.status_labels(), vec!["entry", "env"]);

        let bare = ProjectRecord {
            has_entry_file: false,
            has_environment: false,
            ..rec
        };
        assert!(bare.status_labels().is_empty());
    }

    #[test]
    fn test_snapshot_reads_legacy_cache() {
        let legacy = r#"{
  "version": "1.0",
  "workspace_root": "/ws",
  "projects": [
    {
      "name": "01-file-organizer",
      "path": "projects/01-file-organizer",
      "full_path": "/ws/projects/01-file-organizer",
      "has_main": true,
      "has_requirements": true,
      "has_venv": false,
      "has_pyproject": false,
      "description": "File Organizer Learning Project"
    }
  ],
  "last_updated": "1727000000.123"
}"#;
        let snapshot: ConfigSnapshot = serde_json::from_str(legacy).unwrap();

        assert_eq!(snapshot.projects.len(), 1);
        assert!(snapshot.projects[0].has_manifest);
        assert_eq!(snapshot.last_updated.timestamp(), 1_727_000_000);
        assert_eq!(snapshot.last_updated.timestamp_subsec_millis(), 123);
    }

    #[test]
    fn test_timestamp_accepts_number_and_rfc3339() {
        let numeric = r#"{"version": "1.0", "workspace_root": "/ws", "projects": [], "last_updated": 1727000000}"#;
        let snapshot: ConfigSnapshot = serde_json::from_str(numeric).unwrap();
        assert_eq!(snapshot.last_updated.timestamp(), 1_727_000_000);

        let modern = r#"{"version": "1.0", "workspace_root": "/ws", "projects": [], "last_updated": "2026-10-16T08:30:00.5Z"}"#;
        let snapshot: ConfigSnapshot = serde_json::from_str(modern).unwrap();
        assert_eq!(snapshot.last_updated.timestamp_subsec_millis(), 500);

        let garbage = r#"{"version": "1.0", "workspace_root": "/ws", "projects": [], "last_updated": "yesterday"}"#;
        assert!(serde_json::from_str::<ConfigSnapshot>(garbage).is_err());
    }

    #[test]
    fn test_parse_epoch_text() {
        let ts = parse_epoch_text("1727000000.123456789").unwrap();
        assert_eq!(ts.timestamp_subsec_nanos(), 123_456_789);
        assert_eq!(parse_epoch_text("1727000000").unwrap().timestamp(), 1_727_000_000);
        assert!(parse_epoch_text("17e9").is_none());
        assert!(parse_epoch_text(".5").is_none());
    }

    #[test]
    fn test_new_snapshot_carries_version() {
        let snapshot = ConfigSnapshot::new(PathBuf::from("/ws"), vec![record("a")]);
        assert_eq!(snapshot.version, CACHE_VERSION);
        assert_eq!(snapshot.projects.len(), 1);
    }
}
