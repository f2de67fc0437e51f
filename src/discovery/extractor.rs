// Pulls a one-line description out of a project directory
//
// First the entry file is scanned for an announcement print or a docstring,
// then the README variants are tried. Nothing in here returns an error:
// an unreadable file just means no description from that file.

use crate::config::WorkspaceLayout;
use regex::Regex;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::debug;

// Only the top of the entry file is worth looking at
const MAX_SCAN_LINES: usize = 20;

// How far past its opening line a docstring may close
const DOCSTRING_LOOKAHEAD: usize = 4;

const MAX_DESCRIPTION_CHARS: usize = 100;
const ELLIPSIS: &str = "...";

// README lines must be strictly longer than this to count
const MIN_README_LINE_CHARS: usize = 10;
const README_LINE_LIMIT: usize = 5;

const DOCSTRING_MARKERS: &[&str] = &["\"\"\"", "'''"];

// Calls that write a line to stdout
const OUTPUT_CALL_PATTERNS: &[&str] = &[r"\bprint\s*\(", r"\bsys\.stdout\.write\s*\("];

pub struct DescriptionExtractor {
    entry_file: String,
    readme_names: Vec<String>,
    trigger_keywords: Vec<String>,
    output_calls: Vec<Regex>,
}

impl DescriptionExtractor {
    pub fn new(layout: &WorkspaceLayout) -> Self {
        // Compile once; every project in a pass reuses them
        let output_calls = OUTPUT_CALL_PATTERNS
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect();

        Self {
            entry_file: layout.entry_file.clone(),
            readme_names: layout.readme_names.clone(),
            trigger_keywords: layout.trigger_keywords.clone(),
            output_calls,
        }
    }

    /// Derive a short summary for `project_dir`, at most 100 characters
    /// plus `...` when cut.
    pub fn extract(&self, project_dir: &Path) -> Option<String> {
        self.from_entry_file(project_dir)
            .or_else(|| self.from_readme(project_dir))
    }

    fn from_entry_file(&self, project_dir: &Path) -> Option<String> {
        let path = project_dir.join(&self.entry_file);
        if !path.is_file() {
            return None;
        }

        match read_leading_lines(&path, MAX_SCAN_LINES + DOCSTRING_LOOKAHEAD) {
            Ok(lines) => self.scan_entry_lines(&lines),
            Err(e) => {
                debug!(path = %path.display(), "skipping unreadable entry file: {}", e);
                None
            }
        }
    }

    fn scan_entry_lines(&self, lines: &[String]) -> Option<String> {
        for (i, line) in lines.iter().enumerate().take(MAX_SCAN_LINES) {
            if self.is_announcement(line) {
                if let Some(text) = first_quoted(line).and_then(finish_description) {
                    return Some(text);
                }
            }

            if let Some(text) = docstring_at(lines, i) {
                return Some(text);
            }
        }
        None
    }

    /// An output call that mentions one of the trigger keywords
    fn is_announcement(&self, line: &str) -> bool {
        self.output_calls.iter().any(|regex| regex.is_match(line))
            && self
                .trigger_keywords
                .iter()
                .any(|keyword| line.contains(keyword.as_str()))
    }

    fn from_readme(&self, project_dir: &Path) -> Option<String> {
        self.readme_names.iter().find_map(|name| {
            let path = project_dir.join(name);
            if !path.is_file() {
                return None;
            }

            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    debug!(path = %path.display(), "skipping unreadable README: {}", e);
                    return None;
                }
            };

            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .take(README_LINE_LIMIT)
                .find(|line| {
                    !line.starts_with('#') && line.chars().count() > MIN_README_LINE_CHARS
                })
                .map(truncate_description)
        })
    }
}

/// Read up to `limit` lines; invalid UTF-8 in those lines is an error
fn read_leading_lines(path: &Path, limit: usize) -> io::Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    reader.lines().take(limit).collect()
}

/// Text between the first quote character on the line and the next
/// occurrence of that same character. Whichever of `'` and `"` comes first
/// decides the quote style.
fn first_quoted(line: &str) -> Option<&str> {
    let start = line.find(|c: char| c == '"' || c == '\'')?;
    let quote = line[start..].chars().next()?;
    let rest = &line[start + 1..];
    let end = rest.find(quote)?;
    Some(&rest[..end])
}

/// Docstring opening on `lines[i]`, closed on the same line or within the
/// lookahead window
fn docstring_at(lines: &[String], i: usize) -> Option<String> {
    let trimmed = lines[i].trim();
    let marker = DOCSTRING_MARKERS
        .iter()
        .copied()
        .find(|marker| trimmed.starts_with(marker))?;

    if trimmed.len() > marker.len() * 2 && trimmed.ends_with(marker) {
        let inner = &trimmed[marker.len()..trimmed.len() - marker.len()];
        return finish_description(inner);
    }

    let last = (i + DOCSTRING_LOOKAHEAD).min(lines.len().saturating_sub(1));
    (i + 1..=last)
        .find(|&j| lines[j].contains(marker))
        .and_then(|j| finish_description(&lines[i..=j].join(" ").replace(marker, "")))
}

fn finish_description(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(truncate_description(text))
    }
}

fn truncate_description(text: &str) -> String {
    if text.chars().count() > MAX_DESCRIPTION_CHARS {
        let mut cut: String = text.chars().take(MAX_DESCRIPTION_CHARS).collect();
        cut.push_str(ELLIPSIS);
        cut
    } else {
        text.to_string()
    }
}
