//! A run over a set of HAR files: one shared time anchor, two reports.

use crate::actions::{ActionInstance, RuleSet, identify_actions};
use crate::har::CaptureFile;
use crate::record::Record;
use crate::timeline::{batch_anchor, with_relative_time};
use crate::{Error, Result};
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};

/// List the files of `dir` in directory-listing order.
///
/// `include` is an optional glob matched against each file name. Directory
/// listing order is platform dependent; callers wanting stable output sort.
pub fn discover_captures(dir: &Path, include: Option<&str>) -> Result<Vec<PathBuf>> {
    tracing::debug!("Listing HAR files in: {}", dir.display());

    let include = include
        .map(|pattern| {
            Pattern::new(pattern).map_err(|e| {
                Error::InvalidPattern(format!("Invalid glob pattern '{}': {}", pattern, e))
            })
        })
        .transpose()?;

    let mut paths = Vec::new();
    for dir_entry in fs::read_dir(dir)? {
        let path = dir_entry?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(pattern) = &include
            && !path
                .file_name()
                .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
        {
            continue;
        }
        paths.push(path);
    }

    tracing::debug!("Found {} files", paths.len());
    Ok(paths)
}

/// The captures of one run, kept grouped by file
#[derive(Debug, Clone, Default)]
pub struct Batch {
    captures: Vec<CaptureFile>,
}

impl Batch {
    /// Load every file in order, stopping at the first failure
    pub fn load(paths: &[PathBuf]) -> Result<Self> {
        let captures = paths
            .iter()
            .map(|path| CaptureFile::load(path))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { captures })
    }

    pub fn from_captures(captures: Vec<CaptureFile>) -> Self {
        Self { captures }
    }

    pub fn captures(&self) -> &[CaptureFile] {
        &self.captures
    }

    pub fn entry_count(&self) -> usize {
        self.captures.iter().map(|capture| capture.entries.len()).sum()
    }

    /// Add `startMs_rel`/`endMs_rel` to every entry, anchored at the earliest
    /// timestamp of the whole batch
    pub fn normalized(self) -> Result<Self> {
        let anchor = batch_anchor(self.captures.iter().flat_map(|c| c.entries.iter()))?;
        let Some(anchor) = anchor else {
            return Ok(self);
        };
        tracing::debug!("Batch time anchor: {} ms", anchor);

        let captures = self
            .captures
            .into_iter()
            .map(|capture| -> Result<CaptureFile> {
                Ok(CaptureFile {
                    entries: with_relative_time(capture.entries, anchor)?,
                    ..capture
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { captures })
    }

    /// All entries of all files, in file order
    pub fn timeline(&self) -> Vec<Record> {
        self.captures
            .iter()
            .flat_map(|capture| capture.entries.iter().cloned())
            .collect()
    }

    /// Match `rules` against each file separately; entries are never pooled
    /// across files for action detection
    pub fn detect_actions(&self, rules: &RuleSet) -> Result<Vec<ActionInstance>> {
        let mut actions = Vec::new();
        for capture in &self.captures {
            let found = identify_actions(rules, &capture.entries)?;
            tracing::debug!("{}: {} actions", capture.name, found.len());
            actions.extend(found);
        }
        Ok(actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::har::HarReader;
    use crate::record::{FieldValue, fields};

    fn capture(name: &str, entries: &[(&str, &str, &str)]) -> CaptureFile {
        let entries: Vec<serde_json::Value> = entries
            .iter()
            .map(|(started, method, url)| {
                serde_json::json!({
                    "pageref": "page_1",
                    "startedDateTime": started,
                    "time": 100,
                    "request": {"method": method, "url": url},
                    "response": {"status": 200},
                    "timings": {"wait": 100}
                })
            })
            .collect();
        let har = serde_json::json!({
            "log": {
                "pages": [{"id": "page_1", "title": name, "startedDateTime": "2024-01-15T10:00:00.000Z"}],
                "entries": entries
            }
        });
        CaptureFile::from_har(name, &har).unwrap()
    }

    fn rel(record: &Record, key: &str) -> i64 {
        record.get(key).unwrap().as_i64().unwrap()
    }

    #[test]
    fn test_anchor_spans_all_files() {
        let batch = Batch::from_captures(vec![
            capture("late.har", &[("2024-01-15T10:00:05.000Z", "GET", "/a")]),
            capture("early.har", &[("2024-01-15T10:00:01.000Z", "GET", "/b")]),
        ])
        .normalized()
        .unwrap();

        let timeline = batch.timeline();
        assert_eq!(timeline.len(), 2);
        assert_eq!(rel(&timeline[0], fields::START_MS_REL), 4_000);
        assert_eq!(rel(&timeline[1], fields::START_MS_REL), 0);
        assert_eq!(timeline[0].get(fields::FILE), Some(&FieldValue::from("late.har")));
    }

    #[test]
    fn test_actions_are_not_pooled_across_files() {
        let rules = RuleSet::from_str(
            r#"[{"name": "Flow", "firstRequest": {"url": "/start"}, "lastRequest": {"url": "/end"}}]"#,
        )
        .unwrap();
        let batch = Batch::from_captures(vec![
            capture("one.har", &[("2024-01-15T10:00:00.000Z", "GET", "/start")]),
            capture("two.har", &[("2024-01-15T10:00:01.000Z", "GET", "/end")]),
        ])
        .normalized()
        .unwrap();

        assert!(batch.detect_actions(&rules).unwrap().is_empty());
    }

    #[test]
    fn test_actions_accumulate_per_file() {
        let rules = RuleSet::from_str(
            r#"[{"name": "Flow", "firstRequest": {"url": "/start"}, "lastRequest": {"url": "/end"}}]"#,
        )
        .unwrap();
        let batch = Batch::from_captures(vec![
            capture(
                "one.har",
                &[
                    ("2024-01-15T10:00:00.000Z", "GET", "/start"),
                    ("2024-01-15T10:00:00.200Z", "GET", "/end"),
                ],
            ),
            capture(
                "two.har",
                &[
                    ("2024-01-15T10:00:03.000Z", "GET", "/start"),
                    ("2024-01-15T10:00:03.050Z", "GET", "/middle"),
                    ("2024-01-15T10:00:03.500Z", "GET", "/end"),
                ],
            ),
        ])
        .normalized()
        .unwrap();

        let actions = batch.detect_actions(&rules).unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].duration, 300);
        assert_eq!(actions[0].calls, 1);
        assert_eq!(actions[1].duration, 600);
        assert_eq!(actions[1].calls, 2);
    }

    #[test]
    fn test_empty_batch_normalizes() {
        let batch = Batch::default().normalized().unwrap();
        assert_eq!(batch.entry_count(), 0);
        assert!(batch.timeline().is_empty());
    }

    #[test]
    fn test_discover_skips_directories_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let minimal = r#"{"log": {"pages": [], "entries": []}}"#;
        fs::write(dir.path().join("a.har"), minimal).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a capture").unwrap();
        fs::create_dir(dir.path().join("nested.har")).unwrap();

        let mut all = discover_captures(dir.path(), None).unwrap();
        all.sort();
        assert_eq!(all.len(), 2);

        let hars = discover_captures(dir.path(), Some("*.har")).unwrap();
        assert_eq!(hars, vec![dir.path().join("a.har")]);
        assert!(HarReader::from_file(&hars[0]).is_ok());
    }

    #[test]
    fn test_discover_invalid_glob() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_captures(dir.path(), Some("[")).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern(_)));
    }

    #[test]
    fn test_discover_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = discover_captures(&dir.path().join("absent"), None);
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
