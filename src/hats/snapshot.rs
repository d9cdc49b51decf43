use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Zero-based logical position inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// One decorated range. Only `start` is rendered; `end` is kept for
/// completeness of the file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HatRange {
    pub start: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Position>,
}

impl HatRange {
    pub const fn at(start: Position) -> Self {
        Self { start, end: None }
    }
}

/// Color name -> ranges decorated with that color.
pub type ColorGroups = HashMap<String, Vec<HatRange>>;

/// Full contents of the hats file at one point in time, keyed by absolute
/// document path.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    pub files: HashMap<String, ColorGroups>,
}

impl Snapshot {
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Groups for the document whose path is exactly `path`.
    pub fn groups_for(&self, path: &str) -> Option<&ColorGroups> {
        self.files.get(path)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read hats file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse hats file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads the hats file fresh on every call; nothing is cached between loads.
#[derive(Debug, Clone)]
pub struct SnapshotLoader {
    path: PathBuf,
}

impl SnapshotLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `Ok(None)` when the file does not exist yet.
    pub fn load(&self) -> Result<Option<Snapshot>, LoadError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            // the producer may replace the file between the check and the read
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(LoadError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        Snapshot::from_json(&content)
            .map(Some)
            .map_err(|source| LoadError::Parse {
                path: self.path.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_hats(content: &str) -> (tempfile::TempDir, SnapshotLoader) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("vscode-hats.json");
        std::fs::write(&path, content).expect("write hats");
        (dir, SnapshotLoader::new(path))
    }

    #[test]
    fn missing_file_is_absent_not_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let loader = SnapshotLoader::new(dir.path().join("nope.json"));
        assert!(loader.load().expect("load").is_none());
    }

    #[test]
    fn parses_three_level_structure() {
        let (_dir, loader) = write_hats(
            r#"{"/a.txt":{"red":[{"start":{"line":1,"character":2},"end":{"line":1,"character":5}}],
                "blue":[{"start":{"line":0,"character":0}}]}}"#,
        );
        let snapshot = loader.load().expect("load").expect("present");
        let groups = snapshot.groups_for("/a.txt").expect("group");
        assert_eq!(groups["red"][0].start, Position::new(1, 2));
        assert_eq!(groups["red"][0].end, Some(Position::new(1, 5)));
        assert_eq!(groups["blue"], vec![HatRange::at(Position::new(0, 0))]);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let (_dir, loader) = write_hats(
            r#"{"/a.txt":{"red":[{
                "start":{"line":3,"character":4,"extra":true},
                "startOffset":12,
                "shape":"bolt"}]}}"#,
        );
        let snapshot = loader.load().expect("load").expect("present");
        assert_eq!(
            snapshot.groups_for("/a.txt").expect("group")["red"][0].start,
            Position::new(3, 4)
        );
    }

    #[test]
    fn truncated_content_is_a_parse_error() {
        let (_dir, loader) = write_hats(r#"{"/a.txt":{"red":[{"start":{"line":0,"#);
        assert!(matches!(loader.load(), Err(LoadError::Parse { .. })));
    }

    #[test]
    fn negative_positions_are_rejected() {
        let (_dir, loader) =
            write_hats(r#"{"/a.txt":{"red":[{"start":{"line":-1,"character":0}}]}}"#);
        assert!(matches!(loader.load(), Err(LoadError::Parse { .. })));
    }

    #[test]
    fn range_without_start_is_rejected() {
        let (_dir, loader) = write_hats(r#"{"/a.txt":{"red":[{"end":{"line":0,"character":0}}]}}"#);
        assert!(matches!(loader.load(), Err(LoadError::Parse { .. })));
    }

    #[test]
    fn empty_or_blank_file_is_a_parse_error() {
        let (_dir, loader) = write_hats("");
        assert!(matches!(loader.load(), Err(LoadError::Parse { .. })));

        let (_dir, loader) = write_hats("  \n");
        assert!(matches!(loader.load(), Err(LoadError::Parse { .. })));
    }

    #[test]
    fn path_keys_match_exactly() {
        let snapshot = Snapshot::from_json(
            r#"{"/Users/me/A.txt":{"red":[{"start":{"line":0,"character":0}}]}}"#,
        )
        .expect("parse");
        assert!(snapshot.groups_for("/Users/me/A.txt").is_some());
        assert!(snapshot.groups_for("/users/me/a.txt").is_none());
        assert!(snapshot.groups_for("/Users/me/./A.txt").is_none());
    }
}
