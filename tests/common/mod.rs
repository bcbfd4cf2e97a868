#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tabular::{Cell, Key, Record, Value, keys};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }
}

pub fn text(value: &str) -> Cell {
    Some(Value::from(value))
}

pub fn key(name: &str) -> Key {
    keys::normalize_str(name).expect("non-blank key")
}

/// Keyed record from mixed-type cells.
pub fn keyed(pairs: Vec<(&str, Value)>) -> Record {
    Record::Keyed(
        pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), Some(value)))
            .collect(),
    )
}

/// Expected keyed view with string cells.
pub fn hash(pairs: &[(&str, &str)]) -> BTreeMap<Key, Cell> {
    pairs
        .iter()
        .map(|(name, value)| (key(name), text(value)))
        .collect()
}

/// Header plus three riders; `equipe` and `homme` never vary.
pub fn riders() -> Vec<Record> {
    vec![
        Record::positional(["nom", "equipe", "homme", "age"]),
        Record::positional(["Hinault", "", "true", "30"]),
        Record::positional(["Lemond", "", "true", "20"]),
        Record::positional(["Hinault", "", "true", "30"]),
    ]
}
