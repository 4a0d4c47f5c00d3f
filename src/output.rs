// src/output.rs
// =============================================================================
// Everything that lands on disk goes through here.
//
// - write_data: raw bytes to a named file (index dump, whois text, ...)
// - write_results: the final term -> URLs map as JSON
//
// Paths are relative to the output directory chosen on the command line.
// =============================================================================

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ArchiveError;
use crate::search::Query;

/// Where the raw CDX answer is kept.
pub const SNAPSHOTS_FILE: &str = "data/snaps.json";

#[derive(Debug, Clone)]
pub struct Output {
    root: PathBuf,
}

impl Output {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Writes `data` verbatim to `name` and syncs it to disk.
    pub fn write_data(&self, name: &str, data: &[u8]) -> Result<PathBuf, ArchiveError> {
        let path = self.path(name);
        info!("Writing {}", path.display());

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = fs::File::create(&path)?;
        file.write_all(data)?;
        file.sync_all()?;
        Ok(path)
    }

    /// Serializes the result map into the file named after the query kind.
    pub fn write_results(
        &self,
        query: &Query,
        results: &HashMap<String, Vec<String>>,
    ) -> Result<PathBuf, ArchiveError> {
        let bytes = serde_json::to_vec(results)?;
        self.write_data(query.result_file_name(), &bytes)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_data_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let output = Output::new(dir.path());

        let path = output.write_data(SNAPSHOTS_FILE, b"[[\"urlkey\"]]").unwrap();

        assert_eq!(path, dir.path().join("data").join("snaps.json"));
        assert_eq!(fs::read(&path).unwrap(), b"[[\"urlkey\"]]");
    }

    #[test]
    fn test_write_results_uses_query_file_name() {
        let dir = TempDir::new().unwrap();
        let output = Output::new(dir.path());

        let mut results = HashMap::new();
        results.insert(
            "abc".to_string(),
            vec!["https://archive/web/1/http://e.com".to_string()],
        );

        let path = output
            .write_results(&Query::Term("abc".to_string()), &results)
            .unwrap();
        assert!(path.ends_with("term_results.json"));

        let written: HashMap<String, Vec<String>> =
            serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(written, results);
    }
}
