//! Ground-truth label loading.
//!
//! Each data directory carries a `labels.txt` with one label per line,
//! in the same lexicographic order as the directory's image files.

use std::path::Path;

use crate::error::{CurationError, CurationResult};

/// An ordered set of ground-truth labels for one directory.
#[derive(Debug, Clone)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    /// Load labels from a file: UTF-8, one label per line, trimmed.
    pub fn load(path: &Path) -> CurationResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CurationError::Labels {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let labels = content
            .trim()
            .split('\n')
            .map(|line| line.trim().to_string())
            .collect();

        Ok(Self { labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.labels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_trims_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.txt");
        std::fs::write(&path, "golden retriever\n  tabby cat  \nbarn owl\n").unwrap();

        let labels = LabelSet::load(&path).unwrap();
        assert_eq!(labels.len(), 3);
        let collected: Vec<&String> = labels.iter().collect();
        assert_eq!(collected[1], "tabby cat");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LabelSet::load(&dir.path().join("labels.txt")).unwrap_err();
        assert!(matches!(err, CurationError::Labels { .. }));
    }

    #[test]
    fn test_load_ignores_trailing_newlines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.txt");
        std::fs::write(&path, "cat\ndog\n\n\n").unwrap();

        let labels = LabelSet::load(&path).unwrap();
        assert_eq!(labels.len(), 2);
    }
}
