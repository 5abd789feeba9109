// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

#![allow(dead_code)]

use lexmatch::EntityMatch;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture helper for temporary dictionaries, configs and text files
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self { temp_dir, root_path }
    }

    /// Create a file with given content below the fixture root
    pub fn create_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }
}

/// (start, entity id) pairs in emission order
pub fn positions(matches: &[EntityMatch<'_>]) -> Vec<(usize, i64)> {
    matches.iter().map(|m| (m.start, m.entity.id)).collect()
}

/// Entity ids in emission order
pub fn entity_ids(matches: &[EntityMatch<'_>]) -> Vec<i64> {
    matches.iter().map(|m| m.entity.id).collect()
}
