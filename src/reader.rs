// WHY: Load whole input files for searching; large corpora can be memory-mapped instead of
// copied into owned buffers (cargo feature "mmap", on by default)

use anyhow::{Context, Result};
#[cfg(feature = "mmap")]
use memmap2::Mmap;
use std::path::Path;
#[cfg(not(feature = "mmap"))]
use tracing::warn;
use tracing::debug;

/// Configuration for file reading behavior
#[derive(Debug, Clone, Default)]
pub struct ReaderConfig {
    /// Use memory-mapped I/O instead of async buffered reads; ignored without the "mmap" feature
    pub use_mmap: bool,
}

/// File contents, either owned or memory-mapped
pub enum LoadedText {
    Buffered(String),
    #[cfg(feature = "mmap")]
    Mapped(Mmap),
}

impl LoadedText {
    /// Borrow the contents as text
    /// WHY: mapped files are validated lazily so the search can run directly on the mapping
    pub fn text(&self) -> Result<&str> {
        match self {
            LoadedText::Buffered(text) => Ok(text),
            #[cfg(feature = "mmap")]
            LoadedText::Mapped(map) => Ok(std::str::from_utf8(map)?),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            LoadedText::Buffered(text) => text.len(),
            #[cfg(feature = "mmap")]
            LoadedText::Mapped(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read a text file for searching
pub async fn load_text<P: AsRef<Path>>(path: P, config: &ReaderConfig) -> Result<LoadedText> {
    let path = path.as_ref();
    debug!("Reading {} (mmap: {})", path.display(), config.use_mmap);

    if config.use_mmap {
        #[cfg(feature = "mmap")]
        return load_mapped(path);
        #[cfg(not(feature = "mmap"))]
        warn!("Built without the mmap feature; reading {} buffered", path.display());
    }

    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file {}", path.display()))?;
    Ok(LoadedText::Buffered(text))
}

#[cfg(feature = "mmap")]
fn load_mapped(path: &Path) -> Result<LoadedText> {
    let file =
        std::fs::File::open(path).with_context(|| format!("Failed to open file {}", path.display()))?;
    // WHY: zero-length files cannot be mapped on every platform
    if file.metadata()?.len() == 0 {
        return Ok(LoadedText::Buffered(String::new()));
    }
    // SAFETY: the mapping is read-only and lives no longer than this search run;
    // concurrent truncation of input files is not supported
    let map = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to map file {}", path.display()))?;
    Ok(LoadedText::Mapped(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(feature = "mmap")]
    #[tokio::test]
    async fn test_buffered_and_mapped_agree() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("text.txt");
        std::fs::write(&path, "Courts of Mississippi ä").unwrap();

        let buffered = load_text(&path, &ReaderConfig::default()).await.unwrap();
        let mapped = load_text(&path, &ReaderConfig { use_mmap: true }).await.unwrap();

        assert!(matches!(mapped, LoadedText::Mapped(_)));
        assert_eq!(buffered.text().unwrap(), mapped.text().unwrap());
        assert_eq!(buffered.len(), mapped.len());
    }

    #[tokio::test]
    async fn test_empty_file_mapped() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("empty.txt");
        std::fs::write(&path, "").unwrap();

        let loaded = load_text(&path, &ReaderConfig { use_mmap: true }).await.unwrap();
        assert!(loaded.is_empty());
        assert_eq!(loaded.text().unwrap(), "");
    }

    #[tokio::test]
    async fn test_invalid_utf8() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("invalid.txt");
        std::fs::write(&path, [0xFF, 0xFE, 0xFD]).unwrap();

        assert!(load_text(&path, &ReaderConfig::default()).await.is_err());
        // mapped files fail on first access instead of on load
        let mapped = load_text(&path, &ReaderConfig { use_mmap: true }).await;
        assert!(mapped.map_or(true, |loaded| loaded.text().is_err()));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("missing.txt");
        assert!(load_text(&path, &ReaderConfig::default()).await.is_err());
        assert!(load_text(&path, &ReaderConfig { use_mmap: true }).await.is_err());
    }

    #[cfg(not(feature = "mmap"))]
    #[tokio::test]
    async fn test_mmap_request_falls_back_to_buffered() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("text.txt");
        std::fs::write(&path, "Courts of Oregon").unwrap();

        let loaded = load_text(&path, &ReaderConfig { use_mmap: true }).await.unwrap();
        assert!(matches!(loaded, LoadedText::Buffered(_)));
        assert_eq!(loaded.text().unwrap(), "Courts of Oregon");
    }
}
