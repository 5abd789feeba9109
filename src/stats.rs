// WHY: Per-file and per-run metrics written after a batch search for throughput tracking

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Per-file processing statistics
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FileStats {
    /// File path as given or discovered
    pub path: String,
    /// Number of bytes searched
    pub bytes_processed: u64,
    /// Number of (entity, alias) matches emitted
    pub matches_found: u64,
    /// Positions emitted with more than one entity
    pub tie_groups: u64,
    /// Processing time in milliseconds (read + search + write)
    pub processing_time_ms: u64,
    /// Search time in milliseconds (subset of processing_time_ms)
    pub search_time_ms: u64,
    /// Throughput in bytes per second over the whole processing time, rounded
    pub bytes_per_sec: f64,
    /// Processing status (success, failed)
    pub status: String,
    /// Error message if processing failed
    pub error: Option<String>,
}

impl FileStats {
    /// Stats for a searched file; pass the elapsed times once the file is fully written
    pub fn success(
        path: &Path,
        bytes: u64,
        matches: u64,
        tie_groups: u64,
        processing: Duration,
        search: Duration,
    ) -> Self {
        Self {
            path: path.display().to_string(),
            bytes_processed: bytes,
            matches_found: matches,
            tie_groups,
            processing_time_ms: processing.as_millis() as u64,
            search_time_ms: search.as_millis() as u64,
            bytes_per_sec: throughput(bytes, processing),
            status: "success".to_string(),
            error: None,
        }
    }

    pub fn failed(path: &Path, processing: Duration, error: impl ToString) -> Self {
        Self {
            path: path.display().to_string(),
            bytes_processed: 0,
            matches_found: 0,
            tie_groups: 0,
            processing_time_ms: processing.as_millis() as u64,
            search_time_ms: 0,
            bytes_per_sec: 0.0,
            status: "failed".to_string(),
            error: Some(error.to_string()),
        }
    }
}

/// Bytes per second, rounded to whole bytes; zero when no time was measured
fn throughput(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        (bytes as f64 / secs).round()
    } else {
        0.0
    }
}

/// Aggregate statistics for one CLI run
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub files_processed: u64,
    pub files_failed: u64,
    pub total_bytes: u64,
    pub total_matches: u64,
    pub total_time_ms: u64,
    pub files: Vec<FileStats>,
}

impl RunStats {
    pub fn record(&mut self, stats: FileStats) {
        if stats.error.is_some() {
            self.files_failed += 1;
        } else {
            self.files_processed += 1;
            self.total_bytes += stats.bytes_processed;
            self.total_matches += stats.matches_found;
        }
        self.files.push(stats);
    }

    /// Write pretty JSON statistics
    pub async fn write(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
