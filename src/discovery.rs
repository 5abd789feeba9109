// WHY: Expand CLI inputs (files and directories) into the list of text files to search

use anyhow::{Context, Result};
use glob::glob;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration for input discovery
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Glob pattern applied below every directory input
    pub pattern: String,
    /// Whether to fail fast on first error or continue with the remaining inputs
    pub fail_fast: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            pattern: "**/*.txt".to_string(),
            fail_fast: false,
        }
    }
}

/// Resolve inputs into a sorted, deduplicated list of files
///
/// Plain files are taken as given; directories are scanned with `config.pattern`.
pub fn discover_inputs(inputs: &[PathBuf], config: &DiscoveryConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
        } else if input.is_dir() {
            files.extend(scan_directory(input, config)?);
        } else if config.fail_fast {
            anyhow::bail!("Input does not exist: {}", input.display());
        } else {
            warn!("Skipping missing input: {}", input.display());
        }
    }

    files.sort();
    files.dedup();
    info!("Discovered {} input files", files.len());
    Ok(files)
}

fn scan_directory(root: &Path, config: &DiscoveryConfig) -> Result<Vec<PathBuf>> {
    let pattern = root.join(&config.pattern);
    let pattern = pattern
        .to_str()
        .with_context(|| format!("Non UTF-8 directory path: {}", root.display()))?;

    let mut files = Vec::new();
    for entry in glob(pattern).with_context(|| format!("Invalid glob pattern: {pattern}"))? {
        match entry {
            Ok(path) if path.is_file() => {
                debug!("Found matching file: {}", path.display());
                files.push(path);
            }
            Ok(_) => {}
            Err(e) => {
                if config.fail_fast {
                    return Err(anyhow::anyhow!("Failed to read {}: {}", e.path().display(), e.error()));
                }
                warn!("Skipping unreadable path {}: {}", e.path().display(), e.error());
            }
        }
    }
    Ok(files)
}
