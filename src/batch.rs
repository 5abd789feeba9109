// WHY: One file's unit of work for batch runs: read, search, write JSON lines, measure.
// Lives in the library so the timing that feeds the stats file is testable

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Instant;
use tokio::io::AsyncWrite;
use tracing::debug;

use crate::entity::Entity;
use crate::entity_search::EntitySearcher;
use crate::output::{write_match_lines, MatchRecord};
use crate::reader::{load_text, ReaderConfig};
use crate::stats::FileStats;

/// Search one file and append its matches to `writer`
///
/// Errors are per file; the caller decides whether to continue with the next one.
pub async fn process_file<W>(
    path: &Path,
    searcher: &EntitySearcher,
    entities: &[Entity],
    reader_config: &ReaderConfig,
    writer: &mut W,
) -> Result<FileStats>
where
    W: AsyncWrite + Unpin,
{
    let file_start = Instant::now();
    let loaded = load_text(path, reader_config).await?;
    let text = loaded
        .text()
        .with_context(|| format!("Invalid UTF-8 in {}", path.display()))?;

    let search_start = Instant::now();
    let file_label = path.display().to_string();
    let mut records = Vec::new();
    let mut tie_groups = 0u64;
    for group in searcher.search_groups(text, entities) {
        if group.is_tie() {
            tie_groups += 1;
        }
        records.extend(
            group
                .into_matches()
                .iter()
                .map(|found| MatchRecord::from_match(&file_label, text, found)),
        );
    }
    let search_time = search_start.elapsed();

    write_match_lines(writer, &records).await?;
    debug!("{}: {} matches, {} tie groups", file_label, records.len(), tie_groups);

    Ok(FileStats::success(
        path,
        loaded.len() as u64,
        records.len() as u64,
        tie_groups,
        file_start.elapsed(),
        search_time,
    ))
}
