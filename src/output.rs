// WHY: JSON-lines match records for the CLI; one object per (entity, alias) occurrence

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::entity_search::EntityMatch;

/// Serialized form of one match
///
/// `source_start..source_end` are byte offsets into the file as read and `source_text` is that
/// slice; `start`/`end`/`text` refer to the normalized text the search ran on.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub file: String,
    pub source_start: usize,
    pub source_end: usize,
    pub source_text: String,
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub entity_id: i64,
    pub entity_name: String,
    pub alias: String,
    pub language: Option<String>,
    pub is_abbreviation: bool,
}

impl MatchRecord {
    /// `source` is the text the match was found in
    pub fn from_match(file: &str, source: &str, found: &EntityMatch<'_>) -> Self {
        Self {
            file: file.to_string(),
            source_start: found.source_start,
            source_end: found.source_end,
            source_text: source
                .get(found.source_start..found.source_end)
                .unwrap_or_default()
                .to_string(),
            start: found.start,
            end: found.end,
            text: found.text.clone(),
            entity_id: found.entity.id,
            entity_name: found.entity.name.clone(),
            alias: found.alias.text.clone(),
            language: found.alias.language.clone(),
            is_abbreviation: found.alias.is_abbreviation,
        }
    }
}

/// Write records as JSON lines
pub async fn write_match_lines<W>(writer: &mut W, records: &[MatchRecord]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    for record in records {
        let line = serde_json::to_string(record)?;
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }
    Ok(())
}
