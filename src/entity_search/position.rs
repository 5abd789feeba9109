// WHY: Call-scoped candidate store for phase 1; keyed by start offset so phase 2 reads it in order

use std::collections::BTreeMap;

use super::conflicts::Candidate;
use crate::entity::{Alias, Entity};

/// Location of one alias occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    /// Byte range of the alias words in the lowercased normalized text
    pub start: usize,
    pub end: usize,
    /// Byte range of the matched words in the input text
    pub source_start: usize,
    pub source_end: usize,
}

impl MatchSpan {
    /// Span of `text` at `start` where normalized and source offsets coincide
    pub fn at(start: usize, text: &str) -> Self {
        Self {
            start,
            end: start + text.len(),
            source_start: start,
            source_end: start + text.len(),
        }
    }
}

/// Alias words found at one start offset of the normalized text, with every entity sharing them
#[derive(Debug, Clone)]
pub struct SearchResultPosition<'a> {
    /// Byte offset of the first alias character in the lowercased normalized text
    pub start: usize,
    /// Exclusive byte end in the lowercased normalized text
    pub end: usize,
    pub source_start: usize,
    pub source_end: usize,
    /// Matched normalized alias text, padding spaces trimmed
    pub text: String,
    /// Character length of `text`, the unit for longest-match comparisons
    pub char_len: usize,
    entities: BTreeMap<i64, Candidate<'a>>,
}

impl<'a> SearchResultPosition<'a> {
    pub fn new(span: MatchSpan, text: &str, entity: &'a Entity, alias: &'a Alias) -> Self {
        let mut entities = BTreeMap::new();
        entities.insert(entity.id, (entity, alias));
        Self {
            start: span.start,
            end: span.end,
            source_start: span.source_start,
            source_end: span.source_end,
            text: text.to_string(),
            char_len: text.chars().count(),
            entities,
        }
    }

    pub fn span(&self) -> MatchSpan {
        MatchSpan {
            start: self.start,
            end: self.end,
            source_start: self.source_start,
            source_end: self.source_end,
        }
    }

    /// Register another entity at this position; a repeated id keeps the latest alias
    pub fn add_entity(&mut self, entity: &'a Entity, alias: &'a Alias) {
        self.entities.insert(entity.id, (entity, alias));
    }

    /// Byte spans `[start, end)` intersect
    pub fn overlaps(&self, other: &SearchResultPosition<'_>) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Tied candidates in ascending entity id order
    pub fn candidates(&self) -> Vec<Candidate<'a>> {
        self.entities.values().copied().collect()
    }
}

/// Start offset -> candidate, ordered
#[derive(Debug, Default)]
pub struct PositionMap<'a> {
    positions: BTreeMap<usize, SearchResultPosition<'a>>,
}

impl<'a> PositionMap<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an alias occurrence
    /// WHY: an existing entry at least as long absorbs the entity as a homonym; a strictly
    /// shorter existing entry is replaced, and a strictly shorter newcomer is dropped
    pub fn record(&mut self, span: MatchSpan, text: &str, entity: &'a Entity, alias: &'a Alias) {
        let char_len = text.chars().count();
        match self.positions.get_mut(&span.start) {
            Some(existing) if existing.char_len >= char_len => {
                if existing.char_len == char_len {
                    existing.add_entity(entity, alias);
                }
            }
            _ => {
                self.positions
                    .insert(span.start, SearchResultPosition::new(span, text, entity, alias));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Candidates sorted by ascending start offset
    pub fn into_sorted(self) -> Vec<SearchResultPosition<'a>> {
        self.positions.into_values().collect()
    }
}
