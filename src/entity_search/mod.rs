// WHY: Main entity search interface - phase 1 collects every alias occurrence, phase 2 resolves
// overlaps and homonym conflicts lazily as the caller iterates

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::blacklist::{Blacklist, BlacklistItem};
use crate::entity::{Alias, Entity};
use crate::error::Result;

pub mod conflicts;
pub mod noise;
pub mod normalization;
pub mod overlap;
pub mod position;

pub use conflicts::{
    resolver_fn, Candidate, ConflictPolicy, ConflictResolver, FirstById, KeepAll, TopByPriority,
};
pub use noise::TimeSuffixFilter;
pub use normalization::{
    lowercase_aligned, normalize_text, NormalizedText, Normalizer, PluralStemmer, Stemmer,
    StemmingNormalizer, TokenSpan, WhitespaceNormalizer, WordNormalizer,
};
pub use overlap::{resolve_overlaps, OverlapResolver};
pub use position::{MatchSpan, PositionMap, SearchResultPosition};

/// Characters inspected on each side of an abbreviation match for the uppercase-block check
pub const DEFAULT_ABBREVIATION_CONTEXT: usize = 20;

/// Search filters and strategies
#[derive(Clone)]
pub struct SearchOptions {
    /// Only aliases without a language or with a language in this set are searched
    pub language_filter: Option<HashSet<String>>,
    /// Aliases whose normalized text has fewer characters are skipped
    pub min_alias_length: Option<usize>,
    pub blacklist: Option<Arc<Blacklist>>,
    /// Applied to positions shared by more than one entity
    pub conflict_resolver: Arc<dyn ConflictResolver>,
    pub use_stemmer: bool,
    pub abbreviation_context: usize,
    /// Overrides the strategy selected by `use_stemmer`
    pub normalizer: Option<Arc<dyn Normalizer>>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            language_filter: None,
            min_alias_length: None,
            blacklist: None,
            conflict_resolver: Arc::new(KeepAll),
            use_stemmer: false,
            abbreviation_context: DEFAULT_ABBREVIATION_CONTEXT,
            normalizer: None,
        }
    }
}

impl fmt::Debug for SearchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchOptions")
            .field("language_filter", &self.language_filter)
            .field("min_alias_length", &self.min_alias_length)
            .field("blacklist", &self.blacklist.is_some())
            .field("use_stemmer", &self.use_stemmer)
            .field("abbreviation_context", &self.abbreviation_context)
            .field("custom_normalizer", &self.normalizer.is_some())
            .finish_non_exhaustive()
    }
}

impl SearchOptions {
    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.language_filter = Some(languages.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_min_alias_length(mut self, min_alias_length: usize) -> Self {
        self.min_alias_length = Some(min_alias_length);
        self
    }

    pub fn with_blacklist(mut self, blacklist: Blacklist) -> Self {
        self.blacklist = Some(Arc::new(blacklist));
        self
    }

    /// Build the blacklist with the normalization strategy selected so far
    /// WHY: set `use_stemmer`/`normalizer` first, otherwise entries and aliases normalize differently
    pub fn with_blacklist_items<'b, I>(self, items: I) -> Self
    where
        I: IntoIterator<Item = &'b BlacklistItem>,
    {
        let blacklist = Blacklist::build(items, self.resolve_normalizer().as_ref());
        self.with_blacklist(blacklist)
    }

    pub fn with_conflict_resolver(mut self, resolver: impl ConflictResolver + 'static) -> Self {
        self.conflict_resolver = Arc::new(resolver);
        self
    }

    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_resolver = policy.resolver();
        self
    }

    pub fn with_stemmer(mut self, use_stemmer: bool) -> Self {
        self.use_stemmer = use_stemmer;
        self
    }

    pub fn with_abbreviation_context(mut self, chars: usize) -> Self {
        self.abbreviation_context = chars;
        self
    }

    pub fn with_normalizer(mut self, normalizer: impl Normalizer + 'static) -> Self {
        self.normalizer = Some(Arc::new(normalizer));
        self
    }

    /// Strategy used for both the text and the aliases
    pub fn resolve_normalizer(&self) -> Arc<dyn Normalizer> {
        match (&self.normalizer, self.use_stemmer) {
            (Some(custom), _) => Arc::clone(custom),
            (None, true) => Arc::new(StemmingNormalizer::<PluralStemmer>::default()),
            (None, false) => Arc::new(WordNormalizer),
        }
    }
}

/// One (entity, alias) occurrence in normalized text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMatch<'e> {
    pub entity: &'e Entity,
    pub alias: &'e Alias,
    /// Byte range of the alias words in the lowercased normalized text
    pub start: usize,
    pub end: usize,
    /// Byte range of the matched words in the searched text, for locating the match in the input
    pub source_start: usize,
    pub source_end: usize,
    /// Matched normalized alias text; stemmed when stemming is on, so "Texas" reads "texa"
    pub text: String,
}

/// Surviving position after overlap resolution, conflict resolution and noise filtering
#[derive(Debug, Clone)]
pub struct MatchGroup<'e> {
    pub start: usize,
    pub end: usize,
    pub source_start: usize,
    pub source_end: usize,
    pub text: String,
    pub members: Vec<Candidate<'e>>,
}

impl<'e> MatchGroup<'e> {
    pub fn is_tie(&self) -> bool {
        self.members.len() > 1
    }

    pub fn into_matches(self) -> Vec<EntityMatch<'e>> {
        let MatchGroup {
            start,
            end,
            source_start,
            source_end,
            text,
            members,
        } = self;
        members
            .into_iter()
            .map(|(entity, alias)| EntityMatch {
                entity,
                alias,
                start,
                end,
                source_start,
                source_end,
                text: text.clone(),
            })
            .collect()
    }
}

/// Dictionary entity searcher; reusable across texts and threads
pub struct EntitySearcher {
    options: SearchOptions,
    normalizer: Arc<dyn Normalizer>,
    time_filter: TimeSuffixFilter,
}

impl EntitySearcher {
    pub fn new(options: SearchOptions) -> Result<Self> {
        let normalizer = options.resolve_normalizer();
        Ok(Self {
            options,
            normalizer,
            time_filter: TimeSuffixFilter::new()?,
        })
    }

    pub fn with_default_options() -> Result<Self> {
        Self::new(SearchOptions::default())
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn normalizer(&self) -> &dyn Normalizer {
        self.normalizer.as_ref()
    }

    /// Deferred search yielding one item per (entity, alias) in ascending position order
    pub fn search<'s, 'e>(&'s self, text: &'s str, entities: &'e [Entity]) -> EntityMatches<'s, 'e> {
        EntityMatches {
            groups: self.search_groups(text, entities),
            pending: Vec::new().into_iter(),
        }
    }

    /// Deferred search yielding one item per surviving position (tie groups kept together)
    pub fn search_groups<'s, 'e>(&'s self, text: &'s str, entities: &'e [Entity]) -> MatchGroups<'s, 'e> {
        MatchGroups {
            searcher: self,
            phase: Phase::Pending { text, entities },
        }
    }

    /// Phase 1: every accepted alias occurrence, keyed by start offset
    fn collect_positions<'e>(&self, text: &str, entities: &'e [Entity]) -> (NormalizedText, PositionMap<'e>) {
        let mut positions = PositionMap::new();
        let cased = self.normalizer.normalize_with_spans(text, false);
        if cased.is_empty() {
            return (cased, positions);
        }
        // WHY: lowercased before the per-token rewrite so stemming sees "tables" in "TABLES"
        let lowered = self.normalizer.normalize_with_spans(text, true);

        let mut buffer = String::new();
        let mut aliases_searched = 0usize;
        let mut occurrences = 0usize;

        for entity in entities {
            for alias in &entity.aliases {
                if alias.text.trim().is_empty() || !self.language_allowed(alias) {
                    continue;
                }

                self.normalizer
                    .normalize_into(&alias.text, !alias.is_abbreviation, &mut buffer);
                let words = buffer.trim();
                if words.is_empty() {
                    continue;
                }
                if let Some(min) = self.options.min_alias_length {
                    if words.chars().count() < min {
                        continue;
                    }
                }
                if let Some(blacklist) = &self.options.blacklist {
                    if blacklist.contains(words, alias.language.as_deref(), alias.is_abbreviation) {
                        debug!("Skipping blacklisted alias '{}' of entity {}", words, entity.id);
                        continue;
                    }
                }

                aliases_searched += 1;
                let haystack = if alias.is_abbreviation { &cased } else { &lowered };
                let needle = buffer.as_str();
                let mut from = 0;
                while let Some(found) = haystack.as_str()[from..].find(needle) {
                    let hit = from + found;
                    // WHY: restart on the trailing pad space so adjacent repeats still match
                    from = hit + needle.len() - 1;

                    // offsets point at the alias words, past the leading pad space
                    let start = hit + 1;
                    let end = start + words.len();
                    if alias.is_abbreviation && self.inside_uppercase_block(haystack.as_str(), start, end) {
                        continue;
                    }
                    match match_span(haystack, &lowered, start, end) {
                        Some(span) => {
                            positions.record(span, words, entity, alias);
                            occurrences += 1;
                        }
                        None => debug!("Alias '{}' matched inside a token at {}; skipped", words, start),
                    }
                }
            }
        }

        debug!(
            "Searched {} aliases of {} entities: {} occurrences at {} positions",
            aliases_searched,
            entities.len(),
            occurrences,
            positions.len()
        );

        (lowered, positions)
    }

    fn language_allowed(&self, alias: &Alias) -> bool {
        match (&self.options.language_filter, &alias.language) {
            (Some(filter), Some(language)) => filter.contains(language),
            _ => true,
        }
    }

    /// Abbreviation sits in an all-uppercase run (likely a header) within the context window
    fn inside_uppercase_block(&self, text: &str, start: usize, end: usize) -> bool {
        let context = self.options.abbreviation_context;
        let from = if context == 0 {
            start
        } else {
            text[..start]
                .char_indices()
                .rev()
                .take(context)
                .last()
                .map_or(start, |(i, _)| i)
        };
        let to = text[end..]
            .char_indices()
            .nth(context)
            .map_or(text.len(), |(i, _)| end + i);

        let window = &text[from..to];
        window.to_uppercase() == window
    }

    /// Phase 2 tail for one surviving position
    fn finalize<'e>(&self, position: SearchResultPosition<'e>, lowered: &str) -> Option<MatchGroup<'e>> {
        let span = position.span();
        let mut members = position.candidates();
        if members.len() > 1 {
            #[cfg(debug_assertions)]
            let input_ids: Vec<i64> = members.iter().map(|(entity, _)| entity.id).collect();

            members = self.options.conflict_resolver.resolve(members);

            #[cfg(debug_assertions)]
            {
                let subset = members.iter().all(|(entity, _)| input_ids.contains(&entity.id));
                debug_assert!(subset, "conflict resolver returned entities outside its input");
            }
            if members.is_empty() {
                warn!(
                    "Conflict resolver dropped every entity for '{}' at {}",
                    position.text, position.start
                );
                return None;
            }
        }

        if self
            .time_filter
            .is_time_suffix(lowered, position.start, &position.text)
        {
            debug!("Suppressed time suffix '{}' at {}", position.text, position.start);
            return None;
        }

        Some(MatchGroup {
            start: span.start,
            end: span.end,
            source_start: span.source_start,
            source_end: span.source_end,
            text: position.text,
            members,
        })
    }
}

/// Translate a hit in `searched` into lowercased-text and source coordinates
/// WHY: abbreviations are found in the cased form; with stemming its tokens can differ in length
/// from the lowercased ones, so offsets move through token indices rather than bytes
fn match_span(searched: &NormalizedText, lowered: &NormalizedText, start: usize, end: usize) -> Option<MatchSpan> {
    let first = searched.token_starting_at(start)?;
    let last = searched.token_ending_at(end)?;
    let head = lowered.tokens().get(first)?;
    let tail = lowered.tokens().get(last)?;
    Some(MatchSpan {
        start: head.start,
        end: tail.end,
        source_start: head.source_start,
        source_end: tail.source_end,
    })
}

impl fmt::Debug for EntitySearcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntitySearcher")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

enum Phase<'s, 'e> {
    Pending {
        text: &'s str,
        entities: &'e [Entity],
    },
    Resolving {
        lowered: NormalizedText,
        overlaps: OverlapResolver<'e, std::vec::IntoIter<SearchResultPosition<'e>>>,
    },
    Done,
}

/// Deferred tie-group iterator; the first `next()` runs the whole collection phase
pub struct MatchGroups<'s, 'e> {
    searcher: &'s EntitySearcher,
    phase: Phase<'s, 'e>,
}

impl<'s, 'e> Iterator for MatchGroups<'s, 'e> {
    type Item = MatchGroup<'e>;

    fn next(&mut self) -> Option<Self::Item> {
        let searcher = self.searcher;
        loop {
            match &mut self.phase {
                Phase::Pending { text, entities } => {
                    let (text, entities) = (*text, *entities);
                    let (lowered, positions) = searcher.collect_positions(text, entities);
                    self.phase = Phase::Resolving {
                        lowered,
                        overlaps: OverlapResolver::new(positions.into_sorted().into_iter()),
                    };
                }
                Phase::Resolving { lowered, overlaps } => match overlaps.next() {
                    Some(position) => {
                        if let Some(group) = searcher.finalize(position, lowered.as_str()) {
                            return Some(group);
                        }
                    }
                    None => {
                        self.phase = Phase::Done;
                        return None;
                    }
                },
                Phase::Done => return None,
            }
        }
    }
}

/// Deferred match iterator; members of one tie group are yielded consecutively
pub struct EntityMatches<'s, 'e> {
    groups: MatchGroups<'s, 'e>,
    pending: std::vec::IntoIter<EntityMatch<'e>>,
}

impl<'s, 'e> Iterator for EntityMatches<'s, 'e> {
    type Item = EntityMatch<'e>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(next) = self.pending.next() {
                return Some(next);
            }
            self.pending = self.groups.next()?.into_matches().into_iter();
        }
    }
}

/// One-shot search returning fully materialized matches
pub fn search_entities<'e>(
    text: &str,
    entities: &'e [Entity],
    options: SearchOptions,
) -> Result<Vec<EntityMatch<'e>>> {
    let searcher = EntitySearcher::new(options)?;
    let matches = searcher.search(text, entities).collect();
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(id: i64, name: &str, abbreviation: &str) -> Entity {
        Entity::new(id, name)
            .with_alias(Alias::new(name).with_language("en"))
            .with_alias(Alias::abbreviation(abbreviation).with_language("en"))
    }

    #[test]
    fn test_empty_text() {
        let entities = vec![state(1, "Texas", "TX")];
        assert!(search_entities("", &entities, SearchOptions::default()).unwrap().is_empty());
        assert!(search_entities("   \n", &entities, SearchOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn test_entity_without_aliases() {
        let entities = vec![Entity::new(1, "Texas")];
        assert!(search_entities("Texas is big", &entities, SearchOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn test_offsets_point_at_alias_words() {
        let entities = vec![state(1, "Texas", "TX")];
        let searcher = EntitySearcher::with_default_options().unwrap();
        let text = "We drove to Texas, then left.";
        let matches: Vec<_> = searcher.search(text, &entities).collect();

        assert_eq!(matches.len(), 1);
        let normalized = lowercase_aligned(&searcher.normalizer().normalize(text, false));
        assert_eq!(&normalized[matches[0].start..matches[0].end], "texas");
        assert_eq!(matches[0].text, "texas");
    }

    #[test]
    fn test_source_offsets_locate_match_in_input() {
        let entities = vec![
            state(1, "Texas", "TX"),
            Entity::new(2, "Supreme Court of Texas").with_alias(Alias::new("Supreme Court of Texas")),
        ];
        let text = "Hello,  Texas!\n\tThe  Supreme Court\nof Texas (TX).";
        let matches = search_entities(text, &entities, SearchOptions::default()).unwrap();

        let located: Vec<&str> = matches.iter().map(|m| &text[m.source_start..m.source_end]).collect();
        assert_eq!(located, vec!["Texas", "Supreme Court\nof Texas", "TX"]);
    }

    #[test]
    fn test_stemmed_search_ignores_case() {
        let entities = vec![Entity::new(1, "Table").with_alias(Alias::new("Table"))];
        let options = SearchOptions::default().with_stemmer(true);
        let searcher = EntitySearcher::new(options).unwrap();

        for text in ["We saw several tables", "WE SAW SEVERAL TABLES", "We Saw Several Tables"] {
            let matches: Vec<_> = searcher.search(text, &entities).collect();
            assert_eq!(matches.len(), 1, "no match in {text:?}");
            assert_eq!(&text[matches[0].source_start..matches[0].source_end].to_lowercase(), "tables");
            assert_eq!(matches[0].text, "table");
        }
    }

    #[test]
    fn test_stemmed_abbreviation_offsets_follow_lowered_text() {
        let entities = vec![
            Entity::new(1, "Tables Inc").with_alias(Alias::abbreviation("TABLES")),
            Entity::new(2, "Oregon").with_alias(Alias::new("Oregon")),
        ];
        let options = SearchOptions::default().with_stemmer(true);
        let text = "the TABLES filing in Oregon";
        let matches = search_entities(text, &entities, options).unwrap();

        let lowered = normalize_text(text, true, true);
        assert_eq!(lowered, " the table filing in oregon ");
        assert_eq!(matches.len(), 2);
        assert_eq!(&lowered[matches[0].start..matches[0].end], "table");
        assert_eq!(&text[matches[0].source_start..matches[0].source_end], "TABLES");
        assert_eq!(&lowered[matches[1].start..matches[1].end], "oregon");
    }

    #[test]
    fn test_repeated_alias_found_each_time() {
        let entities = vec![state(1, "Texas", "TX")];
        let matches = search_entities("Texas Texas texas", &entities, SearchOptions::default()).unwrap();
        let starts: Vec<usize> = matches.iter().map(|m| m.start).collect();
        assert_eq!(starts, vec![1, 7, 13]);
    }

    #[test]
    fn test_abbreviation_case_sensitive() {
        let entities = vec![state(1, "Texas", "TX")];
        let matches = search_entities("shipped tx to the TX office", &entities, SearchOptions::default()).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "TX");
        assert!(matches[0].alias.is_abbreviation);
    }

    #[test]
    fn test_uppercase_context_window() {
        let entities = vec![state(1, "Oregon", "OR")];
        // inside an uppercase header
        let header = "NOTICE OF APPEAL OR MOTION";
        assert!(search_entities(header, &entities, SearchOptions::default()).unwrap().is_empty());

        // a narrow window only looks at the neighbouring words
        let options = SearchOptions::default().with_abbreviation_context(3);
        assert_eq!(search_entities("see the court in OR today", &entities, options.clone()).unwrap().len(), 1);
        assert!(search_entities(header, &entities, options).unwrap().is_empty());
    }

    #[test]
    fn test_groups_and_matches_agree() {
        let entities = vec![
            Entity::new(1, "Mississippi").with_alias(Alias::abbreviation("MS")),
            Entity::new(2, "Montserrat").with_alias(Alias::abbreviation("MS")),
        ];
        let searcher = EntitySearcher::with_default_options().unwrap();
        let text = "MS here could mean Mississippi or Montserrat";

        let groups: Vec<_> = searcher.search_groups(text, &entities).collect();
        assert_eq!(groups.len(), 1);
        assert!(groups[0].is_tie());

        let matches: Vec<_> = searcher.search(text, &entities).collect();
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.start == groups[0].start && m.end == groups[0].end));
    }

    #[test]
    fn test_empty_resolver_output_drops_position() {
        let entities = vec![
            Entity::new(1, "Mississippi").with_alias(Alias::abbreviation("MS")),
            Entity::new(2, "Montserrat").with_alias(Alias::abbreviation("MS")),
            Entity::new(3, "Texas").with_alias(Alias::new("Texas")),
        ];
        let drop_all = resolver_fn(|_| Vec::new());
        let searcher = EntitySearcher::new(SearchOptions::default().with_conflict_resolver(drop_all)).unwrap();

        let matches: Vec<_> = searcher.search("MS and Texas agree", &entities).collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].entity.id, 3);
    }

    #[test]
    fn test_searcher_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EntitySearcher>();
    }
}
