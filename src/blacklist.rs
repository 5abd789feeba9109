// WHY: Aliases that must never match (common words colliding with entity names), keyed by
// language with a wildcard entry; normalized exactly like the search normalizes aliases

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::entity_search::normalization::Normalizer;

/// One blacklist source record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistItem {
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub is_abbreviation: bool,
}

impl BlacklistItem {
    pub fn new(text: impl Into<String>, language: Option<&str>, is_abbreviation: bool) -> Self {
        Self {
            text: text.into(),
            language: language.map(str::to_string),
            is_abbreviation,
        }
    }
}

/// Normalized alias sets for one language key
#[derive(Debug, Clone, Default)]
pub struct BlacklistEntry {
    /// Lowercased normalized ordinary aliases
    pub aliases: HashSet<String>,
    /// Case-preserved normalized abbreviations
    pub abbreviations: HashSet<String>,
}

/// Language-keyed alias blacklist; the `None` key applies to every language
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    entries: HashMap<Option<String>, BlacklistEntry>,
}

impl Blacklist {
    /// Build from flat records, normalizing each alias the way the search does
    /// WHY: abbreviations keep case and ordinary aliases are lowercased; any other rule
    /// would make entries silently fail to match
    pub fn build<'a, I>(items: I, normalizer: &dyn Normalizer) -> Self
    where
        I: IntoIterator<Item = &'a BlacklistItem>,
    {
        let mut blacklist = Self::default();
        for item in items {
            let normalized = normalizer.normalize(&item.text, !item.is_abbreviation);
            let normalized = normalized.trim();
            if normalized.is_empty() {
                continue;
            }
            let entry = blacklist.entries.entry(item.language.clone()).or_default();
            if item.is_abbreviation {
                entry.abbreviations.insert(normalized.to_string());
            } else {
                entry.aliases.insert(normalized.to_string());
            }
        }
        blacklist
    }

    /// Check a normalized alias (padding spaces trimmed) against its language and the wildcard
    pub fn contains(&self, normalized_alias: &str, language: Option<&str>, is_abbreviation: bool) -> bool {
        let keys = [language.map(str::to_string), None];
        let keys = if language.is_none() { &keys[1..] } else { &keys[..] };

        keys.iter().any(|key| {
            self.entries.get(key).is_some_and(|entry| {
                if is_abbreviation {
                    entry.abbreviations.contains(normalized_alias)
                } else {
                    entry.aliases.contains(normalized_alias)
                }
            })
        })
    }

    pub fn entry(&self, language: Option<&str>) -> Option<&BlacklistEntry> {
        self.entries.get(&language.map(str::to_string))
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .values()
            .all(|entry| entry.aliases.is_empty() && entry.abbreviations.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity_search::normalization::WordNormalizer;

    fn sample() -> Blacklist {
        let items = vec![
            BlacklistItem::new("Will", Some("en"), false),
            BlacklistItem::new("OR", Some("en"), true),
            BlacklistItem::new("May", None, false),
            BlacklistItem::new("   ", None, false),
        ];
        Blacklist::build(&items, &WordNormalizer)
    }

    #[test]
    fn test_language_and_wildcard() {
        let blacklist = sample();

        assert!(blacklist.contains("will", Some("en"), false));
        assert!(!blacklist.contains("will", Some("de"), false));
        assert!(!blacklist.contains("will", None, false));

        // wildcard entry applies to every language
        assert!(blacklist.contains("may", Some("de"), false));
        assert!(blacklist.contains("may", None, false));
    }

    #[test]
    fn test_abbreviations_case_sensitive() {
        let blacklist = sample();

        assert!(blacklist.contains("OR", Some("en"), true));
        assert!(!blacklist.contains("or", Some("en"), true));
        // abbreviation entries do not blacklist ordinary aliases
        assert!(!blacklist.contains("OR", Some("en"), false));
    }

    #[test]
    fn test_blank_items_skipped() {
        let blacklist = sample();
        let wildcard = blacklist.entry(None).unwrap();
        assert_eq!(wildcard.aliases.len(), 1);
        assert!(!blacklist.is_empty());
        assert!(Blacklist::default().is_empty());
    }
}
