// WHY: File-based search defaults so batch runs are reproducible; CLI flags override these values

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::blacklist::BlacklistItem;
use crate::entity_search::{
    ConflictPolicy, SearchOptions, WhitespaceNormalizer, DEFAULT_ABBREVIATION_CONTEXT,
};
use crate::error::{Error, Result};

/// How text and aliases split into tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tokenization {
    /// Punctuation-aware word tokens
    #[default]
    Words,
    /// Split on whitespace only
    Whitespace,
}

/// Search configuration as read from TOML
///
/// ```toml
/// languages = ["en", "de"]
/// min_alias_length = 2
/// use_stemmer = false
/// abbreviation_context = 20
/// conflicts = "first-by-id"
/// tokenization = "words"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub languages: Option<Vec<String>>,
    pub min_alias_length: Option<usize>,
    pub use_stemmer: bool,
    pub abbreviation_context: usize,
    pub conflicts: ConflictPolicy,
    pub tokenization: Tokenization,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            languages: None,
            min_alias_length: None,
            use_stemmer: false,
            abbreviation_context: DEFAULT_ABBREVIATION_CONTEXT,
            conflicts: ConflictPolicy::default(),
            tokenization: Tokenization::default(),
        }
    }
}

impl SearchConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Build search options; the blacklist is normalized with the configured strategy
    pub fn to_options(&self, blacklist: Option<&[BlacklistItem]>) -> Result<SearchOptions> {
        if self.use_stemmer && self.tokenization == Tokenization::Whitespace {
            return Err(Error::config("use_stemmer requires word tokenization"));
        }

        let mut options = SearchOptions::default()
            .with_stemmer(self.use_stemmer)
            .with_abbreviation_context(self.abbreviation_context)
            .with_conflict_policy(self.conflicts);
        if self.tokenization == Tokenization::Whitespace {
            options = options.with_normalizer(WhitespaceNormalizer);
        }
        if let Some(languages) = &self.languages {
            options = options.with_languages(languages.iter().cloned());
        }
        if let Some(min) = self.min_alias_length {
            options = options.with_min_alias_length(min);
        }
        if let Some(items) = blacklist {
            options = options.with_blacklist_items(items);
        }
        Ok(options)
    }
}
