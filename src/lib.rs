pub mod batch;
pub mod blacklist;
pub mod config;
pub mod dictionary;
pub mod discovery;
pub mod entity;
pub mod entity_search;
pub mod error;
pub mod output;
pub mod reader;
pub mod stats;

// Re-export main types for convenient access
pub use blacklist::{Blacklist, BlacklistItem};
pub use config::{SearchConfig, Tokenization};
pub use entity::{Alias, Entity};
pub use entity_search::{
    search_entities, ConflictPolicy, ConflictResolver, EntityMatch, EntityMatches,
    EntitySearcher, FirstById, KeepAll, MatchGroup, MatchGroups, SearchOptions, TopByPriority,
};
pub use error::{Error, Result};
