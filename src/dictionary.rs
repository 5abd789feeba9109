// WHY: Caller-side loaders that build the in-memory dictionary and blacklist from JSON files
// Validation happens here, eagerly, so the search can stay infallible

use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

use crate::blacklist::BlacklistItem;
use crate::entity::Entity;
use crate::error::{Error, Result};

/// Parse and validate a JSON array of entities
pub fn parse_entities(content: &str) -> Result<Vec<Entity>> {
    let entities: Vec<Entity> = serde_json::from_str(content)?;
    validate_entities(&entities)?;
    Ok(entities)
}

/// Load and validate a JSON entity dictionary
///
/// # Example
/// ```no_run
/// use lexmatch::dictionary::load_entities;
/// let entities = load_entities("dictionaries/us_states.json").expect("Failed to load dictionary");
/// ```
pub fn load_entities<P: AsRef<Path>>(path: P) -> Result<Vec<Entity>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let entities = parse_entities(&content)?;
    debug!("Loaded {} entities from {}", entities.len(), path.display());
    Ok(entities)
}

/// Check every entity and reject duplicate ids
pub fn validate_entities(entities: &[Entity]) -> Result<()> {
    let mut seen = HashSet::with_capacity(entities.len());
    for entity in entities {
        entity.validate()?;
        if !seen.insert(entity.id) {
            return Err(Error::invalid_entity(entity.id, "duplicate id"));
        }
    }
    Ok(())
}

/// Parse a JSON array of `{ "text", "language", "is_abbreviation" }` records
pub fn parse_blacklist(content: &str) -> Result<Vec<BlacklistItem>> {
    Ok(serde_json::from_str(content)?)
}

pub fn load_blacklist<P: AsRef<Path>>(path: P) -> Result<Vec<BlacklistItem>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let items = parse_blacklist(&content)?;
    debug!("Loaded {} blacklist entries from {}", items.len(), path.display());
    Ok(items)
}
