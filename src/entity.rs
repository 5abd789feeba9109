// WHY: Explicit named records for the dictionary; the search engine borrows them read-only
// so one dictionary can serve any number of concurrent searches

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One searchable text variant of an entity's name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Alias {
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub is_abbreviation: bool,
    #[serde(default)]
    pub id: Option<i64>,
}

impl Alias {
    /// Ordinary (case-insensitive) alias without a declared language
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: None,
            is_abbreviation: false,
            id: None,
        }
    }

    /// Case-sensitive abbreviation alias
    pub fn abbreviation(text: impl Into<String>) -> Self {
        Self {
            is_abbreviation: true,
            ..Self::new(text)
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

/// A uniquely identified named thing (court, geographic place, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub aliases: Vec<Alias>,
}

impl Entity {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            priority: 0,
            aliases: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_alias(mut self, alias: Alias) -> Self {
        self.aliases.push(alias);
        self
    }

    /// Eager precondition check for dictionary loaders
    /// WHY: the search itself silently skips blank aliases, so malformed input would otherwise go unnoticed
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_entity(self.id, "name is empty"));
        }
        for (index, alias) in self.aliases.iter().enumerate() {
            if alias.text.trim().is_empty() {
                return Err(Error::invalid_alias(
                    self.id,
                    format!("alias #{index} has blank text"),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let entity = Entity::new(1, "Mississippi")
            .with_priority(5)
            .with_alias(Alias::abbreviation("MS").with_language("en").with_id(10));

        assert_eq!(entity.priority, 5);
        assert_eq!(entity.aliases.len(), 1);
        let alias = &entity.aliases[0];
        assert!(alias.is_abbreviation);
        assert_eq!(alias.language.as_deref(), Some("en"));
        assert_eq!(alias.id, Some(10));
    }

    #[test]
    fn test_validate() {
        assert!(Entity::new(1, "Court").with_alias(Alias::new("court")).validate().is_ok());
        assert!(Entity::new(2, "  ").validate().is_err());

        let err = Entity::new(3, "Court")
            .with_alias(Alias::new("court"))
            .with_alias(Alias::new(" "))
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidAlias { entity_id: 3, .. }));
    }

    #[test]
    fn test_deserialize_defaults() {
        let entity: Entity = serde_json::from_str(
            r#"{"id": 4, "name": "Texas", "aliases": [{"text": "TX", "is_abbreviation": true}]}"#,
        )
        .unwrap();

        assert_eq!(entity.priority, 0);
        assert_eq!(entity.aliases[0].language, None);
        assert!(entity.aliases[0].is_abbreviation);
    }
}
