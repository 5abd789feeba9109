// WHY: Single error type for the library surface; the CLI wraps it with anyhow context

use thiserror::Error;

/// Result type for lexmatch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for lexmatch operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Entity failed eager validation (empty name, duplicate id).
    #[error("Invalid entity {id}: {reason}")]
    InvalidEntity { id: i64, reason: String },

    /// Alias failed eager validation (blank text).
    #[error("Invalid alias on entity {entity_id}: {reason}")]
    InvalidAlias { entity_id: i64, reason: String },

    /// Noise filter pattern failed to compile.
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex_automata::meta::BuildError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Dictionary or blacklist JSON could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Search configuration could not be parsed or is inconsistent.
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Create an invalid entity error.
    pub fn invalid_entity(id: i64, reason: impl Into<String>) -> Self {
        Error::InvalidEntity {
            id,
            reason: reason.into(),
        }
    }

    /// Create an invalid alias error.
    pub fn invalid_alias(entity_id: i64, reason: impl Into<String>) -> Self {
        Error::InvalidAlias {
            entity_id,
            reason: reason.into(),
        }
    }

    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::invalid_entity(7, "name is empty");
        assert_eq!(err.to_string(), "Invalid entity 7: name is empty");

        let err = Error::invalid_alias(3, "alias text is blank");
        assert_eq!(err.to_string(), "Invalid alias on entity 3: alias text is blank");

        let err = Error::config("unknown conflict policy 'random'");
        assert!(err.to_string().starts_with("Config error:"));
    }
}
