// WHY: Policy for homonyms - several entities matching identical alias text at an identical position

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entity::{Alias, Entity};
use crate::error::Error;

/// One (entity, alias) member of a tie group
pub type Candidate<'a> = (&'a Entity, &'a Alias);

/// Chooses among entities tied at one position
///
/// Contract: called with two or more candidates; must return a non-empty subset of them.
pub trait ConflictResolver: Send + Sync {
    fn resolve<'a>(&self, candidates: Vec<Candidate<'a>>) -> Vec<Candidate<'a>>;
}

/// Keep every tied entity
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepAll;

impl ConflictResolver for KeepAll {
    fn resolve<'a>(&self, candidates: Vec<Candidate<'a>>) -> Vec<Candidate<'a>> {
        candidates
    }
}

/// Keep the entity with the smallest id
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstById;

impl ConflictResolver for FirstById {
    fn resolve<'a>(&self, candidates: Vec<Candidate<'a>>) -> Vec<Candidate<'a>> {
        candidates
            .into_iter()
            .min_by_key(|(entity, _)| entity.id)
            .into_iter()
            .collect()
    }
}

/// Keep the entity with the largest priority; equal priorities fall back to the smallest id
#[derive(Debug, Clone, Copy, Default)]
pub struct TopByPriority;

impl ConflictResolver for TopByPriority {
    fn resolve<'a>(&self, candidates: Vec<Candidate<'a>>) -> Vec<Candidate<'a>> {
        candidates
            .into_iter()
            .max_by(|(a, _), (b, _)| a.priority.cmp(&b.priority).then(b.id.cmp(&a.id)))
            .into_iter()
            .collect()
    }
}

/// Coerce a closure into a resolver with the higher-ranked signature the engine needs
pub fn resolver_fn<F>(f: F) -> F
where
    F: for<'a> Fn(Vec<Candidate<'a>>) -> Vec<Candidate<'a>> + Send + Sync,
{
    f
}

impl<F> ConflictResolver for F
where
    F: for<'a> Fn(Vec<Candidate<'a>>) -> Vec<Candidate<'a>> + Send + Sync,
{
    fn resolve<'a>(&self, candidates: Vec<Candidate<'a>>) -> Vec<Candidate<'a>> {
        self(candidates)
    }
}

/// Named standard policies for config files and the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    #[default]
    KeepAll,
    FirstById,
    TopByPriority,
}

impl ConflictPolicy {
    pub fn resolver(self) -> std::sync::Arc<dyn ConflictResolver> {
        match self {
            ConflictPolicy::KeepAll => std::sync::Arc::new(KeepAll),
            ConflictPolicy::FirstById => std::sync::Arc::new(FirstById),
            ConflictPolicy::TopByPriority => std::sync::Arc::new(TopByPriority),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConflictPolicy::KeepAll => "keep-all",
            ConflictPolicy::FirstById => "first-by-id",
            ConflictPolicy::TopByPriority => "top-by-priority",
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConflictPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep-all" => Ok(ConflictPolicy::KeepAll),
            "first-by-id" => Ok(ConflictPolicy::FirstById),
            "top-by-priority" => Ok(ConflictPolicy::TopByPriority),
            other => Err(Error::config(format!("unknown conflict policy '{other}'"))),
        }
    }
}
