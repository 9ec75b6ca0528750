//! Resource synonyms
//!
//! Permissions may be declared under a canonical resource name while nested
//! operations refer to the same resource through a relation field
//! (`notes` for `note`, `author` for `user`). The table maps each canonical
//! name to its aliases; lookups go the other way, alias to canonical.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// An alias claimed by more than one canonical name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymConflict {
    pub alias: String,

    /// Canonical name the alias resolves to
    pub kept: String,

    /// Canonical name whose claim was ignored
    pub ignored: String,
}

/// Canonical name to alias list, with a reverse index built at construction
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    entries: Vec<(String, Vec<String>)>,
    reverse: HashMap<String, String>,
    conflicts: Vec<SynonymConflict>,
}

impl SynonymTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a canonical name with its aliases.
    ///
    /// An alias already claimed by an earlier canonical name keeps its first
    /// owner; the later claim is recorded as a conflict.
    pub fn with(mut self, canonical: impl Into<String>, aliases: Vec<String>) -> Self {
        self.insert(canonical.into(), aliases);
        self
    }

    fn insert(&mut self, canonical: String, aliases: Vec<String>) {
        for alias in &aliases {
            match self.reverse.get(alias) {
                Some(kept) if kept != &canonical => {
                    warn!(
                        "Synonym '{}' listed under both '{}' and '{}'; resolving to '{}'",
                        alias, kept, canonical, kept
                    );
                    self.conflicts.push(SynonymConflict {
                        alias: alias.clone(),
                        kept: kept.clone(),
                        ignored: canonical.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    self.reverse.insert(alias.clone(), canonical.clone());
                }
            }
        }
        self.entries.push((canonical, aliases));
    }

    /// Resolve a resource name to its canonical form.
    ///
    /// Absent and empty names are returned unchanged, as is any name that is
    /// not listed as an alias.
    pub fn resolve<'a>(&'a self, resource: Option<&'a str>) -> Option<&'a str> {
        match resource {
            Some(name) if !name.is_empty() => Some(
                self.reverse
                    .get(name)
                    .map(String::as_str)
                    .unwrap_or(name),
            ),
            other => other,
        }
    }

    /// Aliases declared for a canonical name
    pub fn aliases_of(&self, canonical: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == canonical)
            .map(|(_, aliases)| aliases.as_slice())
    }

    /// Aliases that were claimed by more than one canonical name
    pub fn conflicts(&self) -> &[SynonymConflict] {
        &self.conflicts
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C, A> FromIterator<(C, A)> for SynonymTable
where
    C: Into<String>,
    A: IntoIterator,
    A::Item: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (C, A)>>(iter: I) -> Self {
        let mut table = SynonymTable::new();
        for (canonical, aliases) in iter {
            table.insert(canonical.into(), aliases.into_iter().map(Into::into).collect());
        }
        table
    }
}

/// Resolve `resource` against an optional table; no table means identity
pub fn resolve_alias<'a>(
    resource: Option<&'a str>,
    synonyms: Option<&'a SynonymTable>,
) -> Option<&'a str> {
    match synonyms {
        Some(table) => table.resolve(resource),
        None => resource,
    }
}
