//! Skill normalization: maps raw skill tokens onto canonical keys.

use std::collections::{HashMap, HashSet};

use serde::{Serialize, Serializer};

use super::SkillDbError;

const DEFAULT_SYNONYMS: &str = include_str!("../../data/skill_synonyms.json");

/// Set of canonical skill strings. Iterates in insertion order and never
/// holds the same canonical form twice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an already-canonical skill. Returns false for duplicates.
    pub fn insert(&mut self, skill: String) -> bool {
        if skill.is_empty() || self.seen.contains(&skill) {
            return false;
        }
        self.seen.insert(skill.clone());
        self.items.push(skill);
        true
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.seen.contains(skill)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

impl Serialize for SkillSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

/// Synonym-table driven normalizer.
///
/// The table is JSON of the form `{ "canonical": ["alias", ...] }`.
#[derive(Debug, Clone)]
pub struct SkillNormalizer {
    alias_to_canonical: HashMap<String, String>,
}

impl SkillNormalizer {
    pub fn from_json(json: &str) -> Result<Self, SkillDbError> {
        let table: HashMap<String, Vec<String>> = serde_json::from_str(json)?;

        let mut alias_to_canonical = HashMap::new();
        for (canonical, aliases) in table {
            let canonical = clean(&canonical);
            if canonical.is_empty() {
                continue;
            }
            for alias in aliases {
                let alias = clean(&alias);
                if !alias.is_empty() {
                    alias_to_canonical.insert(alias, canonical.clone());
                }
            }
            alias_to_canonical.insert(canonical.clone(), canonical);
        }

        Ok(Self { alias_to_canonical })
    }

    /// Built-in table shipped with the crate.
    pub fn builtin() -> Result<Self, SkillDbError> {
        Self::from_json(DEFAULT_SYNONYMS)
    }

    /// Canonical form of one raw skill. Unmapped input comes back lowercased
    /// and trimmed.
    pub fn normalize(&self, raw: &str) -> String {
        let key = clean(raw);
        self.alias_to_canonical.get(&key).cloned().unwrap_or(key)
    }

    pub fn normalize_all<S: AsRef<str>>(&self, raw: &[S]) -> SkillSet {
        let mut set = SkillSet::new();
        for skill in raw {
            set.insert(self.normalize(skill.as_ref()));
        }
        set
    }

    /// Every alias and canonical key known to the table.
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.alias_to_canonical.keys().map(String::as_str)
    }
}

/// Lowercase, trim, and collapse inner whitespace.
fn clean(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
