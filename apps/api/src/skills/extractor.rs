//! Skill extractor: finds known skills in free text and ranks career domains.

use std::collections::{BTreeMap, HashSet};

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use super::normalizer::{SkillNormalizer, SkillSet};
use super::SkillDbError;

const DEFAULT_SKILLS_DB: &str = include_str!("../../data/skills_database.json");

/// Number of domains reported by `identify_domains`.
const MAX_DOMAINS: usize = 3;

#[derive(Debug, Deserialize)]
struct DomainEntry {
    #[serde(default)]
    skills: Vec<String>,
}

/// A vocabulary term with its compiled whole-token pattern.
struct Term {
    pattern: Regex,
}

pub struct SkillExtractor {
    normalizer: SkillNormalizer,
    /// domain -> canonical skills, ordered by domain name
    domains: BTreeMap<String, SkillSet>,
    terms: Vec<Term>,
}

impl SkillExtractor {
    pub fn new(skills_db_json: &str, normalizer: SkillNormalizer) -> Result<Self, SkillDbError> {
        let raw: BTreeMap<String, DomainEntry> = serde_json::from_str(skills_db_json)?;

        let domains: BTreeMap<String, SkillSet> = raw
            .into_iter()
            .map(|(domain, entry)| (domain, normalizer.normalize_all(&entry.skills)))
            .collect();

        // Vocabulary = every database skill plus every synonym alias.
        let mut vocabulary: HashSet<String> = normalizer.vocabulary().map(String::from).collect();
        for skills in domains.values() {
            vocabulary.extend(skills.iter().cloned());
        }
        let mut vocabulary: Vec<String> = vocabulary.into_iter().collect();
        vocabulary.sort();

        let terms = vocabulary
            .iter()
            .map(|term| {
                let pattern = Regex::new(&format!(
                    r"(?i)(?:^|[^\w+#])({})(?:$|[^\w+#])",
                    regex::escape(term)
                ))?;
                Ok(Term { pattern })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        debug!(
            "Skill extractor ready: {} domains, {} vocabulary terms",
            domains.len(),
            terms.len()
        );

        Ok(Self {
            normalizer,
            domains,
            terms,
        })
    }

    /// Extractor over the built-in skills database and synonym table.
    pub fn builtin() -> Result<Self, SkillDbError> {
        Self::new(DEFAULT_SKILLS_DB, SkillNormalizer::builtin()?)
    }

    /// Loads the database and synonym table from disk, falling back to the
    /// built-in asset for whichever path is `None`.
    pub fn load(
        skills_db_path: Option<&str>,
        synonyms_path: Option<&str>,
    ) -> Result<Self, SkillDbError> {
        let normalizer = match synonyms_path {
            Some(path) => SkillNormalizer::from_json(&read_asset(path)?)?,
            None => SkillNormalizer::builtin()?,
        };
        match skills_db_path {
            Some(path) => Self::new(&read_asset(path)?, normalizer),
            None => Self::new(DEFAULT_SKILLS_DB, normalizer),
        }
    }

    pub fn normalizer(&self) -> &SkillNormalizer {
        &self.normalizer
    }

    /// Canonical skills mentioned in `text`, ordered by first occurrence.
    pub fn extract_skills(&self, text: &str) -> Vec<String> {
        let mut hits: Vec<(usize, String)> = self
            .terms
            .iter()
            .filter_map(|term| {
                term.pattern
                    .captures(text)
                    .and_then(|caps| caps.get(1))
                    .map(|m| (m.start(), self.normalizer.normalize(m.as_str())))
            })
            .collect();

        // Longer terms win ties at the same offset ("machine learning" over "machine").
        hits.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.len().cmp(&a.1.len())));

        let mut set = SkillSet::new();
        for (_, skill) in hits {
            set.insert(skill);
        }
        set.into_vec()
    }

    /// Top domains by overlap with `skills`. Ties go to the alphabetically
    /// first domain; domains with no overlap are omitted.
    pub fn identify_domains(&self, skills: &[String]) -> Vec<String> {
        let candidate = self.normalizer.normalize_all(skills);

        let mut scored: Vec<(&String, usize)> = self
            .domains
            .iter()
            .map(|(domain, domain_skills)| {
                let overlap = domain_skills.iter().filter(|s| candidate.contains(s)).count();
                (domain, overlap)
            })
            .filter(|(_, overlap)| *overlap > 0)
            .collect();

        // stable sort keeps BTreeMap name order within equal overlap
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored
            .into_iter()
            .take(MAX_DOMAINS)
            .map(|(domain, _)| domain.clone())
            .collect()
    }
}

fn read_asset(path: &str) -> Result<String, SkillDbError> {
    std::fs::read_to_string(path).map_err(|source| SkillDbError::Io {
        path: path.to_string(),
        source,
    })
}
