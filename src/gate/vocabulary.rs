//! Controlled medical vocabulary used by the domain stages.
//!
//! Loaded once at startup from a JSON term list keyed by `symptoms`,
//! `bodyParts`, `severity` and `duration`, then shared read-only behind an
//! `Arc`. Sets are meant to be disjoint but overlap is tolerated.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::types::Category;

/// Term list bundled with the binary.
const BUNDLED_VOCABULARY: &str = include_str!("../../resources/medical_vocabulary.json");

#[derive(Error, Debug)]
pub enum VocabularyError {
    #[error("Cannot read vocabulary file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed vocabulary: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Vocabulary has no terms")]
    Empty,
}

/// On-disk shape of the term list.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct VocabularyFile {
    symptoms: Vec<String>,
    body_parts: Vec<String>,
    severity: Vec<String>,
    duration: Vec<String>,
}

/// Immutable term sets, one per category.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    symptoms: HashSet<String>,
    body_parts: HashSet<String>,
    severity: HashSet<String>,
    duration: HashSet<String>,
}

impl Vocabulary {
    /// The term list shipped with the crate.
    pub fn bundled() -> Result<Self, VocabularyError> {
        Self::from_json_str(BUNDLED_VOCABULARY)
    }

    /// Load a term list from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, VocabularyError> {
        let raw = std::fs::read_to_string(path).map_err(|source| VocabularyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, VocabularyError> {
        let file: VocabularyFile = serde_json::from_str(raw)?;
        let vocab = Self {
            symptoms: normalize_terms(Category::Symptom, file.symptoms),
            body_parts: normalize_terms(Category::BodyPart, file.body_parts),
            severity: normalize_terms(Category::Severity, file.severity),
            duration: normalize_terms(Category::Duration, file.duration),
        };
        if vocab.is_empty() {
            return Err(VocabularyError::Empty);
        }
        tracing::debug!(
            symptoms = vocab.symptoms.len(),
            body_parts = vocab.body_parts.len(),
            severity = vocab.severity.len(),
            duration = vocab.duration.len(),
            "Vocabulary loaded"
        );
        Ok(vocab)
    }

    /// Build directly from term lists. Terms are normalized like file input.
    pub fn from_terms<I, S>(category_terms: I) -> Self
    where
        I: IntoIterator<Item = (Category, Vec<S>)>,
        S: Into<String>,
    {
        let mut vocab = Self::default();
        for (category, terms) in category_terms {
            let set = normalize_terms(category, terms.into_iter().map(Into::into).collect());
            vocab.set_mut(category).extend(set);
        }
        vocab
    }

    pub fn terms(&self, category: Category) -> &HashSet<String> {
        match category {
            Category::Symptom => &self.symptoms,
            Category::BodyPart => &self.body_parts,
            Category::Severity => &self.severity,
            Category::Duration => &self.duration,
        }
    }

    fn set_mut(&mut self, category: Category) -> &mut HashSet<String> {
        match category {
            Category::Symptom => &mut self.symptoms,
            Category::BodyPart => &mut self.body_parts,
            Category::Severity => &mut self.severity,
            Category::Duration => &mut self.duration,
        }
    }

    /// Whether `token` belongs to `category`.
    pub fn belongs_to(&self, token: &str, category: Category) -> bool {
        self.terms(category).contains(token)
    }

    /// Whether `token` belongs to any category.
    pub fn contains(&self, token: &str) -> bool {
        Category::ALL.iter().any(|c| self.belongs_to(token, *c))
    }

    /// Total number of terms across all sets (overlaps counted per set).
    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.terms(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn normalize_terms(category: Category, terms: Vec<String>) -> HashSet<String> {
    terms
        .into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .inspect(|t| {
            if !t.bytes().all(|b| b.is_ascii_lowercase()) {
                tracing::warn!(
                    ?category,
                    term = %t,
                    "Vocabulary term can never match a single token"
                );
            }
        })
        .collect()
}
