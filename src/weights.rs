//! User-tunable weight configuration

use crate::error::{RankingError, Result};
use crate::types::PaperEntry;
use serde::{Deserialize, Serialize};

/// One (subject, percentage) pair. Subject is the keyword text for the
/// keyword group and the seed paper doi for the seed groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightComponent {
    pub subject: String,
    pub weight: f64, // 0-100, applied as weight / 100
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightGroup {
    #[serde(default = "default_max_val")]
    pub max_val: f64,
    #[serde(default)]
    pub components: Vec<WeightComponent>,
}

fn default_max_val() -> f64 {
    1.0
}

impl Default for WeightGroup {
    fn default() -> Self {
        Self {
            max_val: default_max_val(),
            components: vec![],
        }
    }
}

impl WeightGroup {
    /// Components split evenly across `subjects`, `floor(100 / N)` each
    pub fn uniform<I, S>(subjects: I, max_val: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let subjects: Vec<String> = subjects.into_iter().map(Into::into).collect();
        let weight = if subjects.is_empty() {
            0.0
        } else {
            (100 / subjects.len()) as f64
        };
        Self {
            max_val,
            components: subjects
                .into_iter()
                .map(|subject| WeightComponent { subject, weight })
                .collect(),
        }
    }

    /// Component weights scaled to fractions, index-aligned with the active set
    pub fn fractions(&self) -> Vec<f64> {
        self.components.iter().map(|c| c.weight / 100.0).collect()
    }

    fn validate(&self, group: &'static str, active: &[&str]) -> Result<()> {
        if !self.max_val.is_finite() || self.max_val < 0.0 {
            return Err(RankingError::InvalidMaxVal { group, value: self.max_val });
        }
        if self.components.len() != active.len() {
            return Err(RankingError::WeightMismatch {
                group,
                expected: active.len(),
                actual: self.components.len(),
            });
        }
        for (index, (component, expected)) in self.components.iter().zip(active).enumerate() {
            if component.subject != *expected {
                return Err(RankingError::WeightSubjectMismatch {
                    group,
                    index,
                    expected: expected.to_string(),
                    actual: component.subject.clone(),
                });
            }
            if !component.weight.is_finite() || !(0.0..=100.0).contains(&component.weight) {
                return Err(RankingError::InvalidWeight {
                    group,
                    index,
                    weight: component.weight,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    #[serde(default)]
    pub keyword_similarity: WeightGroup,
    #[serde(default)]
    pub seed_paper_similarity: WeightGroup,
    #[serde(default)]
    pub referenced_by_seed_papers: WeightGroup,
    #[serde(default)]
    pub references_seed_papers: WeightGroup,
}

impl Weights {
    /// Keyword group reset to a uniform split (max_val back to 1)
    pub fn with_keywords(&self, keywords: &[String]) -> Self {
        Self {
            keyword_similarity: WeightGroup::uniform(keywords.iter().cloned(), default_max_val()),
            ..self.clone()
        }
    }

    /// Seed groups reset to a uniform split, keeping their max_val
    pub fn with_seed_papers(&self, seed_papers: &[PaperEntry]) -> Self {
        let dois = || seed_papers.iter().map(|p| p.doi.clone());
        Self {
            keyword_similarity: self.keyword_similarity.clone(),
            seed_paper_similarity: WeightGroup::uniform(dois(), self.seed_paper_similarity.max_val),
            referenced_by_seed_papers: WeightGroup::uniform(
                dois(),
                self.referenced_by_seed_papers.max_val,
            ),
            references_seed_papers: WeightGroup::uniform(
                dois(),
                self.references_seed_papers.max_val,
            ),
        }
    }

    /// Reject configurations whose components do not line up with the active sets
    pub fn validate(&self, keywords: &[String], seed_papers: &[PaperEntry]) -> Result<()> {
        let keywords: Vec<&str> = keywords.iter().map(String::as_str).collect();
        let seeds: Vec<&str> = seed_papers.iter().map(|p| p.doi.as_str()).collect();

        self.keyword_similarity.validate("keyword_similarity", &keywords)?;
        self.seed_paper_similarity.validate("seed_paper_similarity", &seeds)?;
        self.referenced_by_seed_papers.validate("referenced_by_seed_papers", &seeds)?;
        self.references_seed_papers.validate("references_seed_papers", &seeds)?;
        Ok(())
    }
}
