//! Core type definitions for paper ranking

use serde::{Deserialize, Serialize};

/// Raw corpus record as supplied by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub doi: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    #[serde(default, alias = "authors")]
    pub author: Vec<String>,
    #[serde(default)]
    pub conference: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub referencing: Vec<String>,      // dois this paper cites
    #[serde(default, alias = "referencedBy")]
    pub referenced_by: Vec<String>,    // dois citing this paper
}

impl PaperRecord {
    /// Minimal record, mostly useful for tests and ad-hoc seeds
    pub fn new(
        doi: impl Into<String>,
        title: impl Into<String>,
        abstract_text: impl Into<String>,
        year: i32,
    ) -> Self {
        Self {
            doi: doi.into(),
            title: title.into(),
            abstract_text: abstract_text.into(),
            author: vec![],
            conference: String::new(),
            year,
            keywords: vec![],
            referencing: vec![],
            referenced_by: vec![],
        }
    }
}

/// Pre-normalization signal vectors. Kept apart from the published
/// (normalized) vectors so partial recomputation always starts from raw values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSignals {
    pub keyword_sims: Vec<f64>,
    pub seed_paper_sims: Vec<f64>,
    pub referenced_by_seed_papers: Vec<f64>,
    pub references_seed_papers: Vec<f64>,
}

/// One ranked corpus entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaperEntry {
    pub doi: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub author: Vec<String>,
    pub conference: String,
    pub year: i32,
    pub keywords: Vec<String>,
    pub referencing: Vec<String>,
    pub referenced_by: Vec<String>,

    pub num_referencing: usize,
    pub num_referenced: usize,

    // Computed by the engine (normalized)
    pub keyword_sims: Vec<f64>,
    pub seed_paper_sims: Vec<f64>,
    pub referenced_by_seed_papers: Vec<f64>,
    pub references_seed_papers: Vec<f64>,
    pub score: f64,

    #[serde(skip)]
    pub raw: RawSignals,
}

impl PaperEntry {
    pub fn from_record(record: PaperRecord) -> Self {
        Self {
            num_referencing: record.referencing.len(),
            num_referenced: record.referenced_by.len(),
            doi: record.doi,
            title: record.title,
            abstract_text: record.abstract_text,
            author: record.author,
            conference: record.conference,
            year: record.year,
            keywords: record.keywords,
            referencing: record.referencing,
            referenced_by: record.referenced_by,
            keyword_sims: vec![],
            seed_paper_sims: vec![],
            referenced_by_seed_papers: vec![],
            references_seed_papers: vec![],
            score: 0.0,
            raw: RawSignals::default(),
        }
    }

    /// Text compared between seed and candidate papers
    pub fn content(&self) -> String {
        format!("{} {}", self.title, self.abstract_text)
    }

    /// Text searched for user keywords (no separator between the fields)
    pub fn keyword_haystack(&self) -> String {
        format!("{}{}", self.title, self.abstract_text)
    }

    pub fn same_text(&self, other: &PaperEntry) -> bool {
        self.title == other.title && self.abstract_text == other.abstract_text
    }
}

/// How a seed paper is designated: by corpus identifier or as a full record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeedPaperRef {
    Doi(String),
    Record(PaperRecord),
}

impl From<&str> for SeedPaperRef {
    fn from(doi: &str) -> Self {
        SeedPaperRef::Doi(doi.to_string())
    }
}

impl From<String> for SeedPaperRef {
    fn from(doi: String) -> Self {
        SeedPaperRef::Doi(doi)
    }
}

impl From<PaperRecord> for SeedPaperRef {
    fn from(record: PaperRecord) -> Self {
        SeedPaperRef::Record(record)
    }
}

/// Keyword suggestion derived from seed paper text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
    pub is_selected: bool,
}

/// Per-group contribution to a paper's score
#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub doi: String,
    pub score: f64,
    pub keyword_similarity: f64,
    pub seed_paper_similarity: f64,
    pub referenced_by_seed_papers: f64,
    pub references_seed_papers: f64,
    pub reasons: Vec<String>,
}

/// Compact view of a state, returned after mutations and for history listings
#[derive(Debug, Clone, Serialize)]
pub struct StateSummary {
    pub papers: usize,
    pub keywords: Vec<String>,
    pub seed_papers: Vec<String>,
    pub marked_papers: Vec<String>,
    pub histories: usize,
    pub top: Vec<RankedPaper>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedPaper {
    pub doi: String,
    pub title: String,
    pub year: i32,
    pub score: f64,
}

impl From<&PaperEntry> for RankedPaper {
    fn from(entry: &PaperEntry) -> Self {
        Self {
            doi: entry.doi.clone(),
            title: entry.title.clone(),
            year: entry.year,
            score: entry.score,
        }
    }
}
