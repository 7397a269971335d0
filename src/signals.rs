//! Raw per-paper signal computation

use crate::keywords::count_occurrences;
use crate::similarity::SimilarityCache;
use crate::types::PaperEntry;
use tracing::debug;

/// Which signal groups must be recomputed in a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignalUpdate {
    pub keywords: bool,
    pub seed_papers: bool,
}

impl SignalUpdate {
    pub const NONE: SignalUpdate = SignalUpdate { keywords: false, seed_papers: false };
    pub const ALL: SignalUpdate = SignalUpdate { keywords: true, seed_papers: true };
    pub const KEYWORDS: SignalUpdate = SignalUpdate { keywords: true, seed_papers: false };
    pub const SEED_PAPERS: SignalUpdate = SignalUpdate { keywords: false, seed_papers: true };
}

/// Occurrence count of each keyword in the paper's title and abstract
pub fn keyword_signal(entry: &PaperEntry, keywords: &[String]) -> Vec<f64> {
    let haystack = entry.keyword_haystack();
    keywords
        .iter()
        .map(|keyword| count_occurrences(&haystack, keyword) as f64)
        .collect()
}

pub fn seed_similarity_signal(
    entry: &PaperEntry,
    seed_papers: &[PaperEntry],
    cache: &SimilarityCache,
) -> Vec<f64> {
    seed_papers
        .iter()
        .map(|seed| cache.get_or_compute(seed, entry))
        .collect()
}

/// 1 for each seed that cites this paper
pub fn referenced_by_seed_signal(entry: &PaperEntry, seed_papers: &[PaperEntry]) -> Vec<f64> {
    indicator(seed_papers, &entry.referenced_by)
}

/// 1 for each seed this paper cites
pub fn references_seed_signal(entry: &PaperEntry, seed_papers: &[PaperEntry]) -> Vec<f64> {
    indicator(seed_papers, &entry.referencing)
}

fn indicator(seed_papers: &[PaperEntry], dois: &[String]) -> Vec<f64> {
    seed_papers
        .iter()
        .map(|seed| if dois.contains(&seed.doi) { 1.0 } else { 0.0 })
        .collect()
}

/// Refresh the raw signal vectors of every entry. Groups not selected by
/// `update` keep their previous raw values.
pub fn compute_signals(
    entries: &mut [PaperEntry],
    keywords: &[String],
    seed_papers: &[PaperEntry],
    cache: &SimilarityCache,
    update: SignalUpdate,
) {
    debug!(
        "Computing signals for {} papers (keywords={}, seed_papers={})",
        entries.len(),
        update.keywords,
        update.seed_papers
    );

    for entry in entries.iter_mut() {
        if update.keywords {
            entry.raw.keyword_sims = keyword_signal(entry, keywords);
        }
        if update.seed_papers {
            entry.raw.seed_paper_sims = seed_similarity_signal(entry, seed_papers, cache);
            entry.raw.referenced_by_seed_papers = referenced_by_seed_signal(entry, seed_papers);
            entry.raw.references_seed_papers = references_seed_signal(entry, seed_papers);
        }
    }
}
