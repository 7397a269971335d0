//! Overview state and its event-driven transitions
//!
//! Every event produces a brand-new state from the previous one; nothing is
//! patched in place. The similarity cache is the only piece shared between
//! successive states (and their history snapshots).

use crate::corpus::dedup_records;
use crate::error::{RankingError, Result};
use crate::keywords::{suggest_keywords, DEFAULT_SUGGESTION_LIMIT};
use crate::ranking::rank_papers;
use crate::scoring::{explain_score, normalize_signals, score_entries};
use crate::signals::{compute_signals, SignalUpdate};
use crate::similarity::SimilarityCache;
use crate::types::*;
use crate::weights::Weights;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// User inputs that move the overview from one state to the next
#[derive(Debug, Clone)]
pub enum OverviewEvent {
    LoadCorpus(Vec<PaperRecord>),
    SetKeywords(Vec<String>),
    AddKeyword(String),
    RemoveKeyword(String),
    ToggleKeyword(String),
    SetSeedPapers(Vec<SeedPaperRef>),
    RemoveSeedPaper(String),
    SetWeights(Weights),
    SetMarkedPapers(Vec<String>),
    ClearHistories,
    SelectHistory(usize),
}

impl OverviewEvent {
    pub fn name(&self) -> &'static str {
        match self {
            OverviewEvent::LoadCorpus(_) => "load_corpus",
            OverviewEvent::SetKeywords(_) => "set_keywords",
            OverviewEvent::AddKeyword(_) => "add_keyword",
            OverviewEvent::RemoveKeyword(_) => "remove_keyword",
            OverviewEvent::ToggleKeyword(_) => "toggle_keyword",
            OverviewEvent::SetSeedPapers(_) => "set_seed_papers",
            OverviewEvent::RemoveSeedPaper(_) => "remove_seed_paper",
            OverviewEvent::SetWeights(_) => "set_weights",
            OverviewEvent::SetMarkedPapers(_) => "set_marked_papers",
            OverviewEvent::ClearHistories => "clear_histories",
            OverviewEvent::SelectHistory(_) => "select_history",
        }
    }
}

/// Complete ranking state: corpus in ranked order plus every user selection
#[derive(Debug, Clone, Default)]
pub struct OverviewState {
    pub(crate) paper_entries: Vec<PaperEntry>,
    pub(crate) keywords: Vec<String>,
    pub(crate) seed_papers: Vec<PaperEntry>,
    pub(crate) marked_papers: Vec<String>,
    pub(crate) weights: Weights,
    pub(crate) histories: Vec<Arc<OverviewState>>,
    pub(crate) cache: SimilarityCache,
}

impl OverviewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ranked corpus, best first
    pub fn paper_entries(&self) -> &[PaperEntry] {
        &self.paper_entries
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn seed_papers(&self) -> &[PaperEntry] {
        &self.seed_papers
    }

    pub fn marked_papers(&self) -> &[String] {
        &self.marked_papers
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Snapshots pushed by weight changes, oldest first
    pub fn histories(&self) -> &[Arc<OverviewState>] {
        &self.histories
    }

    pub fn cache(&self) -> &SimilarityCache {
        &self.cache
    }

    pub fn find(&self, doi: &str) -> Option<&PaperEntry> {
        self.paper_entries.iter().find(|e| e.doi == doi)
    }

    pub fn explain(&self, doi: &str) -> Result<ScoreBreakdown> {
        self.find(doi)
            .map(|entry| explain_score(entry, &self.weights))
            .ok_or_else(|| RankingError::UnknownPaper(doi.to_string()))
    }

    pub fn suggest_keywords(&self, limit: Option<usize>) -> Vec<WordCount> {
        suggest_keywords(
            &self.seed_papers,
            &self.keywords,
            limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT),
        )
    }

    pub fn summary(&self, top_n: usize) -> StateSummary {
        StateSummary {
            papers: self.paper_entries.len(),
            keywords: self.keywords.clone(),
            seed_papers: self.seed_papers.iter().map(|p| p.doi.clone()).collect(),
            marked_papers: self.marked_papers.clone(),
            histories: self.histories.len(),
            top: self.paper_entries.iter().take(top_n).map(RankedPaper::from).collect(),
        }
    }

    /// Recompute the requested signal groups, then normalize, score and rank
    fn refresh(&mut self, update: SignalUpdate) {
        let start = Instant::now();

        compute_signals(
            &mut self.paper_entries,
            &self.keywords,
            &self.seed_papers,
            &self.cache,
            update,
        );

        let seed_dois: HashSet<&str> = self.seed_papers.iter().map(|p| p.doi.as_str()).collect();
        normalize_signals(&mut self.paper_entries, &seed_dois);
        score_entries(&mut self.paper_entries, &self.weights);
        rank_papers(&mut self.paper_entries);

        debug!(
            "Ranking pass over {} papers took {}us ({} cached similarities)",
            self.paper_entries.len(),
            start.elapsed().as_micros(),
            self.cache.len()
        );
    }

    fn resolve_seed(&self, seed: SeedPaperRef) -> Result<PaperEntry> {
        match seed {
            SeedPaperRef::Doi(doi) => self
                .find(&doi)
                .cloned()
                .ok_or(RankingError::UnknownPaper(doi)),
            SeedPaperRef::Record(record) => Ok(PaperEntry::from_record(record)),
        }
    }

    fn with_keywords(&self, keywords: Vec<String>) -> OverviewState {
        let mut next = self.clone();
        next.weights = self.weights.with_keywords(&keywords);
        next.keywords = keywords;
        next.refresh(SignalUpdate::KEYWORDS);
        next
    }

    fn with_seed_papers(&self, seed_papers: Vec<PaperEntry>) -> OverviewState {
        // An ad-hoc seed record may reuse a doi with different text
        for seed in &seed_papers {
            let known = self
                .seed_papers
                .iter()
                .chain(self.paper_entries.iter())
                .find(|p| p.doi == seed.doi);
            if known.is_some_and(|p| !p.same_text(seed)) {
                self.cache.invalidate_for(&seed.doi);
            }
        }

        let mut next = self.clone();
        next.weights = self.weights.with_seed_papers(&seed_papers);
        next.seed_papers = seed_papers;
        next.refresh(SignalUpdate::SEED_PAPERS);
        next
    }

    fn with_records(&self, records: Vec<PaperRecord>) -> OverviewState {
        let entries: Vec<PaperEntry> = dedup_records(records)
            .into_iter()
            .map(PaperEntry::from_record)
            .collect();

        // Stale similarities: papers whose text changed or that left the corpus
        let incoming: HashMap<&str, &PaperEntry> =
            entries.iter().map(|e| (e.doi.as_str(), e)).collect();
        for old in &self.paper_entries {
            match incoming.get(old.doi.as_str()) {
                Some(new) if new.same_text(old) => {}
                _ => self.cache.invalidate_for(&old.doi),
            }
        }

        // Seeds follow their reloaded record; seeds absent from the corpus stay as given
        let seed_papers: Vec<PaperEntry> = self
            .seed_papers
            .iter()
            .map(|seed| match incoming.get(seed.doi.as_str()) {
                Some(entry) => (*entry).clone(),
                None => seed.clone(),
            })
            .collect();

        let mut next = self.clone();
        next.paper_entries = entries;
        next.seed_papers = seed_papers;
        next.refresh(SignalUpdate::ALL);
        next
    }
}

/// Apply one event, producing the next state. `state` is never modified;
/// on error the caller keeps its current state.
pub fn apply(state: &OverviewState, event: OverviewEvent) -> Result<OverviewState> {
    let name = event.name();

    let next = match event {
        OverviewEvent::LoadCorpus(records) => state.with_records(records),

        OverviewEvent::SetKeywords(keywords) => state.with_keywords(keywords),

        OverviewEvent::AddKeyword(keyword) => {
            if keyword.trim().is_empty() || state.keywords.contains(&keyword.to_lowercase()) {
                return Ok(state.clone());
            }
            let mut keywords = state.keywords.clone();
            keywords.push(keyword);
            state.with_keywords(keywords)
        }

        OverviewEvent::RemoveKeyword(keyword) => {
            let keywords = state.keywords.iter().filter(|k| **k != keyword).cloned().collect();
            state.with_keywords(keywords)
        }

        OverviewEvent::ToggleKeyword(keyword) => {
            let mut keywords = state.keywords.clone();
            if let Some(pos) = keywords.iter().position(|k| *k == keyword) {
                keywords.remove(pos);
            } else {
                keywords.push(keyword);
            }
            state.with_keywords(keywords)
        }

        OverviewEvent::SetSeedPapers(seeds) => {
            let seed_papers = seeds
                .into_iter()
                .map(|seed| state.resolve_seed(seed))
                .collect::<Result<Vec<_>>>()?;
            state.with_seed_papers(seed_papers)
        }

        OverviewEvent::RemoveSeedPaper(doi) => {
            let seed_papers = state.seed_papers.iter().filter(|p| p.doi != doi).cloned().collect();
            state.with_seed_papers(seed_papers)
        }

        OverviewEvent::SetWeights(weights) => {
            weights.validate(&state.keywords, &state.seed_papers)?;
            let mut next = state.clone();
            next.weights = weights;
            next.histories.push(Arc::new(state.clone()));
            next.refresh(SignalUpdate::NONE);
            next
        }

        OverviewEvent::SetMarkedPapers(dois) => {
            if let Some(unknown) = dois.iter().find(|doi| state.find(doi).is_none()) {
                return Err(RankingError::UnknownPaper(unknown.clone()));
            }
            let mut next = state.clone();
            next.marked_papers = dois;
            next
        }

        OverviewEvent::ClearHistories => {
            let mut next = state.clone();
            next.histories.clear();
            next
        }

        OverviewEvent::SelectHistory(index) => state
            .histories
            .get(index)
            .map(|snapshot| (**snapshot).clone())
            .ok_or(RankingError::HistoryOutOfRange {
                index,
                len: state.histories.len(),
            })?,
    };

    info!(
        "Applied {}: {} papers, {} keywords, {} seed papers, {} snapshots",
        name,
        next.paper_entries.len(),
        next.keywords.len(),
        next.seed_papers.len(),
        next.histories.len()
    );

    Ok(next)
}

/// Owner of the current overview state
#[derive(Debug, Default)]
pub struct RankingSession {
    state: OverviewState,
}

impl RankingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_corpus(records: Vec<PaperRecord>) -> Result<Self> {
        let mut session = Self::new();
        session.dispatch(OverviewEvent::LoadCorpus(records))?;
        Ok(session)
    }

    pub fn state(&self) -> &OverviewState {
        &self.state
    }

    /// Replace the current state with the result of `event`
    pub fn dispatch(&mut self, event: OverviewEvent) -> Result<&OverviewState> {
        self.state = apply(&self.state, event)?;
        Ok(&self.state)
    }

    pub fn load_corpus(&mut self, records: Vec<PaperRecord>) -> Result<&OverviewState> {
        self.dispatch(OverviewEvent::LoadCorpus(records))
    }

    pub fn set_keywords<S: Into<String>>(
        &mut self,
        keywords: impl IntoIterator<Item = S>,
    ) -> Result<&OverviewState> {
        self.dispatch(OverviewEvent::SetKeywords(keywords.into_iter().map(Into::into).collect()))
    }

    pub fn set_seed_papers<S: Into<SeedPaperRef>>(
        &mut self,
        seeds: impl IntoIterator<Item = S>,
    ) -> Result<&OverviewState> {
        self.dispatch(OverviewEvent::SetSeedPapers(seeds.into_iter().map(Into::into).collect()))
    }

    pub fn set_weights(&mut self, weights: Weights) -> Result<&OverviewState> {
        self.dispatch(OverviewEvent::SetWeights(weights))
    }

    pub fn select_history(&mut self, index: usize) -> Result<&OverviewState> {
        self.dispatch(OverviewEvent::SelectHistory(index))
    }
}
