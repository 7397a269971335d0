//! Memoized seed/candidate content similarity

use crate::keywords::keyword_set;
use crate::types::PaperEntry;
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Jaccard similarity of two token sets. An empty union yields 0.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Content similarity of two papers over `title + " " + abstract`
pub fn content_similarity(seed: &PaperEntry, candidate: &PaperEntry) -> f64 {
    jaccard(&keyword_set(&candidate.content()), &keyword_set(&seed.content()))
}

/// Fingerprint of the text a similarity is computed from
pub fn text_fingerprint(entry: &PaperEntry) -> u64 {
    let mut hasher = DefaultHasher::new();
    entry.title.hash(&mut hasher);
    entry.abstract_text.hash(&mut hasher);
    hasher.finish()
}

#[derive(Debug, Clone, Copy)]
struct CachedSim {
    seed_text: u64,
    candidate_text: u64,
    sim: f64,
}

#[derive(Debug, Default)]
struct CacheInner {
    // seed doi -> candidate doi -> similarity
    sims: HashMap<String, HashMap<String, CachedSim>>,
    computations: usize,
}

/// Similarity cache keyed by (seed doi, candidate doi).
///
/// Each value remembers the text fingerprints of both papers; an entry whose
/// fingerprints no longer match the papers being compared is a miss.
///
/// Cloning yields another handle to the same cache, so every snapshot of a
/// ranking session shares it. Access is serialized by a mutex.
#[derive(Debug, Clone, Default)]
pub struct SimilarityCache {
    inner: Arc<Mutex<CacheInner>>,
}

impl SimilarityCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached similarity, computing and storing it on a miss
    pub fn get_or_compute(&self, seed: &PaperEntry, candidate: &PaperEntry) -> f64 {
        let seed_text = text_fingerprint(seed);
        let candidate_text = text_fingerprint(candidate);

        let mut inner = self.lock();
        let cached = inner.sims.get(&seed.doi).and_then(|row| row.get(&candidate.doi));
        match cached {
            Some(c) if c.seed_text == seed_text && c.candidate_text == candidate_text => {
                return c.sim;
            }
            Some(_) => debug!(
                "Stale similarity for ({}, {}), recomputing",
                seed.doi, candidate.doi
            ),
            None => {}
        }

        let sim = content_similarity(seed, candidate);
        inner.computations += 1;
        inner.sims.entry(seed.doi.clone()).or_default().insert(
            candidate.doi.clone(),
            CachedSim {
                seed_text,
                candidate_text,
                sim,
            },
        );
        sim
    }

    pub fn get(&self, seed_doi: &str, candidate_doi: &str) -> Option<f64> {
        self.lock()
            .sims
            .get(seed_doi)
            .and_then(|row| row.get(candidate_doi))
            .map(|c| c.sim)
    }

    /// Drop every entry where `paper_id` is the seed or the candidate
    pub fn invalidate_for(&self, paper_id: &str) {
        let mut inner = self.lock();
        let mut removed = inner.sims.remove(paper_id).map_or(0, |row| row.len());
        for row in inner.sims.values_mut() {
            if row.remove(paper_id).is_some() {
                removed += 1;
            }
        }
        inner.sims.retain(|_, row| !row.is_empty());
        if removed > 0 {
            debug!("Invalidated {} cached similarities for {}", removed, paper_id);
        }
    }

    pub fn clear(&self) {
        self.lock().sims.clear();
    }

    /// Number of cached pairs
    pub fn len(&self) -> usize {
        self.lock().sims.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total Jaccard evaluations performed by this cache
    pub fn computations(&self) -> usize {
        self.lock().computations
    }
}
