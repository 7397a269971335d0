//! Final ordering of scored papers

use crate::types::PaperEntry;
use std::cmp::Ordering;

/// Score descending, then year descending. Stable for full ties.
pub fn rank_papers(entries: &mut [PaperEntry]) {
    entries.sort_by(compare_ranked);
}

pub fn compare_ranked(a: &PaperEntry, b: &PaperEntry) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.year.cmp(&a.year))
}
