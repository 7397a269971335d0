//! Signal normalization and weighted score aggregation

use crate::types::*;
use crate::weights::{WeightGroup, Weights};
use std::collections::HashSet;
use tracing::warn;

/// Largest row sum across the given vectors, 0 when there are none
pub fn max_of_sums<'a>(rows: impl Iterator<Item = &'a [f64]>) -> f64 {
    rows.map(|row| row.iter().sum::<f64>()).fold(0.0, f64::max)
}

fn normalize_channel(row: &[f64], max_sum: f64) -> Vec<f64> {
    row.iter()
        .map(|x| {
            if max_sum <= 0.0 {
                return 0.0;
            }
            let v = x / max_sum;
            if v.is_finite() { v } else { 0.0 }
        })
        .collect()
}

/// Max-of-sums scaling of each signal group. The divisor is taken over
/// non-seed papers only; every paper (seeds included) is divided by it.
pub fn normalize_signals(entries: &mut [PaperEntry], seed_dois: &HashSet<&str>) {
    let base: Vec<&PaperEntry> = entries
        .iter()
        .filter(|e| !seed_dois.contains(e.doi.as_str()))
        .collect();

    let kw_max = max_of_sums(base.iter().map(|e| e.raw.keyword_sims.as_slice()));
    let seed_max = max_of_sums(base.iter().map(|e| e.raw.seed_paper_sims.as_slice()));
    let cited_by_max =
        max_of_sums(base.iter().map(|e| e.raw.referenced_by_seed_papers.as_slice()));
    let cites_max = max_of_sums(base.iter().map(|e| e.raw.references_seed_papers.as_slice()));

    for entry in entries.iter_mut() {
        entry.keyword_sims = normalize_channel(&entry.raw.keyword_sims, kw_max);
        entry.seed_paper_sims = normalize_channel(&entry.raw.seed_paper_sims, seed_max);
        entry.referenced_by_seed_papers =
            normalize_channel(&entry.raw.referenced_by_seed_papers, cited_by_max);
        entry.references_seed_papers =
            normalize_channel(&entry.raw.references_seed_papers, cites_max);
    }
}

/// Dot product; both sides are index-aligned by weight validation
pub fn inner(values: &[f64], weights: &[f64]) -> f64 {
    values.iter().zip(weights.iter()).map(|(v, w)| v * w).sum()
}

fn group_contribution(values: &[f64], group: &WeightGroup) -> f64 {
    inner(values, &group.fractions()) * group.max_val
}

/// Weighted score from normalized signals
pub fn compute_score(entry: &PaperEntry, weights: &Weights) -> f64 {
    let score = group_contribution(&entry.keyword_sims, &weights.keyword_similarity)
        + group_contribution(&entry.seed_paper_sims, &weights.seed_paper_similarity)
        + group_contribution(&entry.references_seed_papers, &weights.references_seed_papers)
        + group_contribution(&entry.referenced_by_seed_papers, &weights.referenced_by_seed_papers);

    if score.is_finite() {
        score
    } else {
        warn!("Non-finite score for {}, scoring as 0", entry.doi);
        0.0
    }
}

pub fn score_entries(entries: &mut [PaperEntry], weights: &Weights) {
    for entry in entries.iter_mut() {
        entry.score = compute_score(entry, weights);
    }
}

/// Per-group contributions plus the subjects that drove them
pub fn explain_score(entry: &PaperEntry, weights: &Weights) -> ScoreBreakdown {
    let mut reasons = Vec::new();

    let groups = [
        ("keyword match", &entry.keyword_sims, &weights.keyword_similarity),
        ("similar to seed", &entry.seed_paper_sims, &weights.seed_paper_similarity),
        (
            "cited by seed",
            &entry.referenced_by_seed_papers,
            &weights.referenced_by_seed_papers,
        ),
        ("cites seed", &entry.references_seed_papers, &weights.references_seed_papers),
    ];
    for (label, values, group) in groups {
        push_reasons(&mut reasons, label, values, group);
    }

    reasons.push(format!("final score: {:.3}", entry.score));

    ScoreBreakdown {
        doi: entry.doi.clone(),
        score: entry.score,
        keyword_similarity: group_contribution(&entry.keyword_sims, &weights.keyword_similarity),
        seed_paper_similarity: group_contribution(
            &entry.seed_paper_sims,
            &weights.seed_paper_similarity,
        ),
        referenced_by_seed_papers: group_contribution(
            &entry.referenced_by_seed_papers,
            &weights.referenced_by_seed_papers,
        ),
        references_seed_papers: group_contribution(
            &entry.references_seed_papers,
            &weights.references_seed_papers,
        ),
        reasons,
    }
}

fn push_reasons(reasons: &mut Vec<String>, label: &str, values: &[f64], group: &WeightGroup) {
    for (value, component) in values.iter().zip(&group.components) {
        if *value > 0.0 {
            reasons.push(format!(
                "{} '{}': {:.2} (weight {}%)",
                label, component.subject, value, component.weight
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with(doi: &str, keyword_sims: Vec<f64>, seed_paper_sims: Vec<f64>) -> PaperEntry {
        let mut entry = PaperEntry::from_record(PaperRecord::new(doi, "", "", 2020));
        entry.raw.keyword_sims = keyword_sims;
        entry.raw.seed_paper_sims = seed_paper_sims;
        entry
    }

    #[test]
    fn test_max_of_sums_scaling() {
        let mut entries = vec![
            entry_with("a", vec![2.0, 2.0], vec![]),
            entry_with("b", vec![1.0, 0.0], vec![]),
        ];
        normalize_signals(&mut entries, &HashSet::new());

        assert_eq!(entries[0].keyword_sims, vec![0.5, 0.5]);
        assert_eq!(entries[1].keyword_sims, vec![0.25, 0.0]);
    }

    #[test]
    fn test_seed_excluded_from_base() {
        let mut entries = vec![
            entry_with("seed", vec![], vec![1.0]),
            entry_with("c", vec![], vec![0.5]),
        ];
        let seeds: HashSet<&str> = ["seed"].into_iter().collect();
        normalize_signals(&mut entries, &seeds);

        assert_eq!(entries[0].seed_paper_sims, vec![2.0]);
        assert_eq!(entries[1].seed_paper_sims, vec![1.0]);
    }

    #[test]
    fn test_zero_base_yields_zero() {
        let mut entries = vec![
            entry_with("a", vec![0.0], vec![]),
            entry_with("b", vec![0.0], vec![]),
        ];
        normalize_signals(&mut entries, &HashSet::new());
        assert!(entries.iter().all(|e| e.keyword_sims == vec![0.0]));
    }

    #[test]
    fn test_weights_align_by_index() {
        let keywords = vec!["graph".to_string(), "tree".to_string()];
        let mut weights = Weights::default().with_keywords(&keywords);
        weights.keyword_similarity.components[0].weight = 80.0;
        weights.keyword_similarity.components[1].weight = 20.0;
        weights.keyword_similarity.max_val = 2.0;

        let mut entry = entry_with("a", vec![], vec![]);
        entry.keyword_sims = vec![1.0, 0.0];

        let score = compute_score(&entry, &weights);
        assert!((score - 1.6).abs() < 1e-12);

        entry.keyword_sims = vec![0.0, 1.0];
        let score = compute_score(&entry, &weights);
        assert!((score - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_explain_score_lists_contributing_subjects() {
        let keywords = vec!["graph".to_string(), "tree".to_string()];
        let weights = Weights::default().with_keywords(&keywords);
        let mut entry = entry_with("a", vec![], vec![]);
        entry.keyword_sims = vec![1.0, 0.0];
        entry.score = compute_score(&entry, &weights);

        let breakdown = explain_score(&entry, &weights);

        assert!((breakdown.keyword_similarity - 0.5).abs() < 1e-12);
        assert_eq!(breakdown.seed_paper_similarity, 0.0);
        assert!(breakdown.reasons.iter().any(|r| r.contains("'graph'")));
        assert!(!breakdown.reasons.iter().any(|r| r.contains("'tree'")));
    }
}
