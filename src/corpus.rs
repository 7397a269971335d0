//! Lenient parsing of raw corpus documents

use crate::error::{RankingError, Result};
use crate::types::PaperRecord;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{info, warn};

/// Parse a JSON array of paper records. Elements that do not deserialize
/// or carry an empty doi are skipped rather than failing the whole corpus.
pub fn parse_corpus(json: &str) -> Result<Vec<PaperRecord>> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(RankingError::InvalidCorpus("expected a JSON array of papers".to_string()));
    };
    Ok(records_from_values(items))
}

pub fn records_from_values(items: Vec<Value>) -> Vec<PaperRecord> {
    let total = items.len();
    let mut records = Vec::with_capacity(total);

    for (idx, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<PaperRecord>(item) {
            Ok(record) if record.doi.trim().is_empty() => {
                warn!("Skipping corpus record {}: empty doi", idx);
            }
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("Skipping malformed corpus record {}: {}", idx, e);
            }
        }
    }

    if records.len() < total {
        info!("Parsed {}/{} corpus records", records.len(), total);
    }
    records
}

/// Drop records whose doi was already seen; the first occurrence wins
pub fn dedup_records(records: Vec<PaperRecord>) -> Vec<PaperRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| {
            let fresh = seen.insert(record.doi.clone());
            if !fresh {
                warn!("Duplicate doi in corpus, keeping first: {}", record.doi);
            }
            fresh
        })
        .collect()
}
