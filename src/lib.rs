//! paper-ranker - seed paper and keyword driven ranking of a paper corpus
//!
//! Ranks academic paper records against user-chosen seed papers and keywords:
//! - Keyword occurrence, seed content similarity and citation signals
//! - Memoized Jaccard similarity per (seed, candidate) pair
//! - Max-of-sums normalization and user-weighted aggregation
//! - Event-driven state with undo history

pub mod types;
pub mod error;
pub mod keywords;
pub mod similarity;
pub mod signals;
pub mod scoring;
pub mod ranking;
pub mod weights;
pub mod corpus;
pub mod engine;
pub mod config;
pub mod server;

pub use types::*;
pub use error::{RankingError, Result};
pub use engine::{apply, OverviewEvent, OverviewState, RankingSession};
pub use similarity::SimilarityCache;
pub use signals::SignalUpdate;
pub use weights::{WeightComponent, WeightGroup, Weights};
pub use config::ServerConfig;
