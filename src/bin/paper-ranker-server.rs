//! paper-ranker HTTP server binary

use anyhow::Context;
use paper_ranker::corpus::parse_corpus;
use paper_ranker::server::run_server;
use paper_ranker::{RankingSession, ServerConfig};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let config = ServerConfig::load()?;
    info!("paper-ranker {}", env!("CARGO_PKG_VERSION"));

    let session = match config.corpus_path {
        Some(ref path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read corpus {}", path.display()))?;
            let records = parse_corpus(&json)
                .with_context(|| format!("failed to parse corpus {}", path.display()))?;
            info!("Loaded {} papers from {}", records.len(), path.display());
            RankingSession::with_corpus(records)?
        }
        None => {
            info!("No corpus configured; POST /corpus to load one");
            RankingSession::new()
        }
    };

    run_server(Arc::new(RwLock::new(session)), &config).await?;

    Ok(())
}
