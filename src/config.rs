//! Server configuration from environment variables and command-line flags

use anyhow::{bail, Context, Result};
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8081;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub corpus_path: Option<PathBuf>, // JSON array of paper records
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            corpus_path: None,
        }
    }
}

impl ServerConfig {
    /// PAPER_RANKER_HOST / PAPER_RANKER_PORT / PAPER_RANKER_CORPUS, then
    /// `--port <n>` and `--corpus <path>` overrides from argv
    pub fn load() -> Result<Self> {
        Self::from_sources(|key| std::env::var(key).ok(), std::env::args().skip(1))
    }

    pub fn from_sources<F, I>(env: F, args: I) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();

        if let Some(host) = env("PAPER_RANKER_HOST") {
            config.host = host;
        }
        if let Some(port) = env("PAPER_RANKER_PORT") {
            config.port = port
                .parse()
                .with_context(|| format!("invalid PAPER_RANKER_PORT: {}", port))?;
        }
        config.corpus_path = env("PAPER_RANKER_CORPUS").map(PathBuf::from);

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--port" => {
                    let value = args.next().context("--port requires a value")?;
                    config.port = value
                        .parse()
                        .with_context(|| format!("invalid --port: {}", value))?;
                }
                "--corpus" => {
                    let value = args.next().context("--corpus requires a path")?;
                    config.corpus_path = Some(PathBuf::from(value));
                }
                other => bail!("unknown argument: {}", other),
            }
        }

        Ok(config)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
