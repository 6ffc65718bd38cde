use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("cannot read pair list {path}: {source}")]
pub struct PairListError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Provides the symbols to analyze each cycle
#[async_trait]
pub trait PairSource: Send + Sync {
    async fn load_pairs(&self) -> Result<Vec<String>, PairListError>;
}

/// Pair list backed by a newline-delimited file, re-read on every call
#[derive(Debug, Clone)]
pub struct FilePairSource {
    path: PathBuf,
}

impl FilePairSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PairSource for FilePairSource {
    async fn load_pairs(&self) -> Result<Vec<String>, PairListError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| PairListError {
                path: self.path.clone(),
                source,
            })?;

        Ok(parse_pairs(&contents))
    }
}

/// One symbol per line; surrounding whitespace trimmed, blank lines skipped
pub fn parse_pairs(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fixed in-memory pair list
#[async_trait]
impl PairSource for Vec<String> {
    async fn load_pairs(&self) -> Result<Vec<String>, PairListError> {
        Ok(self.clone())
    }
}
