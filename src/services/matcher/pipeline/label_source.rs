use std::path::PathBuf;

use async_trait::async_trait;

use crate::services::matcher::models::types::CandidateLabel;
use crate::types::errors::{EngineError, EngineResult};

/// Producer of candidate labels, typically a vision-labeling service.
#[async_trait]
pub trait LabelSource: Send + Sync {
    async fn fetch_labels(&self) -> EngineResult<Vec<CandidateLabel>>;
}

/// Labels already in hand.
#[derive(Debug, Clone, Default)]
pub struct StaticLabels(pub Vec<CandidateLabel>);

#[async_trait]
impl LabelSource for StaticLabels {
    async fn fetch_labels(&self) -> EngineResult<Vec<CandidateLabel>> {
        Ok(self.0.clone())
    }
}

/// Labels stored as JSON: either an array or `{"labels": [...]}`.
#[derive(Debug, Clone)]
pub struct JsonFileLabels {
    pub path: PathBuf,
}

impl JsonFileLabels {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

pub fn parse_labels(json: &str) -> EngineResult<Vec<CandidateLabel>> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum LabelsFile {
        Bare(Vec<CandidateLabel>),
        Wrapped { labels: Vec<CandidateLabel> },
    }

    let parsed: LabelsFile = serde_json::from_str(json)
        .map_err(|e| EngineError::InvalidInput(format!("malformed labels JSON: {e}")))?;
    Ok(match parsed {
        LabelsFile::Bare(labels) | LabelsFile::Wrapped { labels } => labels,
    })
}

#[async_trait]
impl LabelSource for JsonFileLabels {
    async fn fetch_labels(&self) -> EngineResult<Vec<CandidateLabel>> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            EngineError::CollaboratorUnavailable(format!("{}: {e}", self.path.display()))
        })?;
        parse_labels(&raw)
    }
}

#[cfg(test)]
#[path = "../tests/pipeline/label_source_tests.rs"]
mod tests;
