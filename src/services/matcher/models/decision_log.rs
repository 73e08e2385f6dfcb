//! Append-only decision trail shared by every pipeline stage.
//!
//! Records stay structured (stage, message, data) until `render()` turns them into
//! the text lines shown on the final result.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Input,
    Expansion,
    Search,
    Variants,
    Scoring,
    Categorization,
    Outcome,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Input => write!(f, "Input"),
            Stage::Expansion => write!(f, "Expansion"),
            Stage::Search => write!(f, "Search"),
            Stage::Variants => write!(f, "Variants"),
            Stage::Scoring => write!(f, "Scoring"),
            Stage::Categorization => write!(f, "Categorization"),
            Stage::Outcome => write!(f, "Outcome"),
        }
    }
}

/// One decision point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub stage: Stage,
    pub message: String,
    #[serde(default)]
    pub data: Vec<(String, String)>,
}

impl DecisionRecord {
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
            data: Vec::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.data.push((key.to_string(), value.to_string()));
        self
    }

    pub fn render(&self) -> String {
        if self.data.is_empty() {
            return format!("[{}] {}", self.stage, self.message);
        }
        let data = self
            .data
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("[{}] {} ({})", self.stage, self.message, data)
    }
}

/// Lock-protected so concurrent label branches can append.
#[derive(Debug, Default)]
pub struct DecisionLog {
    records: Mutex<Vec<DecisionRecord>>,
}

impl DecisionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, record: DecisionRecord) {
        log::debug!("[Decision] {}", record.render());
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    pub fn push(&self, stage: Stage, message: impl Into<String>) {
        self.record(DecisionRecord::new(stage, message));
    }

    pub fn snapshot(&self) -> Vec<DecisionRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn render(&self) -> Vec<String> {
        self.snapshot().iter().map(DecisionRecord::render).collect()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "../tests/models/decision_log_tests.rs"]
mod tests;
