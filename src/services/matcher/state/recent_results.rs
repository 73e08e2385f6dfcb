use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::matcher::models::types::WasteIdentification;

#[derive(Debug, Clone, Serialize)]
pub struct RecentIdentification {
    pub identified_at: DateTime<Utc>,
    pub result: WasteIdentification,
}

/// Bounded, most-recent-first list of identifications. Memory only.
#[derive(Debug)]
pub struct RecentResults {
    capacity: usize,
    items: Mutex<VecDeque<RecentIdentification>>,
}

impl RecentResults {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            items: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push(&self, result: WasteIdentification) {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.push_front(RecentIdentification {
            identified_at: Utc::now(),
            result,
        });
        items.truncate(self.capacity);
    }

    pub fn list(&self) -> Vec<RecentIdentification> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
#[path = "../tests/state/recent_results_tests.rs"]
mod tests;
