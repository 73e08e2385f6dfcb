use serde::{Deserialize, Serialize};

/// Tunables for the identification engine.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    /// Labels processed per identification, in arrival order.
    pub max_labels: usize,
    pub max_terms_per_label: usize,
    /// Raw rows kept per search term.
    pub per_term_result_cap: usize,
    /// Shorter terms are never sent to the catalog.
    pub min_term_len: usize,
    pub query_timeout_ms: u64,
    pub max_concurrent_queries: usize,
    /// 0 disables the search cache.
    pub search_cache_capacity: usize,
    pub recent_results_cap: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_labels: 8,
            max_terms_per_label: 8,
            per_term_result_cap: 40,
            min_term_len: 3,
            query_timeout_ms: 2000,
            max_concurrent_queries: 8,
            search_cache_capacity: 256,
            recent_results_cap: 10,
        }
    }
}

impl EngineSettings {
    /// Clamp values that would stall or disable the engine.
    pub fn sanitized(mut self) -> Self {
        self.max_labels = self.max_labels.max(1);
        self.max_terms_per_label = self.max_terms_per_label.max(1);
        self.per_term_result_cap = self.per_term_result_cap.max(1);
        self.min_term_len = self.min_term_len.max(1);
        self.query_timeout_ms = self.query_timeout_ms.max(1);
        self.max_concurrent_queries = self.max_concurrent_queries.max(1);
        self.recent_results_cap = self.recent_results_cap.max(1);
        self
    }
}
