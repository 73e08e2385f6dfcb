//! Catalog Search stage.
//!
//! Every usable term is looked up in `name`, `synonyms` and `variation`.
//! Queries run concurrently under a shared semaphore, each bounded by a
//! timeout. `join_all` yields results in input order, so the merged hit list
//! does not depend on which query finishes first.

use std::collections::HashSet;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::Semaphore;

use crate::services::config::EngineSettings;
use crate::services::matcher::models::decision_log::{DecisionLog, DecisionRecord, Stage};
use crate::services::matcher::models::types::{CatalogEntry, MatchField, SearchHit, SEARCH_FIELDS};
use crate::services::matcher::state::cancel::CancelToken;
use crate::services::matcher::state::catalog_store::CatalogStore;
use crate::types::errors::{EngineError, EngineResult};

/// Hits of one search call plus query bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Deduplicated by entry id; first occurrence wins.
    pub hits: Vec<SearchHit>,
    pub queries_issued: usize,
    pub queries_failed: usize,
}

impl SearchOutcome {
    /// Append `other`, keeping id uniqueness.
    pub fn merge(&mut self, other: SearchOutcome) {
        let mut seen: HashSet<i64> = self.hits.iter().map(|h| h.entry.id).collect();
        self.hits
            .extend(other.hits.into_iter().filter(|h| seen.insert(h.entry.id)));
        self.queries_issued += other.queries_issued;
        self.queries_failed += other.queries_failed;
    }
}

enum QueryOutcome {
    Rows(Vec<CatalogEntry>),
    Failed,
    Skipped,
}

/// Borrowed view of everything one identification's searches share.
pub struct CatalogSearch<'a> {
    pub store: &'a dyn CatalogStore,
    pub settings: &'a EngineSettings,
    pub limiter: &'a Semaphore,
    pub cancel: &'a CancelToken,
    pub log: &'a DecisionLog,
}

impl CatalogSearch<'_> {
    /// Terms that will actually be sent to the catalog.
    pub fn usable_terms<'t>(&self, terms: &'t [String]) -> Vec<&'t str> {
        self.usable_terms_within(terms, self.settings.max_terms_per_label)
    }

    fn usable_terms_within<'t>(&self, terms: &'t [String], budget: usize) -> Vec<&'t str> {
        terms
            .iter()
            .map(|t| t.trim())
            .filter(|t| t.chars().count() >= self.settings.min_term_len)
            .take(budget.min(self.settings.max_terms_per_label))
            .collect()
    }

    /// Search all usable terms for one label.
    ///
    /// The material hint never widens the query; it is recorded for the audit
    /// trail and applied later by variant resolution and ranking.
    pub async fn search(
        &self,
        label: &str,
        terms: &[String],
        material_hint: Option<&str>,
    ) -> SearchOutcome {
        self.search_within(label, terms, material_hint, self.settings.max_terms_per_label)
            .await
    }

    /// Like [`search`](Self::search), but sends at most `budget` terms.
    pub async fn search_within(
        &self,
        label: &str,
        terms: &[String],
        material_hint: Option<&str>,
        budget: usize,
    ) -> SearchOutcome {
        let usable = self.usable_terms_within(terms, budget);
        let dropped = terms.len() - usable.len();
        let mut record = DecisionRecord::new(
            Stage::Search,
            format!("Searching catalog for '{label}' with {} term(s)", usable.len()),
        )
        .with("terms", usable.join(", "));
        if dropped > 0 {
            record = record.with("skipped", dropped);
        }
        if let Some(hint) = material_hint {
            record = record.with("material_hint", hint);
        }
        self.log.record(record);

        let per_term = join_all(usable.iter().map(|term| self.search_term(term))).await;

        let mut outcome = SearchOutcome::default();
        let mut seen: HashSet<i64> = HashSet::new();
        for (hits, issued, failed) in per_term {
            outcome.queries_issued += issued;
            outcome.queries_failed += failed;
            outcome
                .hits
                .extend(hits.into_iter().filter(|h| seen.insert(h.entry.id)));
        }

        if outcome.hits.is_empty() {
            self.log.push(Stage::Search, format!("No catalog entries found for '{label}'"));
        } else {
            self.log.record(
                DecisionRecord::new(
                    Stage::Search,
                    format!("Found {} catalog entries for '{label}'", outcome.hits.len()),
                )
                .with("failed_queries", outcome.queries_failed),
            );
        }
        outcome
    }

    /// One term across every search field. Returns (hits, issued, failed).
    async fn search_term(&self, term: &str) -> (Vec<SearchHit>, usize, usize) {
        let results = join_all(SEARCH_FIELDS.iter().map(|&field| self.run_query(field, term))).await;

        let mut hits = Vec::new();
        let mut issued = 0;
        let mut failed = 0;
        for (field, result) in SEARCH_FIELDS.iter().zip(results) {
            match result {
                QueryOutcome::Rows(rows) => {
                    issued += 1;
                    hits.extend(rows.into_iter().map(|entry| SearchHit {
                        entry,
                        match_field: *field,
                        match_term: term.to_string(),
                    }));
                }
                QueryOutcome::Failed => {
                    issued += 1;
                    failed += 1;
                }
                QueryOutcome::Skipped => {}
            }
        }
        hits.truncate(self.settings.per_term_result_cap);

        let mut record = DecisionRecord::new(Stage::Search, format!("Term '{term}'"))
            .with("hits", hits.len());
        if failed > 0 {
            record = record.with("failed_queries", failed);
        }
        self.log.record(record);

        (hits, issued, failed)
    }

    async fn run_query(&self, field: MatchField, term: &str) -> QueryOutcome {
        if self.cancel.is_cancelled() {
            return QueryOutcome::Skipped;
        }

        let _permit = match self.limiter.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                log::error!("[Search] Query limiter closed: {e}");
                return QueryOutcome::Failed;
            }
        };
        // Re-check after waiting for a permit.
        if self.cancel.is_cancelled() {
            return QueryOutcome::Skipped;
        }

        match self.bounded_query(field, term).await {
            Ok(rows) => QueryOutcome::Rows(rows),
            Err(e) => {
                log::warn!("[Search] {field} lookup for '{term}' failed: {e}");
                self.log.record(
                    DecisionRecord::new(Stage::Search, "Query failed; treated as no hits")
                        .with("field", field)
                        .with("term", term)
                        .with("error", &e),
                );
                QueryOutcome::Failed
            }
        }
    }

    async fn bounded_query(&self, field: MatchField, term: &str) -> EngineResult<Vec<CatalogEntry>> {
        let timeout_ms = self.settings.query_timeout_ms;
        let query = self
            .store
            .query_by_field(field, term, self.settings.per_term_result_cap);
        match tokio::time::timeout(Duration::from_millis(timeout_ms), query).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout(timeout_ms)),
        }
    }
}

#[cfg(test)]
#[path = "../tests/pipeline/catalog_search_tests.rs"]
mod tests;
