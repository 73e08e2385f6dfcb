//! `identify` orchestration.
//!
//! Labels are evaluated concurrently (expand, search, resolve variants, rank
//! entries, score). Cross-label comparison only starts once every label has
//! finished, after which the winner is categorized.

use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::Semaphore;

use crate::services::config::EngineSettings;
use crate::services::matcher::analysis::categorizer::{categorize, CategorizationInput};
use crate::services::matcher::analysis::scoring::{
    rank_candidates, rank_entries, score_candidate, RankingContext,
};
use crate::services::matcher::analysis::term_expander::{expand, expand_alternatives};
use crate::services::matcher::analysis::variant_resolver::resolve;
use crate::services::matcher::models::decision_log::{DecisionLog, DecisionRecord, Stage};
use crate::services::matcher::models::types::{
    clamp_confidence, CandidateLabel, CategorizationResult, ScoredCandidate, WasteIdentification,
};
use crate::services::matcher::pipeline::catalog_search::CatalogSearch;
use crate::services::matcher::pipeline::label_source::LabelSource;
use crate::services::matcher::state::cancel::CancelToken;
use crate::services::matcher::state::catalog_store::CatalogStore;
use crate::services::matcher::state::recent_results::{RecentIdentification, RecentResults};
use crate::services::matcher::state::tables::MatchTables;
use crate::types::errors::{EngineError, EngineResult};

/// Per-label result before the cross-label barrier.
struct LabelEvaluation {
    candidate: Option<ScoredCandidate>,
    queries_issued: usize,
    queries_failed: usize,
}

pub struct Identifier {
    store: Arc<dyn CatalogStore>,
    tables: Arc<MatchTables>,
    settings: EngineSettings,
    limiter: Arc<Semaphore>,
    recent: RecentResults,
}

impl Identifier {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        tables: Arc<MatchTables>,
        settings: EngineSettings,
    ) -> Self {
        let settings = settings.sanitized();
        Self {
            store,
            tables,
            limiter: Arc::new(Semaphore::new(settings.max_concurrent_queries)),
            recent: RecentResults::new(settings.recent_results_cap),
            settings,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn tables(&self) -> &MatchTables {
        &self.tables
    }

    /// Most recent identifications first.
    pub fn recent_results(&self) -> Vec<RecentIdentification> {
        self.recent.list()
    }

    pub async fn identify(&self, labels: &[CandidateLabel]) -> WasteIdentification {
        self.identify_with_cancel(labels, &CancelToken::new()).await
    }

    /// Never fails: every error path degrades to the not-found result with
    /// the reason recorded in its decision log.
    pub async fn identify_with_cancel(
        &self,
        labels: &[CandidateLabel],
        cancel: &CancelToken,
    ) -> WasteIdentification {
        let log = DecisionLog::new();
        match self.run(labels, cancel, &log).await {
            Ok(mut result) => {
                result.decision_log = log.render();
                if !result.is_not_found() {
                    self.recent.push(result.clone());
                }
                result
            }
            Err(e) => Self::degrade(e, &log),
        }
    }

    /// Fetch labels from a collaborator, then identify.
    pub async fn identify_from_source<L>(&self, source: &L, cancel: &CancelToken) -> WasteIdentification
    where
        L: LabelSource + ?Sized,
    {
        match source.fetch_labels().await {
            Ok(labels) => self.identify_with_cancel(&labels, cancel).await,
            Err(e) => {
                let log = DecisionLog::new();
                log.push(Stage::Input, "Label source failed");
                let e = if matches!(e, EngineError::CollaboratorUnavailable(_)) {
                    e
                } else {
                    EngineError::CollaboratorUnavailable(e.to_string())
                };
                Self::degrade(e, &log)
            }
        }
    }

    /// Synchronous entry point.
    ///
    /// Inside a multi-threaded runtime the current worker is handed over with
    /// `block_in_place`; without a runtime a current-thread one is built.
    /// Blocking is impossible on a current-thread runtime, so that case, like
    /// a failure to build a runtime, degrades to the not-found result.
    pub fn identify_blocking(&self, labels: &[CandidateLabel]) -> WasteIdentification {
        use tokio::runtime::{Handle, RuntimeFlavor};

        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(self.identify(labels)))
            }
            Ok(_) => Self::degrade(
                EngineError::Internal(
                    "identify_blocking cannot run on a current-thread runtime".to_string(),
                ),
                &DecisionLog::new(),
            ),
            Err(_) => match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime.block_on(self.identify(labels)),
                Err(e) => Self::degrade(e.into(), &DecisionLog::new()),
            },
        }
    }

    fn degrade(error: EngineError, log: &DecisionLog) -> WasteIdentification {
        match &error {
            EngineError::Cancelled => log::info!("[Identify] {error}"),
            EngineError::CollaboratorUnavailable(_) => log::error!("[Identify] {error}"),
            _ => log::warn!("[Identify] {error}"),
        }
        log.record(
            DecisionRecord::new(Stage::Outcome, "Returning not-found result")
                .with("reason", &error),
        );
        WasteIdentification::not_found(log.render())
    }

    /// Keep usable labels in arrival order, clamped and trimmed.
    ///
    /// The `max_labels` cap counts raw arrival positions, blanks included.
    fn sanitize_labels(&self, labels: &[CandidateLabel], log: &DecisionLog) -> Vec<CandidateLabel> {
        let max = self.settings.max_labels;
        if labels.len() > max {
            log.push(
                Stage::Input,
                format!(
                    "Only the first {max} labels are processed; {} ignored",
                    labels.len() - max
                ),
            );
        }

        let mut kept = Vec::new();
        for (index, label) in labels.iter().enumerate().take(max) {
            let description = label.description.trim();
            if description.is_empty() {
                log.push(Stage::Input, format!("Label #{} has no description; skipped", index + 1));
                continue;
            }

            let confidence = clamp_confidence(label.confidence);
            if confidence != label.confidence {
                log.record(
                    DecisionRecord::new(Stage::Input, "Confidence clamped")
                        .with("label", description)
                        .with("from", label.confidence)
                        .with("to", confidence),
                );
            }
            kept.push(CandidateLabel::new(description, confidence, label.material_hint()));
        }
        kept
    }

    async fn run(
        &self,
        labels: &[CandidateLabel],
        cancel: &CancelToken,
        log: &DecisionLog,
    ) -> EngineResult<WasteIdentification> {
        let labels = self.sanitize_labels(labels, log);
        if labels.is_empty() {
            return Err(EngineError::InvalidInput("no usable labels".to_string()));
        }
        log.push(Stage::Input, format!("Processing {} label(s)", labels.len()));

        let search = CatalogSearch {
            store: self.store.as_ref(),
            settings: &self.settings,
            limiter: &self.limiter,
            cancel,
            log,
        };

        // Barrier: every label's searches complete before scores are compared.
        let evaluations = join_all(labels.iter().map(|label| self.evaluate_label(label, &search))).await;

        if cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }

        let issued: usize = evaluations.iter().map(|e| e.queries_issued).sum();
        let failed: usize = evaluations.iter().map(|e| e.queries_failed).sum();
        if issued > 0 && failed == issued {
            return Err(EngineError::CollaboratorUnavailable(format!(
                "catalog unavailable: all {issued} queries failed"
            )));
        }

        let mut candidates: Vec<ScoredCandidate> =
            evaluations.into_iter().filter_map(|e| e.candidate).collect();
        if candidates.is_empty() {
            log.push(Stage::Outcome, "No label matched any catalog entry");
            return Ok(WasteIdentification::not_found(Vec::new()));
        }

        rank_candidates(&mut candidates);
        let ranking = candidates
            .iter()
            .map(|c| format!("{}={:.3}", c.label.description, c.combined_score))
            .collect::<Vec<_>>()
            .join(", ");
        let Some(winner) = candidates.into_iter().next() else {
            return Err(EngineError::Internal("candidate list emptied".to_string()));
        };
        log.record(
            DecisionRecord::new(
                Stage::Scoring,
                format!("Winner: '{}' via label '{}'", winner.entry.name, winner.label.description),
            )
            .with("combined_score", format!("{:.3}", winner.combined_score))
            .with("ranking", ranking),
        );

        let categorization = categorize(
            &CategorizationInput {
                db_material: winner.entry.material.as_deref(),
                db_home: Some(winner.entry.home_category.as_str()),
                db_recycling: Some(winner.entry.recycling_category.as_str()),
                ai_material: winner.label.material_hint(),
                ai_description: &winner.label.description,
            },
            &self.tables,
        );
        log.record(
            DecisionRecord::new(
                Stage::Categorization,
                format!("Categories from {}", categorization.source),
            )
            .with("home", &categorization.home_category)
            .with("recycling", &categorization.recycling_category),
        );

        let description = describe(&winner, &categorization);
        log.push(Stage::Outcome, format!("Identified as '{}'", winner.entry.name));

        Ok(WasteIdentification {
            name: winner.entry.name,
            home_category: categorization.home_category,
            recycling_category: categorization.recycling_category,
            description,
            confidence: winner.label.confidence,
            decision_log: Vec::new(),
        })
    }

    async fn evaluate_label(&self, label: &CandidateLabel, search: &CatalogSearch<'_>) -> LabelEvaluation {
        let log = search.log;
        let hint = label.material_hint();
        let terms = expand(label, &self.tables);
        let primary_term = terms.first().cloned().unwrap_or_default();
        log.record(
            DecisionRecord::new(Stage::Expansion, format!("Label '{}'", label.description))
                .with("confidence", label.confidence)
                .with("terms", terms.join(", ")),
        );

        let mut outcome = search.search(&label.description, &terms, hint).await;

        if outcome.hits.is_empty() && !search.cancel.is_cancelled() {
            let alternatives: Vec<String> = expand_alternatives(label, &self.tables)
                .into_iter()
                .filter(|t| !terms.contains(t))
                .collect();
            // Primary and alternative terms share one per-label cap.
            let budget = self
                .settings
                .max_terms_per_label
                .saturating_sub(search.usable_terms(&terms).len());
            if !alternatives.is_empty() && budget == 0 {
                log.record(
                    DecisionRecord::new(
                        Stage::Expansion,
                        format!("No hits for '{}'; term limit reached", label.description),
                    )
                    .with("skipped", alternatives.join(", ")),
                );
            } else if !alternatives.is_empty() {
                log.record(
                    DecisionRecord::new(
                        Stage::Expansion,
                        format!("No hits for '{}'; trying alternative terms", label.description),
                    )
                    .with("terms", alternatives.join(", "))
                    .with("budget", budget),
                );
                outcome.merge(
                    search
                        .search_within(&label.description, &alternatives, hint, budget)
                        .await,
                );
            }
        }

        let mut evaluation = LabelEvaluation {
            candidate: None,
            queries_issued: outcome.queries_issued,
            queries_failed: outcome.queries_failed,
        };
        if outcome.hits.is_empty() {
            return evaluation;
        }

        let resolved = resolve(outcome.hits, hint, &self.tables, log);
        let ctx = RankingContext {
            primary_term: &primary_term,
            material_hint: hint,
            tables: &self.tables,
        };
        let Some((best, rank)) = rank_entries(resolved, &ctx).into_iter().next() else {
            return evaluation;
        };

        let candidate = score_candidate(label, best.entry, &primary_term, &self.tables);
        log.record(
            DecisionRecord::new(
                Stage::Scoring,
                format!("Best entry for '{}': '{}'", label.description, candidate.entry.name),
            )
            .with("id", candidate.entry.id)
            .with("matched", format!("{}:{}", best.match_field, best.match_term))
            .with("rank", rank)
            .with("quality", format!("{:.2}", candidate.db_match_quality))
            .with("score", format!("{:.3}", candidate.combined_score)),
        );
        evaluation.candidate = Some(candidate);
        evaluation
    }
}

/// Human-readable summary of the winning match.
fn describe(winner: &ScoredCandidate, categorization: &CategorizationResult) -> String {
    let mut parts = vec![format!(
        "Matched '{}' from label '{}' ({:.0}% confidence)",
        winner.entry.name,
        winner.label.description,
        winner.label.confidence * 100.0
    )];
    if let Some(variation) = winner.entry.variation.as_deref() {
        parts.push(format!("variation: {variation}"));
    }
    if let Some(material) = winner.entry.material.as_deref() {
        parts.push(format!("material: {material}"));
    }
    parts.push(format!(
        "{} / {} ({})",
        categorization.home_category, categorization.recycling_category, categorization.source
    ));
    parts.join("; ")
}

#[cfg(test)]
#[path = "../tests/pipeline/identify_tests.rs"]
mod tests;
