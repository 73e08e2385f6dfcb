use super::*;
use crate::test_utils::{sample_catalog, ScriptedStore};

fn terms(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

async fn run_search(
    store: &ScriptedStore,
    settings: &EngineSettings,
    cancel: &CancelToken,
    search_terms: &[String],
) -> (SearchOutcome, DecisionLog) {
    let limiter = Semaphore::new(settings.max_concurrent_queries);
    let log = DecisionLog::new();
    let outcome = CatalogSearch {
        store,
        settings,
        limiter: &limiter,
        cancel,
        log: &log,
    }
    .search("bag", search_terms, None)
    .await;
    (outcome, log)
}

#[test]
fn test_usable_terms_drops_short_and_caps_count() {
    let store = ScriptedStore::default();
    let settings = EngineSettings {
        max_terms_per_label: 2,
        ..EngineSettings::default()
    };
    let limiter = Semaphore::new(1);
    let cancel = CancelToken::new();
    let log = DecisionLog::new();
    let search = CatalogSearch {
        store: &store,
        settings: &settings,
        limiter: &limiter,
        cancel: &cancel,
        log: &log,
    };

    let input = terms(&["aa", "bag", "  ", "can", "jar"]);
    assert_eq!(search.usable_terms(&input), vec!["bag", "can"]);
}

#[tokio::test]
async fn test_hits_are_tagged_and_deduplicated_by_id() {
    let store = ScriptedStore::new(sample_catalog());
    let settings = EngineSettings::default();

    let (outcome, log) =
        run_search(&store, &settings, &CancelToken::new(), &terms(&["bag", "shopping"])).await;

    let ids: Vec<i64> = outcome.hits.iter().map(|h| h.entry.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(outcome.hits[0].match_field, MatchField::Name);
    assert_eq!(outcome.hits[0].match_term, "bag");
    // 2 terms x 3 fields
    assert_eq!(outcome.queries_issued, 6);
    assert_eq!(outcome.queries_failed, 0);
    assert!(log.render().iter().any(|l| l.contains("Found 2 catalog entries")));
}

#[tokio::test]
async fn test_per_term_cap_bounds_hits() {
    let store = ScriptedStore::new(sample_catalog());
    let settings = EngineSettings {
        per_term_result_cap: 1,
        ..EngineSettings::default()
    };

    let (outcome, _) = run_search(&store, &settings, &CancelToken::new(), &terms(&["bag"])).await;

    assert_eq!(outcome.hits.len(), 1);
    assert_eq!(outcome.hits[0].entry.id, 1);
}

#[tokio::test]
async fn test_failing_term_is_logged_and_others_continue() {
    let mut store = ScriptedStore::new(sample_catalog());
    store.failing = vec!["shopping"];
    let settings = EngineSettings::default();

    let (outcome, log) =
        run_search(&store, &settings, &CancelToken::new(), &terms(&["shopping", "bag"])).await;

    assert_eq!(outcome.queries_failed, 3);
    assert_eq!(outcome.queries_issued, 6);
    let ids: Vec<i64> = outcome.hits.iter().map(|h| h.entry.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert!(log
        .render()
        .iter()
        .any(|l| l.contains("Query failed") && l.contains("term=shopping")));
}

#[tokio::test]
async fn test_stalled_query_times_out_as_zero_hits() {
    let mut store = ScriptedStore::new(sample_catalog());
    store.stalled = vec!["carrier"];
    let settings = EngineSettings {
        query_timeout_ms: 20,
        ..EngineSettings::default()
    };

    let (outcome, log) =
        run_search(&store, &settings, &CancelToken::new(), &terms(&["carrier", "bag"])).await;

    assert_eq!(outcome.queries_failed, 3);
    assert_eq!(outcome.hits.len(), 2);
    assert!(log.render().iter().any(|l| l.contains("timed out after 20 ms")));
}

#[tokio::test]
async fn test_cancelled_search_issues_no_queries() {
    let store = ScriptedStore::new(sample_catalog());
    let settings = EngineSettings::default();
    let cancel = CancelToken::new();
    cancel.cancel();

    let (outcome, log) = run_search(&store, &settings, &cancel, &terms(&["bag"])).await;

    assert!(outcome.hits.is_empty());
    assert_eq!(outcome.queries_issued, 0);
    assert_eq!(store.calls(), 0);
    assert!(!log.is_empty());
}

#[test]
fn test_merge_keeps_first_occurrence() {
    let catalog = sample_catalog();
    let hit = |index: usize, term: &str| SearchHit {
        entry: catalog[index].clone(),
        match_field: MatchField::Name,
        match_term: term.to_string(),
    };

    let mut first = SearchOutcome {
        hits: vec![hit(0, "bag")],
        queries_issued: 3,
        queries_failed: 1,
    };
    first.merge(SearchOutcome {
        hits: vec![hit(0, "carrier"), hit(2, "cup")],
        queries_issued: 3,
        queries_failed: 0,
    });

    assert_eq!(first.hits.len(), 2);
    assert_eq!(first.hits[0].match_term, "bag");
    assert_eq!(first.queries_issued, 6);
    assert_eq!(first.queries_failed, 1);
}
