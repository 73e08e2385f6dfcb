use super::*;
use crate::services::matcher::models::types::MatchField;

fn entry(id: i64, name: &str, material: Option<&str>, condition: Option<&str>, home: &str) -> CatalogEntry {
    CatalogEntry {
        id,
        name: name.to_string(),
        synonyms: None,
        variation: None,
        material: material.map(|m| m.to_string()),
        condition: condition.map(|c| c.to_string()),
        home_category: home.to_string(),
        recycling_category: home.to_string(),
    }
}

fn hit(entry: CatalogEntry) -> SearchHit {
    SearchHit {
        entry,
        match_field: MatchField::Name,
        match_term: "bag".to_string(),
    }
}

#[test]
fn test_material_alignment_tiers() {
    assert_eq!(
        material_alignment(Some("Soft plastic"), Some("soft PLASTIC")),
        MaterialAlignment::Exact
    );
    assert_eq!(
        material_alignment(Some("Plastic"), Some("soft plastic")),
        MaterialAlignment::Partial
    );
    assert_eq!(
        material_alignment(Some("Glass"), Some("metal")),
        MaterialAlignment::None
    );
    assert_eq!(material_alignment(None, Some("metal")), MaterialAlignment::None);
}

#[test]
fn test_plastic_subtype_outranks_generic_material_bonus() {
    let tables = MatchTables::default();
    let soft = entry(1, "Bag", Some("Soft plastic"), None, "Plastic");
    let generic = entry(2, "Bag", Some("Plastic"), None, "Plastic");

    // exact 200 + subtype 400 + sorted home 100
    assert_eq!(variant_score(&soft, Some("soft plastic"), &tables), 700);
    // partial 100 + sorted home 100
    assert_eq!(variant_score(&generic, Some("soft plastic"), &tables), 200);
}

#[test]
fn test_soft_hint_selects_soft_bag_variant() {
    let tables = MatchTables::default();
    let log = DecisionLog::new();
    let hits = vec![
        hit(entry(1, "Bag", Some("hard plastic"), None, "Plastic")),
        hit(entry(2, "bag", Some("soft plastic"), None, "Plastic")),
    ];

    let resolved = resolve(hits, Some("soft plastic"), &tables, &log);

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].entry.id, 2);
    assert_eq!(log.len(), 1);
}

#[test]
fn test_clean_condition_and_sorted_home_break_material_ties() {
    let tables = MatchTables::default();
    let log = DecisionLog::new();
    let hits = vec![
        hit(entry(1, "Pizza box", None, Some("greasy"), "Residual")),
        hit(entry(2, "Pizza box", None, Some("clean and dry"), "Cardboard")),
    ];

    let resolved = resolve(hits, None, &tables, &log);
    assert_eq!(resolved[0].entry.id, 2);
}

#[test]
fn test_equal_scores_keep_hit_order_and_groups_keep_first_appearance() {
    let tables = MatchTables::default();
    let log = DecisionLog::new();
    let hits = vec![
        hit(entry(5, "Jar", Some("Glass"), None, "Glass")),
        hit(entry(3, "Lid", Some("Metal"), None, "Metal")),
        hit(entry(4, "JAR", Some("Glass"), None, "Glass")),
    ];

    let resolved = resolve(hits, None, &tables, &log);
    let ids: Vec<i64> = resolved.iter().map(|h| h.entry.id).collect();
    assert_eq!(ids, vec![5, 3]);
}

#[test]
fn test_single_variant_passes_through_without_log() {
    let tables = MatchTables::default();
    let log = DecisionLog::new();
    let resolved = resolve(
        vec![hit(entry(1, "Can", Some("Metal"), None, "Metal"))],
        Some("glass"),
        &tables,
        &log,
    );
    assert_eq!(resolved.len(), 1);
    assert!(log.is_empty());
}
