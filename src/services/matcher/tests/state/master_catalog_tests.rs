use super::*;

const CATALOG_JSON: &str = r#"[
    { "id": 2, "name": "Bag", "material": "Hard plastic",
      "home_category": "Plastic", "recycling_category": "Hard plastic" },
    { "id": 1, "name": "Bag", "synonyms": "carrier bag, shopping bag", "material": "Soft plastic",
      "home_category": "Plastic", "recycling_category": "Soft plastic" },
    { "id": 3, "name": "Pizza box", "variation": "greasy",
      "home_category": "Residual", "recycling_category": "Residual" }
]"#;

#[test]
fn test_from_json_accepts_array_and_sorts_by_id() {
    let catalog = MemoryCatalog::from_json(CATALOG_JSON).unwrap();
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.entries[0].id, 1);
    assert_eq!(catalog.entries[2].variation.as_deref(), Some("greasy"));
}

#[test]
fn test_from_json_accepts_entries_object() {
    let json = format!(r#"{{ "entries": {CATALOG_JSON} }}"#);
    let catalog = MemoryCatalog::from_json(&json).unwrap();
    assert_eq!(catalog.len(), 3);
}

#[test]
fn test_from_json_rejects_duplicate_ids_and_bad_shapes() {
    let dup = r#"[{ "id": 1, "name": "A" }, { "id": 1, "name": "B" }]"#;
    assert!(matches!(
        MemoryCatalog::from_json(dup),
        Err(EngineError::Config(_))
    ));
    assert!(MemoryCatalog::from_json(r#""just a string""#).is_err());
}

#[tokio::test]
async fn test_query_by_field_is_case_insensitive_and_capped() {
    let catalog = MemoryCatalog::from_json(CATALOG_JSON).unwrap();

    let by_name = catalog
        .query_by_field(MatchField::Name, "BAG", 40)
        .await
        .unwrap();
    assert_eq!(by_name.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2]);

    let capped = catalog
        .query_by_field(MatchField::Name, "bag", 1)
        .await
        .unwrap();
    assert_eq!(capped.len(), 1);

    let by_synonym = catalog
        .query_by_field(MatchField::Synonym, "shopping", 40)
        .await
        .unwrap();
    assert_eq!(by_synonym.len(), 1);

    let by_variation = catalog
        .query_by_field(MatchField::Variation, "greasy", 40)
        .await
        .unwrap();
    assert_eq!(by_variation[0].name, "Pizza box");
}
