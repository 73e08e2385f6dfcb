use super::*;

fn input<'a>(
    db_material: Option<&'a str>,
    db_home: Option<&'a str>,
    db_recycling: Option<&'a str>,
    ai_material: Option<&'a str>,
    ai_description: &'a str,
) -> CategorizationInput<'a> {
    CategorizationInput {
        db_material,
        db_home,
        db_recycling,
        ai_material,
        ai_description,
    }
}

#[test]
fn test_hazardous_ai_material_without_catalog_material() {
    let tables = MatchTables::default();
    let result = categorize(&input(None, None, None, Some("battery"), "AA cell"), &tables);

    assert_eq!(result.source, CategorySource::AiHazardous);
    assert_eq!(result.home_category, "Hazardous waste");
}

#[test]
fn test_hazardous_ai_material_ignored_when_catalog_has_material() {
    let tables = MatchTables::default();
    let result = categorize(
        &input(Some("Metal"), Some("Metal"), Some("Metal"), Some("battery"), "tin"),
        &tables,
    );
    assert_eq!(result.source, CategorySource::Database);
}

#[test]
fn test_precise_catalog_material_is_trusted() {
    let tables = MatchTables::default();
    let soft = categorize(
        &input(
            Some("Soft plastic"),
            Some("Plastic"),
            Some("Soft plastic"),
            Some("hard plastic"),
            "bag",
        ),
        &tables,
    );
    assert_eq!(soft.source, CategorySource::DatabasePrecise);
    assert_eq!(soft.recycling_category, "Soft plastic");

    let compound = categorize(
        &input(Some("Paper - coated"), Some("Residual"), Some("Residual"), None, "cup"),
        &tables,
    );
    assert_eq!(compound.source, CategorySource::DatabasePrecise);
    assert_eq!(compound.home_category, "Residual");
}

#[test]
fn test_generic_plastic_reclassified_by_ai_subtype() {
    let tables = MatchTables::default();
    let result = categorize(
        &input(
            Some("Plastic"),
            Some("Plastic"),
            Some("Plastic"),
            Some("hard plastic"),
            "yoghurt cup",
        ),
        &tables,
    );

    assert_eq!(result.source, CategorySource::AiSpecific);
    assert_eq!(result.home_category, "Plastic");
    assert_eq!(result.recycling_category, "Hard plastic");
}

#[test]
fn test_generic_plastic_without_ai_subtype_uses_database() {
    let tables = MatchTables::default();
    let result = categorize(
        &input(Some("Plastic"), Some("Plastic"), Some("Plastic"), Some("plastic"), "bag"),
        &tables,
    );
    assert_eq!(result.source, CategorySource::Database);
    assert_eq!(result.recycling_category, "Plastic");
}

#[test]
fn test_ai_fallback_uses_description_hint_for_plastic() {
    let tables = MatchTables::default();
    let result = categorize(
        &input(None, Some("Plastic"), None, Some("plastic"), "plastic shopping bag"),
        &tables,
    );
    assert_eq!(result.source, CategorySource::AiFallback);
    assert_eq!(result.recycling_category, "Soft plastic");
}

#[test]
fn test_description_hints_ignore_words_that_merely_contain_them() {
    let tables = MatchTables::default();
    let result = categorize(&input(None, None, None, Some("plastic"), "garbage bin"), &tables);
    assert_eq!(result.source, CategorySource::AiFallback);
    assert_eq!(result.home_category, "Plastic");
    assert_eq!(result.recycling_category, "Plastic");

    assert_eq!(description_subtype("leather handbag", &tables), None);
    assert_eq!(description_subtype("bags of crisps", &tables), Some(PlasticSubtype::Soft));
}

#[test]
fn test_fallback_is_residual_when_nothing_known() {
    let tables = MatchTables::default();
    let result = categorize(&input(None, Some("  "), None, Some(" "), "thing"), &tables);
    assert_eq!(result.source, CategorySource::Fallback);
    assert_eq!(result.home_category, "Residual");
    assert_eq!(result.recycling_category, "Residual");
}

#[test]
fn test_classify_material_explicit_subtype_beats_description() {
    let tables = MatchTables::default();
    let pair = classify_material("hard plastic", "plastic bag", &tables);
    assert_eq!(pair.recycling, "Hard plastic");

    let hinted = classify_material("plastic", "water bottle", &tables);
    assert_eq!(hinted.recycling, "Hard plastic");

    let generic = classify_material("plastic", "toy", &tables);
    assert_eq!(generic.recycling, "Plastic");
}

#[test]
fn test_classify_material_keyword_table() {
    let tables = MatchTables::default();
    assert_eq!(classify_material("Electronics", "", &tables).home, "Electronic waste");
    assert_eq!(classify_material("aluminium", "", &tables).home, "Metal");
    assert_eq!(classify_material("corrugated cardboard", "", &tables).home, "Cardboard");
    assert_eq!(classify_material("paper", "", &tables).home, "Paper");
    assert_eq!(classify_material("cotton", "", &tables).home, "Textile waste");
    assert_eq!(classify_material("food", "", &tables).home, "Food waste");
    assert_eq!(classify_material("ceramic", "", &tables).home, "Residual");
}
