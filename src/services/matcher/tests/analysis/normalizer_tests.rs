use super::*;

#[test]
fn test_normalize_term_lowercases_and_collapses() {
    assert_eq!(normalize_term("  Plastic   Bottle \n"), "plastic bottle");
    assert_eq!(normalize_term(""), "");
}

#[test]
fn test_tokenize_splits_on_whitespace_and_hyphens() {
    let tokens = tokenize("Plastic-bottle, empty of it");
    assert_eq!(tokens, vec!["plastic", "bottle", "empty"]);
}

#[test]
fn test_tokenize_drops_short_tokens() {
    assert!(tokenize("a to be").is_empty());
    assert_eq!(tokenize("tin can"), vec!["tin", "can"]);
}

#[test]
fn test_contains_ci_ignores_case_and_empty_needle() {
    assert!(contains_ci("Soft Plastic", "soft"));
    assert!(!contains_ci("Soft Plastic", "   "));
    assert!(!contains_ci("Glass", "glassware"));
}

#[test]
fn test_has_word_matches_whole_words_only() {
    let markers = vec!["hard".to_string()];
    assert!(has_word("Hard plastic", &markers));
    assert!(has_word("plastic (hard)", &markers));
    assert!(!has_word("hardwood", &markers));
}

#[test]
fn test_has_word_prefix_anchors_at_word_start() {
    let hints = vec!["bag".to_string(), "cling film".to_string()];
    assert!(has_word_prefix("Plastic bags", &hints));
    assert!(has_word_prefix("roll of cling films", &hints));
    assert!(!has_word_prefix("garbage bin", &hints));
    assert!(!has_word_prefix("cabbage", &hints));
    assert!(!has_word_prefix("film", &hints));
    assert!(!has_word_prefix("anything", &["  ".to_string()]));
}

#[test]
fn test_non_blank_filters_whitespace() {
    assert_eq!(non_blank(Some("  metal ")), Some("metal"));
    assert_eq!(non_blank(Some("   ")), None);
    assert_eq!(non_blank(None), None);
}
