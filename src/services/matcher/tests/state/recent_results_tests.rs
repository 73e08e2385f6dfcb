use super::*;

fn named(name: &str) -> WasteIdentification {
    WasteIdentification {
        name: name.to_string(),
        home_category: "Metal".to_string(),
        recycling_category: "Metal".to_string(),
        description: String::new(),
        confidence: 0.5,
        decision_log: vec![],
    }
}

#[test]
fn test_newest_first_and_bounded() {
    let recent = RecentResults::new(2);
    recent.push(named("Can"));
    recent.push(named("Jar"));
    recent.push(named("Bag"));

    let names: Vec<String> = recent.list().into_iter().map(|r| r.result.name).collect();
    assert_eq!(names, vec!["Bag", "Jar"]);
}

#[test]
fn test_zero_capacity_keeps_one_and_clear_empties() {
    let recent = RecentResults::new(0);
    recent.push(named("Can"));
    recent.push(named("Jar"));
    assert_eq!(recent.list().len(), 1);

    recent.clear();
    assert!(recent.list().is_empty());
}
