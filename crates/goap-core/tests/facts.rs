use std::collections::BTreeSet;

use goap_core::{ConfigError, Fact, FactRegistry, FactSet};

struct Larder {
    food: u32,
    sensor: Option<bool>,
}

#[test]
fn evaluation_reads_the_world() {
    let has_food = Fact::new("HasFood", |w: &Larder| w.food > 0);

    let mut larder = Larder {
        food: 0,
        sensor: None,
    };
    assert!(!has_food.evaluate(&larder));

    larder.food = 2;
    assert!(has_food.evaluate(&larder));
    assert!(has_food.evaluate(&larder));
}

#[test]
fn clones_share_the_predicate() {
    let has_food = Fact::new("HasFood", |w: &Larder| w.food > 0);
    let copy = has_food.clone();
    let larder = Larder {
        food: 1,
        sensor: None,
    };

    assert_eq!(copy, has_food);
    assert_eq!(copy.name(), "HasFood");
    assert!(copy.evaluate(&larder));
}

#[test]
fn sets_key_facts_by_name() {
    let mut set: FactSet<Larder> = BTreeSet::new();
    set.insert(Fact::constant("B", true));
    set.insert(Fact::constant("A", false));
    set.insert(Fact::constant("B", false));

    let names: Vec<_> = set.iter().map(Fact::name).collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn fallible_fact_uses_default_when_provider_cannot_answer() {
    let spotted = Fact::fallible("EnemySpotted", false, |w: &Larder| w.sensor);
    let cautious = Fact::fallible("EnemySpotted", true, |w: &Larder| w.sensor);

    let mut larder = Larder {
        food: 0,
        sensor: None,
    };
    assert!(!spotted.evaluate(&larder));
    assert!(cautious.evaluate(&larder));

    larder.sensor = Some(true);
    assert!(spotted.evaluate(&larder));
}

#[test]
fn registry_interns_facts() {
    let mut registry = FactRegistry::new();
    let added = registry.add("HasFood", |w: &Larder| w.food > 0).unwrap();
    registry.insert(Fact::constant("Nothing", false)).unwrap();

    assert_eq!(registry.len(), 2);
    assert!(registry.contains("HasFood"));
    assert_eq!(registry.require("HasFood").unwrap(), added);
    assert!(registry.get("Missing").is_none());

    let names: Vec<_> = registry.iter().map(Fact::name).collect();
    assert_eq!(names, vec!["HasFood", "Nothing"]);
}

#[test]
fn registry_rejects_duplicates_and_unknown_names() {
    let mut registry = FactRegistry::<Larder>::new();
    registry.add("HasFood", |w: &Larder| w.food > 0).unwrap();

    let err = registry.add("HasFood", |_: &Larder| true).unwrap_err();
    assert_eq!(err, ConfigError::DuplicateFact("HasFood".to_string()));

    let err = registry.require("Hungry").unwrap_err();
    assert_eq!(err, ConfigError::UnknownFact("Hungry".to_string()));
    assert_eq!(err.to_string(), "unknown fact `Hungry`");
}
