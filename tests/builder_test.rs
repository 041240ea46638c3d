//! Tests for TreeBuilder over stored records

use serde_json::json;

use partynet::domain::{build_forest, Level, TreeBuilder, Unit, UnitId};

const STAMP: &str = "2024-05-01T10:00:00Z";

fn record(id: &str, level: &str, parent: Option<&str>) -> serde_json::Value {
    json!({
        "id": id,
        "nameLabel": format!("name-{id}"),
        "level": level,
        "parentId": parent,
        "createdAt": STAMP,
        "updatedAt": STAMP,
    })
}

fn units(records: Vec<serde_json::Value>) -> Vec<Unit> {
    serde_json::from_value(serde_json::Value::Array(records)).expect("valid records")
}

fn names(nodes: &[&partynet::domain::UnitNode]) -> Vec<String> {
    nodes.iter().map(|n| n.id.clone()).collect()
}

#[test]
fn given_empty_store_when_building_then_forest_is_empty() {
    let forest = build_forest(&[]);

    assert!(forest.is_empty());
    assert_eq!(serde_json::to_value(&forest).unwrap(), json!([]));
}

#[test]
fn given_full_chain_in_reverse_order_when_building_then_nests_every_level() {
    // Arrange: children stored before their parents
    let units = units(vec![
        record("b1", "booth", Some("w1")),
        record("w1", "ward", Some("v1")),
        record("v1", "village", Some("u1")),
        record("u1", "union", None),
    ]);

    // Act
    let forest = build_forest(&units);

    // Assert
    assert_eq!(names(&forest.flatten()), ["u1", "v1", "w1", "b1"]);
    assert_eq!(forest.stats().total(), 4);
}

#[test]
fn given_siblings_when_building_then_keeps_store_order() {
    let units = units(vec![
        record("u2", "union", None),
        record("v-b", "village", Some("u1")),
        record("u1", "union", None),
        record("v-a", "village", Some("u1")),
        record("v-c", "village", Some("u2")),
    ]);

    let forest = build_forest(&units);

    let unions: Vec<_> = forest.unions().iter().map(|u| u.unit.id.as_str()).collect();
    assert_eq!(unions, ["u2", "u1"]);
    let villages: Vec<_> = forest.unions()[1]
        .villages
        .iter()
        .map(|v| v.unit.id.as_str())
        .collect();
    assert_eq!(villages, ["v-b", "v-a"]);
}

#[test]
fn given_unit_with_missing_parent_when_building_then_it_and_its_subtree_are_orphans() {
    let units = units(vec![
        record("u1", "union", None),
        record("v9", "village", Some("gone")),
        record("w9", "ward", Some("v9")),
    ]);

    let mut builder = TreeBuilder::new();
    let forest = builder.build(&units);

    assert_eq!(names(&forest.flatten()), ["u1"]);
    assert_eq!(builder.orphans(), &[UnitId::new("v9"), UnitId::new("w9")]);
}

#[test]
fn given_booth_directly_under_village_when_building_then_it_is_excluded() {
    let units = units(vec![
        record("u1", "union", None),
        record("v1", "village", Some("u1")),
        record("b1", "booth", Some("v1")),
    ]);

    let mut builder = TreeBuilder::new();
    let forest = builder.build(&units);

    assert!(forest.find("b1").is_none());
    assert_eq!(builder.orphans(), &[UnitId::new("b1")]);
}

#[test]
fn given_mixed_case_levels_and_empty_parent_when_loading_then_normalizes() {
    let units = units(vec![
        record("u1", "Union", Some("")),
        record("v1", "VILLAGE", Some("u1")),
    ]);

    assert_eq!(units[0].level, Level::Union);
    assert_eq!(units[0].parent_id, None);

    let forest = build_forest(&units);
    assert_eq!(forest.unions()[0].villages.len(), 1);
}

#[test]
fn given_unknown_level_in_record_when_loading_then_fails() {
    let result: Result<Vec<Unit>, _> =
        serde_json::from_value(json!([record("x", "district", None)]));

    assert!(result.is_err());
}

#[test]
fn given_two_records_sharing_an_id_when_building_then_first_wins_and_children_appear_once() {
    let mut second = record("u1", "union", None);
    second["nameLabel"] = json!("Second");
    let units = units(vec![
        record("u1", "union", None),
        record("v1", "village", Some("u1")),
        second,
    ]);

    let forest = build_forest(&units);

    let flat: Vec<_> = forest
        .flatten()
        .iter()
        .map(|n| (n.id.as_str(), n.name_label.as_str()))
        .collect();
    assert_eq!(flat, [("u1", "name-u1"), ("v1", "name-v1")]);
}

#[test]
fn given_same_units_when_building_twice_then_results_are_equal() {
    let units = units(vec![
        record("u1", "union", None),
        record("v1", "village", Some("u1")),
        record("w1", "ward", Some("v1")),
        record("b1", "booth", Some("w1")),
        record("b2", "booth", Some("w1")),
    ]);

    let mut builder = TreeBuilder::new();
    let first = builder.build(&units);
    let second = builder.build(&units);

    assert_eq!(first, second);
    assert!(builder.orphans().is_empty());
}

#[test]
fn given_forest_when_serializing_then_nodes_carry_flat_fields_and_child_arrays() {
    let units = units(vec![
        record("u1", "union", None),
        record("v1", "village", Some("u1")),
    ]);

    let value = serde_json::to_value(build_forest(&units)).unwrap();

    let union = &value[0];
    assert_eq!(union["id"], "u1");
    assert_eq!(union["level"], "union");
    assert_eq!(union["nameLabel"], "name-u1");
    assert_eq!(union["parentId"], serde_json::Value::Null);
    assert_eq!(union["villages"][0]["id"], "v1");
    assert_eq!(union["villages"][0]["wards"], json!([]));
}
