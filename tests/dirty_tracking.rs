mod common;

use common::person;
use modelkit::{Change, Record, Schema, Value};

#[test]
fn test_commit_moves_changes_to_previous() {
    let mut record = person();
    record.write("name", "bob").unwrap();
    record.commit_changes();
    record.write("name", "robert").unwrap();

    assert_eq!(
        record.previous_changes().get("name"),
        Some(&Change::new(Value::Nil, "bob"))
    );
    assert_eq!(
        record.changes().get("name"),
        Some(&Change::new("bob", "robert"))
    );
}

#[test]
fn test_next_commit_replaces_previous_changes() {
    let mut record = person();
    record.write("name", "bob").unwrap();
    record.commit_changes();
    record.write("age", 3).unwrap();
    record.commit_changes();

    assert!(!record.attribute_previously_changed("name"));
    assert!(record.attribute_previously_changed("age"));

    record.commit_changes();
    assert!(record.previous_changes().is_empty());
}

#[test]
fn test_writing_back_the_original_is_not_a_change() {
    let mut record = person();
    record.write("name", "bob").unwrap();
    record.commit_changes();
    record.write("name", "robert").unwrap();
    record.write("name", "bob").unwrap();
    assert!(!record.changed());
    assert!(record.changes().is_empty());
}

#[test]
fn test_rollback_restores_and_keeps_previous() {
    let mut record = person();
    record.write("name", "bob").unwrap();
    record.commit_changes();
    record.write("name", "robert").unwrap();
    record.write("age", 40).unwrap();

    let mut restored = record.rollback();
    restored.sort();
    assert_eq!(restored, vec!["age", "name"]);
    assert_eq!(record.read("name").unwrap(), &Value::str("bob"));
    assert_eq!(record.read("age").unwrap(), &Value::Nil);
    assert!(!record.changed());
    assert_eq!(
        record.attribute_previous_change("name"),
        Some(&Change::new(Value::Nil, "bob"))
    );
}

#[test]
fn test_partial_restore() {
    let mut record = person();
    record.write("name", "bob").unwrap();
    record.write("age", 40).unwrap();
    record.restore_attributes(&["age"]).unwrap();

    assert_eq!(record.changed_attributes().into_iter().collect::<Vec<_>>(), vec!["name"]);
    assert!(record.restore_attributes(&["nope"]).is_err());
}

#[test]
fn test_was_and_from_to() {
    let mut record = person();
    record.write("name", "bob").unwrap();
    record.commit_changes();
    record.write("name", "robert").unwrap();

    assert_eq!(record.attribute_was("name").unwrap(), &Value::str("bob"));
    assert!(record.attribute_changed_from_to("name", Some(&Value::str("bob")), None));
    assert!(record.attribute_changed_from_to(
        "name",
        Some(&Value::str("bob")),
        Some(&Value::str("robert"))
    ));
    assert!(!record.attribute_changed_from_to("name", Some(&Value::str("rob")), None));
    assert!(!record.attribute_changed_from_to("age", None, None));
    assert_eq!(record.attribute_previously_was("name"), Some(&Value::Nil));
}

#[test]
fn test_clear_changes_information() {
    let mut record = person();
    record.write("name", "bob").unwrap();
    record.commit_changes();
    record.write("age", 1).unwrap();
    record.clear_changes_information();

    assert!(!record.changed());
    assert!(record.previous_changes().is_empty());
    assert_eq!(record.read("age").unwrap(), &Value::Int(1));
}

#[test]
fn test_custom_equality() {
    let schema = Schema::builder("Tag")
        .attributes(["label"])
        .equality(|a: &Value, b: &Value| match (a.as_str(), b.as_str()) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => a == b,
        })
        .build()
        .unwrap();
    let mut record = Record::new(&schema);
    record.write("label", "rust").unwrap();
    record.commit_changes();

    record.write("label", "RUST").unwrap();
    assert!(!record.changed());
    record.write("label", "go").unwrap();
    assert!(record.attribute_changed("label"));
}

#[test]
fn test_alias_shares_tracking() {
    let schema = Schema::builder("Person")
        .attributes(["name"])
        .alias_attribute("full_name", "name")
        .build()
        .unwrap();
    let mut record = Record::new(&schema);
    record.write("full_name", "Ada").unwrap();

    assert!(record.attribute_changed("name"));
    assert_eq!(record.call("full_name_changed?", &[]).unwrap(), Value::Bool(true));
    assert_eq!(
        record.call("name_change", &[]).unwrap(),
        Value::List(vec![Value::Nil, Value::str("Ada")])
    );
}

#[test]
fn test_changes_serialize() {
    let mut record = person();
    record.write("name", "bob").unwrap();
    let json = serde_json::to_value(record.changes()).unwrap();
    assert_eq!(json, serde_json::json!({ "name": { "from": null, "to": "bob" } }));
}
