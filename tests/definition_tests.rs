use std::fs;

use tempfile::TempDir;

use intake_core::schema::{FieldKind, RecordSchema};

const DEFINITION: &str = r#"{
  "name": "job-application",
  "steps": [
    {
      "name": "personal",
      "title": "Personal details",
      "fields": [
        { "key": "first_name", "label": "First name", "kind": "text" },
        { "key": "last_name", "label": "Last name", "kind": "text", "required": false },
        { "key": "email", "label": "Email address", "kind": "email" }
      ]
    },
    {
      "name": "availability",
      "title": "Availability",
      "fields": [
        { "key": "full_time", "label": "Available full time", "kind": "flag", "required": false },
        { "key": "notice", "label": "Notice period", "kind": "text",
          "help": "How soon you can start." }
      ]
    }
  ]
}"#;

#[test]
fn definition_file_loads_into_a_record_schema() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("wizard.json");
    fs::write(&path, DEFINITION).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    let schema = RecordSchema::from_json(&raw).unwrap();

    assert_eq!(schema.name(), "job-application");
    assert_eq!(schema.step_count(), 2);

    let personal = schema.step(0).unwrap();
    assert_eq!(personal.title(), "Personal details");
    assert_eq!(personal.fields().len(), 3);
    assert!(personal.field("first_name").unwrap().is_required());
    assert!(!personal.field("last_name").unwrap().is_required());
    assert_eq!(personal.field("email").unwrap().kind(), FieldKind::Email);

    let availability = schema.step(1).unwrap();
    assert_eq!(availability.field("full_time").unwrap().kind(), FieldKind::Flag);
    assert_eq!(
        availability.field("notice").unwrap().help(),
        Some("How soon you can start.")
    );
}

#[test]
fn serialized_schema_reloads_identically() {
    let schema = RecordSchema::from_json(DEFINITION).unwrap();
    let json = serde_json::to_string_pretty(&schema).unwrap();
    let reloaded = RecordSchema::from_json(&json).unwrap();

    assert_eq!(reloaded.name(), schema.name());
    assert_eq!(reloaded.step_count(), schema.step_count());
    for (left, right) in schema.steps().iter().zip(reloaded.steps()) {
        assert_eq!(left.name(), right.name());
        let keys: Vec<&str> = left.fields().iter().map(|f| f.key()).collect();
        let reloaded_keys: Vec<&str> = right.fields().iter().map(|f| f.key()).collect();
        assert_eq!(keys, reloaded_keys);
    }
}

#[test]
fn cross_step_key_clashes_are_rejected_at_load_time() {
    let raw = DEFINITION.replace("\"key\": \"notice\"", "\"key\": \"first_name\"");
    let error = RecordSchema::from_json(&raw).unwrap_err();
    assert!(error.to_string().contains("duplicate field key"));
}

#[test]
fn stepless_definitions_are_rejected_at_load_time() {
    let raw = r#"{ "name": "empty", "steps": [] }"#;
    let error = RecordSchema::from_json(raw).unwrap_err();
    assert!(error.to_string().contains("at least one step"));
}
