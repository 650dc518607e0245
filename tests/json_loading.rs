use std::io::Cursor;

use record_explorer::ingestion::{load_json_from_path, load_json_from_str};
use record_explorer::session::{load_interactive, SessionOptions};
use record_explorer::types::Value;
use record_explorer::ExplorerError;

#[test]
fn load_json_array_from_path_happy_path() {
    let ds = load_json_from_path("tests/fixtures/people.json").unwrap();

    assert_eq!(ds.row_count(), 4);
    assert_eq!(ds.field_names(), vec!["name", "age", "home_city", "score", "team"]);
    assert_eq!(ds.records()[0].get("name"), Some(&Value::Utf8("Bob".to_string())));
    assert_eq!(ds.records()[1].get("score"), Some(&Value::Null));
    assert_eq!(ds.records()[2].get("score"), Some(&Value::Float64(72.0)));
}

#[test]
fn load_json_errors_on_malformed_input() {
    let err = load_json_from_path("tests/fixtures/malformed.json").unwrap_err();
    assert!(matches!(err, ExplorerError::Json(_)));
    assert!(err.is_fatal());
}

#[test]
fn load_json_missing_file_is_io_not_found() {
    let err = load_json_from_path("tests/fixtures/does_not_exist.json").unwrap_err();
    match err {
        ExplorerError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn load_json_rejects_empty_array() {
    let err = load_json_from_str("  [ ]  ").unwrap_err();
    assert!(matches!(err, ExplorerError::EmptyDataSet));
}

#[test]
fn interactive_load_reprompts_until_file_exists() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("crew.json");
    std::fs::write(&file, r#"[{"name":"Ada"}]"#).unwrap();

    let missing = dir.path().join("nope");
    let without_ext = dir.path().join("crew");
    let script = format!("{}\n{}\n", missing.display(), without_ext.display());

    let mut input = Cursor::new(script);
    let mut output = Vec::new();
    let (path, ds) = load_interactive(&mut input, &mut output, &SessionOptions::default()).unwrap();

    assert_eq!(path, file);
    assert_eq!(ds.row_count(), 1);

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains(&format!(
        "Error: Could not find the file '{}.json'. Please try again.",
        missing.display()
    )));
    assert!(text.contains(&format!(
        "Your data has been loaded successfully from {}.",
        file.display()
    )));
}

#[test]
fn interactive_load_uses_default_on_empty_answer() {
    let options = SessionOptions {
        default_filename: "tests/fixtures/people.json".to_string(),
        ..Default::default()
    };
    let mut input = Cursor::new("\n");
    let mut output = Vec::new();
    let (_, ds) = load_interactive(&mut input, &mut output, &options).unwrap();
    assert_eq!(ds.row_count(), 4);

    let text = String::from_utf8(output).unwrap();
    assert!(text.starts_with("Enter JSON filename (default: tests/fixtures/people.json): "));
}

#[test]
fn interactive_load_preset_falls_back_to_prompt_when_missing() {
    let options = SessionOptions {
        initial_filename: Some("tests/fixtures/absent".to_string()),
        ..Default::default()
    };
    let mut input = Cursor::new("tests/fixtures/people\n");
    let mut output = Vec::new();
    let (_, ds) = load_interactive(&mut input, &mut output, &options).unwrap();
    assert_eq!(ds.row_count(), 4);
    assert!(String::from_utf8(output)
        .unwrap()
        .contains("Could not find the file 'tests/fixtures/absent.json'"));
}

#[test]
fn interactive_load_malformed_json_is_fatal() {
    let mut input = Cursor::new("tests/fixtures/malformed.json\n");
    let mut output = Vec::new();
    let err = load_interactive(&mut input, &mut output, &SessionOptions::default()).unwrap_err();
    assert!(matches!(err, ExplorerError::Json(_)));
}

#[test]
fn interactive_load_stops_on_closed_input() {
    let mut input = Cursor::new("tests/fixtures/nope\n");
    let mut output = Vec::new();
    let err = load_interactive(&mut input, &mut output, &SessionOptions::default()).unwrap_err();
    assert!(matches!(err, ExplorerError::InputClosed { .. }));
}
