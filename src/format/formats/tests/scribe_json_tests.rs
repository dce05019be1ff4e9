//! Tests for the native session JSON format.

use super::make_session;
use crate::format::document::SessionDocument;
use crate::format::error::DataError;
use crate::format::formats::ScribeJsonFormat;
use crate::format::traits::{ExportOptions, ImportOptions, SessionFormat};
use crate::format::SessionData;
use crate::model::LabelInterval;

fn import_value(value: &serde_json::Value) -> Result<SessionData, DataError> {
    let text = value.to_string();
    ScribeJsonFormat.import_from_reader(&mut text.as_bytes(), &ImportOptions::default())
}

fn document_value(data: &SessionData) -> serde_json::Value {
    serde_json::to_value(SessionDocument::from_session(data)).unwrap()
}

#[test]
fn test_export_contains_structured_labels() {
    let label = LabelInterval::new("Erutation", 1200.0, 1800.0, [0x02, 0x9e, 0x73]);
    let data = make_session(2, 2, vec![label]);
    let (bytes, result) = ScribeJsonFormat
        .export_to_bytes(&data, &ExportOptions::default())
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(value["version"], SessionDocument::CURRENT_VERSION);
    assert_eq!(value["labels"][0]["category"], "Erutation");
    assert_eq!(value["labels"][0]["interval"][0], 1200.0);
    assert_eq!(value["labels"][0]["color"], "#029e73");
    assert_eq!(value["impedance"].as_array().map(Vec::len), Some(6));
    assert_eq!(result.labels_exported, 1);
    assert_eq!(result.rows_written, 4);
}

#[test]
fn test_pretty_output() {
    let data = make_session(1, 1, Vec::new());
    let (compact, _) = ScribeJsonFormat
        .export_to_bytes(&data, &ExportOptions::default())
        .unwrap();
    let (pretty, _) = ScribeJsonFormat
        .export_to_bytes(&data, &ExportOptions::new().pretty(true))
        .unwrap();

    assert!(!compact.contains(&b'\n'));
    assert!(pretty.contains(&b'\n'));
}

#[test]
fn test_major_version_mismatch() {
    let mut value = document_value(&make_session(1, 1, Vec::new()));
    value["version"] = "1.0.0".into();
    let err = import_value(&value).unwrap_err();

    match err {
        DataError::VersionMismatch { expected, found } => {
            assert_eq!(expected, SessionDocument::CURRENT_VERSION);
            assert_eq!(found, "1.0.0");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_other_minor_version_is_read() {
    let mut value = document_value(&make_session(1, 1, Vec::new()));
    value["version"] = "0.9.0".into();

    assert!(import_value(&value).is_ok());
}

#[test]
fn test_metadata_is_optional() {
    let mut value = document_value(&make_session(1, 1, Vec::new()));
    if let Some(obj) = value.as_object_mut() {
        obj.remove("metadata");
        obj.remove("labels");
    }
    let data = import_value(&value).unwrap();

    assert!(data.labels.is_empty());
}

#[test]
fn test_invalid_label_color() {
    let label = LabelInterval::new("Reflux", 1.0, 2.0, [1, 2, 3]);
    let mut value = document_value(&make_session(1, 1, vec![label]));
    value["labels"][0]["color"] = "not a color".into();

    assert!(matches!(
        import_value(&value),
        Err(DataError::Format { .. })
    ));
}

#[test]
fn test_ragged_impedance_column() {
    let mut value = document_value(&make_session(1, 2, Vec::new()));
    value["impedance"][3] = serde_json::json!([1.0]);

    assert!(matches!(
        import_value(&value),
        Err(DataError::Format { .. })
    ));
}

#[test]
fn test_empty_channel() {
    let value = document_value(&make_session(0, 2, Vec::new()));

    assert!(matches!(
        import_value(&value),
        Err(DataError::EmptyData { .. })
    ));
}

#[test]
fn test_malformed_json() {
    let err = ScribeJsonFormat
        .import_from_reader(&mut "{ not json".as_bytes(), &ImportOptions::default())
        .unwrap_err();

    assert!(matches!(err, DataError::Json(_)));
}
