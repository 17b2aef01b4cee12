use lens_core::errors::*;

#[test]
fn unknown_node_carries_id() {
    let err = LensError::unknown_node("db.missing");
    assert!(err.to_string().contains("db.missing"));
}

#[test]
fn unknown_asset_carries_id() {
    let err = LensError::unknown_asset("warehouse.orders");
    assert!(err.to_string().contains("warehouse.orders"));
}

#[test]
fn validation_carries_reason() {
    let err = LensError::validation("node id must not be empty");
    assert!(err.to_string().contains("must not be empty"));
}

#[test]
fn schema_error_reports_record_and_adapter() {
    let err = SchemaError::new(3, "openlineage", "missing relation");
    let msg = err.to_string();
    assert!(msg.contains("openlineage"));
    assert!(msg.contains("#3"));
    assert!(msg.contains("missing relation"));
}

// --- From impls ---

#[test]
fn schema_error_converts_to_lens_error() {
    let err: LensError = SchemaError::new(0, "csv", "bad type").into();
    assert!(matches!(err, LensError::Schema(_)));
}

#[test]
fn storage_error_converts_to_lens_error() {
    let storage_err = StorageError::SqliteError {
        message: "disk full".into(),
    };
    let err: LensError = storage_err.into();
    assert!(matches!(err, LensError::Storage(_)));
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn serde_json_error_converts_to_serialization() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: LensError = json_err.into();
    assert!(matches!(err, LensError::Serialization(_)));
}
