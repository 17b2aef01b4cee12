use lens_core::config::*;
use lens_core::models::AttributeValue;
use lens_core::LensError;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = LensConfig::from_toml("").unwrap();

    // Traversal defaults
    assert_eq!(config.traversal.depth_ceiling, 50);
    assert!(config.traversal.default_max_depth.is_none());
    assert!(!config.traversal.include_invalidated);

    // Classifier defaults
    assert!(config.classifier.rules.is_empty());
    assert_eq!(config.classifier.risk.high_total, 20);

    // Ingestion defaults
    assert!(config.ingestion.lowercase_ids);
    assert_eq!(config.ingestion.id_separator, ".");

    // Storage defaults
    assert_eq!(config.storage.db_path, "lens.db");
    assert_eq!(config.storage.busy_timeout_ms, 5_000);

    // Observability defaults
    assert_eq!(config.observability.log_level, "info");
    assert!(config.observability.json);
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[traversal]
default_max_depth = 10

[classifier.rules]
tags = ["regulatory"]

[classifier.rules.attribute_equals]
tier = 1
pii = true
"#;
    let config = LensConfig::from_toml(toml).unwrap();
    assert_eq!(config.traversal.default_max_depth, Some(10));
    // Non-overridden fields keep defaults
    assert_eq!(config.traversal.depth_ceiling, 50);
    assert!(config.classifier.rules.tags.contains("regulatory"));
    assert_eq!(
        config.classifier.rules.attribute_equals.get("tier"),
        Some(&AttributeValue::Integer(1))
    );
    assert_eq!(
        config.classifier.rules.attribute_equals.get("pii"),
        Some(&AttributeValue::Bool(true))
    );
}

#[test]
fn config_rejects_malformed_toml() {
    let err = LensConfig::from_toml("[traversal\ndepth_ceiling = ").unwrap_err();
    assert!(matches!(err, LensError::Config { .. }));
}

#[test]
fn config_rejects_zero_ceiling() {
    let err = LensConfig::from_toml("[traversal]\ndepth_ceiling = 0").unwrap_err();
    assert!(err.to_string().contains("depth_ceiling"));
}

#[test]
fn config_serde_roundtrip() {
    let mut config = LensConfig::default();
    config.classifier.rules = CriticalityRules::default()
        .with_tag("tier-1")
        .with_attribute("domain", "finance");
    let toml_str = toml::to_string(&config).unwrap();
    let roundtripped = LensConfig::from_toml(&toml_str).unwrap();
    assert_eq!(roundtripped.classifier, config.classifier);
    assert_eq!(roundtripped.storage.db_path, config.storage.db_path);
}

#[test]
fn effective_depth_is_capped_by_ceiling() {
    let config = TraversalConfig::default();
    assert_eq!(config.effective_depth(None), 50);
    assert_eq!(config.effective_depth(Some(3)), 3);
    assert_eq!(config.effective_depth(Some(500)), 50);

    let config = TraversalConfig {
        default_max_depth: Some(4),
        ..TraversalConfig::default()
    };
    assert_eq!(config.effective_depth(None), 4);
    assert_eq!(config.effective_depth(Some(7)), 7);
}
