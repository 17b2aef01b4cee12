//! Shape validation of adapter output. Errors are plain reasons; the
//! normalizer wraps them with the record position and adapter name.

use std::collections::{BTreeMap, BTreeSet};

use lens_core::models::{AttributeValue, Attributes, ColumnMapping, NodeType, Relation, TransformationType};
use lens_core::traits::RawColumnMapping;

pub fn node_type(raw: Option<&str>) -> Result<NodeType, String> {
    let raw = raw.ok_or_else(|| "missing node type".to_string())?;
    NodeType::from_str_name(raw).ok_or_else(|| format!("unknown node type '{raw}'"))
}

pub fn relation(raw: Option<&str>) -> Result<Relation, String> {
    let raw = raw.ok_or_else(|| "missing relation".to_string())?;
    Relation::from_str_name(raw).ok_or_else(|| format!("unknown relation '{raw}'"))
}

/// Convert JSON attributes to scalars. Nulls are dropped; arrays, objects,
/// and blank keys are rejected.
pub fn attributes(raw: &BTreeMap<String, serde_json::Value>) -> Result<Attributes, String> {
    let mut attributes = Attributes::new();
    for (key, value) in raw {
        let key = key.trim();
        if key.is_empty() {
            return Err("attribute key must not be empty".to_string());
        }
        if value.is_null() {
            continue;
        }
        let scalar = AttributeValue::from_json(value)
            .ok_or_else(|| format!("attribute '{key}' is not a scalar"))?;
        attributes.insert(key.to_string(), scalar);
    }
    Ok(attributes)
}

/// Column mappings need both column names; a transformation type, when
/// given, must be a known one.
pub fn columns(raw: &[RawColumnMapping]) -> Result<Vec<ColumnMapping>, String> {
    let mut mapped = Vec::with_capacity(raw.len());
    for column in raw {
        let name = |value: &Option<String>, side: &str| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| format!("column mapping is missing its {side} column"))
        };
        let transformation_type = column
            .transformation_type
            .as_deref()
            .map(|t| {
                TransformationType::from_str_name(t)
                    .ok_or_else(|| format!("unknown transformation type '{t}'"))
            })
            .transpose()?;
        let mapping = ColumnMapping {
            source_column: name(&column.source_column, "source")?,
            target_column: name(&column.target_column, "target")?,
            transformation: column.transformation.clone(),
            transformation_type,
            confidence: column.confidence,
        };
        mapping.check()?;
        mapped.push(mapping);
    }
    Ok(mapped)
}

pub fn tags(raw: &[String]) -> BTreeSet<String> {
    raw.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn nested_attributes_are_rejected() {
        let mut raw = BTreeMap::new();
        raw.insert("owner".to_string(), json!("sales"));
        raw.insert("columns".to_string(), json!(["a", "b"]));
        let err = attributes(&raw).unwrap_err();
        assert!(err.contains("columns"));
    }

    #[test]
    fn null_attributes_are_dropped() {
        let mut raw = BTreeMap::new();
        raw.insert("tier".to_string(), json!(1));
        raw.insert("domain".to_string(), json!(null));
        let parsed = attributes(&raw).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["tier"], AttributeValue::Integer(1));
    }

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!(node_type(Some("TABLE")), Ok(NodeType::Table));
        assert_eq!(relation(Some("Derives_From")), Ok(Relation::DerivesFrom));
        assert!(node_type(Some("cube")).is_err());
        assert!(relation(None).is_err());
    }

    #[test]
    fn column_mappings_are_checked() {
        let good = RawColumnMapping {
            source_column: Some(" amt ".into()),
            target_column: Some("amount".into()),
            transformation_type: Some("CAST".into()),
            ..RawColumnMapping::default()
        };
        let parsed = columns(std::slice::from_ref(&good)).unwrap();
        assert_eq!(parsed[0].source_column, "amt");
        assert_eq!(parsed[0].transformation_type, Some(TransformationType::Cast));

        let missing_target = RawColumnMapping {
            source_column: Some("amt".into()),
            ..RawColumnMapping::default()
        };
        assert!(columns(&[missing_target]).unwrap_err().contains("target"));

        let unknown = RawColumnMapping {
            transformation_type: Some("pivot".into()),
            ..good.clone()
        };
        assert!(columns(&[unknown]).unwrap_err().contains("pivot"));

        let overconfident = RawColumnMapping {
            confidence: Some(2.0),
            ..good
        };
        assert!(columns(&[overconfident]).is_err());
    }

    #[test]
    fn tags_are_trimmed() {
        let cleaned = tags(&[" pii ".to_string(), String::new(), "pii".to_string()]);
        assert_eq!(cleaned.into_iter().collect::<Vec<_>>(), vec!["pii"]);
    }
}
