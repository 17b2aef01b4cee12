//! Canonical asset ids.

use lens_core::config::IngestionConfig;
use lens_core::traits::AssetRef;

/// Derive the canonical id of an asset.
///
/// An explicit id wins. Otherwise the id is `system.schema.name` (schema
/// optional) joined with the configured separator. Both are trimmed and,
/// by default, lower-cased, so the same asset seen by two adapters maps to
/// one node.
pub fn canonical_id(asset: &AssetRef, config: &IngestionConfig) -> Result<String, String> {
    let raw = match non_blank(asset.id.as_deref()) {
        Some(id) => id.to_string(),
        None => {
            let system = non_blank(asset.system.as_deref())
                .ok_or_else(|| "asset reference has neither an id nor a system".to_string())?;
            let name = non_blank(asset.name.as_deref())
                .ok_or_else(|| "asset reference has no name".to_string())?;
            let mut parts = vec![system];
            parts.extend(non_blank(asset.schema.as_deref()));
            parts.push(name);
            parts.join(&config.id_separator)
        }
    };
    Ok(if config.lowercase_ids {
        raw.to_lowercase()
    } else {
        raw
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
