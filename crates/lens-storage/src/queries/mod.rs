//! Row-level operations on the lineage tables.

pub mod edge_ops;
pub mod node_ops;

use chrono::{DateTime, SecondsFormat, Utc};

use lens_core::errors::LensResult;

use crate::corrupt_row;

/// Full-precision RFC 3339 so timestamps survive a round trip unchanged.
pub(crate) fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn parse_ts(raw: &str, column: &str) -> LensResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| corrupt_row(format!("{column} = {raw:?}: {e}")))
}
