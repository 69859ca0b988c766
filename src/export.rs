// 📤 Export - CSV & Priority Configuration
// Pure serialization of store collections: CSV text for the grids, a JSON
// document for the priority-weights configuration.

use crate::store::{EntityRecord, PriorityCriteria};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// CSV EXPORT
// ============================================================================

/// Serialize a collection to CSV text over the given column list.
///
/// Values containing a comma are wrapped in quotes; nothing else is escaped.
/// This mirrors the grid-export surface, not RFC 4180 - embedded quotes and
/// newlines are out of scope.
pub fn collection_to_csv<T: EntityRecord>(records: &[T], columns: &[&str]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(columns.join(","));

    for record in records {
        let row: Vec<String> = columns
            .iter()
            .map(|col| {
                let value = record.field(col).unwrap_or_default();
                if value.contains(',') {
                    format!("\"{}\"", value)
                } else {
                    value
                }
            })
            .collect();
        lines.push(row.join(","));
    }

    lines.join("\n")
}

// ============================================================================
// PRIORITY CONFIGURATION EXPORT
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PriorityConfigExport<'a> {
    priority_criteria: &'a [PriorityCriteria],
    timestamp: DateTime<Utc>,
    profile: &'a str,
}

/// Serialize the priority criteria plus metadata as a pretty JSON document:
/// `{ priorityCriteria: [...], timestamp, profile }`
pub fn export_priority_config(criteria: &[PriorityCriteria], profile: &str) -> Result<String> {
    let config = PriorityConfigExport {
        priority_criteria: criteria,
        timestamp: Utc::now(),
        profile,
    };

    serde_json::to_string_pretty(&config).context("Failed to serialize priority configuration")
}

// ============================================================================
// TESTS
// ============================================================================
