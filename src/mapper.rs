// 🧭 Column Mapper - Header Mapping & Entity Classification
// Maps raw upload headers onto the canonical schema and detects entity kind

use crate::schema::{canonical_fields, EntityKind};
use std::collections::HashMap;

// ============================================================================
// MAPPING RESULT
// ============================================================================

/// Result of mapping a header set against one entity schema
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    /// original header -> canonical field, for headers that matched a synonym
    pub field_mapping: HashMap<String, String>,

    /// Matched canonical fields / total canonical fields, scaled to 0..100
    pub confidence: f64,
}

impl ColumnMapping {
    fn empty() -> Self {
        ColumnMapping {
            field_mapping: HashMap::new(),
            confidence: 0.0,
        }
    }
}

/// Result of classifying an unknown header set against all three schemas
#[derive(Debug, Clone)]
pub struct Classification {
    /// None when no schema produced any signal (caller must disambiguate)
    pub entity_kind: Option<EntityKind>,
    pub mapping: ColumnMapping,
}

// ============================================================================
// MAPPING
// ============================================================================

/// Map headers against one entity schema.
///
/// For each canonical field, the first header whose lowercased text contains
/// a synonym substring, or is contained by one, wins. The symmetric match is
/// intentionally permissive: "id" maps onto ClientID because the synonym
/// "client_id" contains it.
pub fn map_columns(headers: &[String], kind: EntityKind) -> ColumnMapping {
    let specs = canonical_fields(kind);
    let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();

    let mut field_mapping = HashMap::new();
    let mut matched = 0usize;

    for spec in specs {
        let hit = headers.iter().zip(lowered.iter()).find(|(_, low)| {
            spec.synonyms
                .iter()
                .any(|syn| low.contains(syn) || syn.contains(low.as_str()))
        });

        if let Some((header, _)) = hit {
            field_mapping.insert(header.clone(), spec.name.to_string());
            matched += 1;
        }
    }

    let confidence = if specs.is_empty() {
        0.0
    } else {
        (matched as f64 / specs.len() as f64) * 100.0
    };

    ColumnMapping {
        field_mapping,
        confidence,
    }
}

/// Classify a header set into one of the three entity kinds and map it.
///
/// The schema with the highest confidence wins; ties go to the earlier entry
/// of `EntityKind::CLASSIFICATION_ORDER`. A header set with zero signal
/// classifies as unknown rather than silently defaulting to one kind.
pub fn classify_and_map(headers: &[String]) -> Classification {
    let mut best_kind: Option<EntityKind> = None;
    let mut best_mapping = ColumnMapping::empty();

    for kind in EntityKind::CLASSIFICATION_ORDER {
        let mapping = map_columns(headers, kind);
        if mapping.confidence > best_mapping.confidence {
            best_kind = Some(kind);
            best_mapping = mapping;
        }
    }

    Classification {
        entity_kind: best_kind,
        mapping: best_mapping,
    }
}

/// Rewrite a row's keys through a field mapping.
///
/// Headers without a mapping pass through unchanged; downstream consumers
/// tolerate unmapped/extra fields.
pub fn remap_row(
    row: &HashMap<String, String>,
    mapping: &ColumnMapping,
) -> HashMap<String, String> {
    row.iter()
        .map(|(key, value)| {
            let mapped = mapping
                .field_mapping
                .get(key)
                .cloned()
                .unwrap_or_else(|| key.clone());
            (mapped, value.clone())
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_map_client_headers() {
        let hs = headers(&[
            "client_id",
            "client_name",
            "priority",
            "tasks",
            "group",
            "extra",
        ]);
        let mapping = map_columns(&hs, EntityKind::Clients);

        assert_eq!(mapping.field_mapping["client_id"], "ClientID");
        assert_eq!(mapping.field_mapping["client_name"], "ClientName");
        assert_eq!(mapping.field_mapping["priority"], "PriorityLevel");
        assert_eq!(mapping.field_mapping["tasks"], "RequestedTaskIDs");
        assert_eq!(mapping.field_mapping["group"], "GroupTag");
        // AttributesJSON has no matching header; "extra" stays unmapped
        assert!(!mapping.field_mapping.contains_key("extra"));
        assert!((mapping.confidence - 500.0 / 6.0).abs() < 0.01);
    }

    #[test]
    fn test_exact_canonical_headers_score_100() {
        let hs = headers(&[
            "TaskID",
            "TaskName",
            "Category",
            "Duration",
            "RequiredSkills",
            "PreferredPhases",
            "MaxConcurrent",
        ]);
        let mapping = map_columns(&hs, EntityKind::Tasks);
        assert_eq!(mapping.confidence, 100.0);
    }

    #[test]
    fn test_confidence_bounds() {
        let none = map_columns(&headers(&["zzz", "qqq"]), EntityKind::Clients);
        assert_eq!(none.confidence, 0.0);

        let all = map_columns(
            &headers(&[
                "ClientID",
                "ClientName",
                "PriorityLevel",
                "RequestedTaskIDs",
                "GroupTag",
                "AttributesJSON",
            ]),
            EntityKind::Clients,
        );
        assert_eq!(all.confidence, 100.0);
    }

    #[test]
    fn test_classify_workers() {
        let hs = headers(&[
            "worker_id",
            "worker_name",
            "skills",
            "available_slots",
            "max_load",
            "team",
            "qualification",
        ]);
        let classification = classify_and_map(&hs);
        assert_eq!(classification.entity_kind, Some(EntityKind::Workers));
        assert!(classification.mapping.confidence > 80.0);
    }

    #[test]
    fn test_classify_empty_headers_is_unknown() {
        let classification = classify_and_map(&[]);
        assert_eq!(classification.entity_kind, None);
        assert_eq!(classification.mapping.confidence, 0.0);
    }

    #[test]
    fn test_classify_no_signal_is_unknown() {
        let classification = classify_and_map(&headers(&["aaa", "bbb", "ccc"]));
        assert_eq!(classification.entity_kind, None);
    }

    #[test]
    fn test_remap_row_passes_unmapped_through() {
        let hs = headers(&["client_id", "extra"]);
        let mapping = map_columns(&hs, EntityKind::Clients);

        let mut row = HashMap::new();
        row.insert("client_id".to_string(), "C1".to_string());
        row.insert("extra".to_string(), "kept".to_string());

        let remapped = remap_row(&row, &mapping);
        assert_eq!(remapped["ClientID"], "C1");
        assert_eq!(remapped["extra"], "kept");
    }
}
