// 🗂️ Schema Registry - Canonical Fields & Synonyms
// Canonical field definitions and header synonyms for the three entity kinds

use serde::{Deserialize, Serialize};

// ============================================================================
// ENTITY KINDS
// ============================================================================

/// EntityKind - the three first-class record types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Clients,
    Workers,
    Tasks,
}

impl EntityKind {
    /// Classification tie-break order: clients win ties, then workers.
    /// This order is a documented constant, not an accident of iteration.
    pub const CLASSIFICATION_ORDER: [EntityKind; 3] =
        [EntityKind::Clients, EntityKind::Workers, EntityKind::Tasks];

    /// Lowercase plural name used in error records and CLI output
    pub fn name(&self) -> &str {
        match self {
            EntityKind::Clients => "clients",
            EntityKind::Workers => "workers",
            EntityKind::Tasks => "tasks",
        }
    }

    /// Singular code for synthetic IDs (e.g. "duplicate-client-C1")
    pub fn code(&self) -> &str {
        match self {
            EntityKind::Clients => "client",
            EntityKind::Workers => "worker",
            EntityKind::Tasks => "task",
        }
    }

    /// Name of the unique key column for this kind
    pub fn id_field(&self) -> &str {
        match self {
            EntityKind::Clients => "ClientID",
            EntityKind::Workers => "WorkerID",
            EntityKind::Tasks => "TaskID",
        }
    }
}

// ============================================================================
// CANONICAL FIELD SPECS
// ============================================================================

/// A canonical field plus the lowercase header synonyms that map onto it
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub synonyms: &'static [&'static str],
}

const CLIENT_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "ClientID",
        synonyms: &["client_id", "clientid", "id", "client", "customer_id"],
    },
    FieldSpec {
        name: "ClientName",
        synonyms: &["client_name", "clientname", "name", "customer_name", "company"],
    },
    FieldSpec {
        name: "PriorityLevel",
        synonyms: &["priority", "priority_level", "level", "importance"],
    },
    FieldSpec {
        name: "RequestedTaskIDs",
        synonyms: &["requested_tasks", "tasks", "task_ids", "requested_task_ids"],
    },
    FieldSpec {
        name: "GroupTag",
        synonyms: &["group", "tag", "group_tag", "category"],
    },
    FieldSpec {
        name: "AttributesJSON",
        synonyms: &["attributes", "metadata", "json", "details"],
    },
];

const WORKER_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "WorkerID",
        synonyms: &["worker_id", "workerid", "id", "employee_id", "staff_id"],
    },
    FieldSpec {
        name: "WorkerName",
        synonyms: &["worker_name", "workername", "name", "employee_name", "full_name"],
    },
    FieldSpec {
        name: "Skills",
        synonyms: &["skills", "skill", "competencies", "abilities"],
    },
    FieldSpec {
        name: "AvailableSlots",
        synonyms: &["available_slots", "slots", "availability", "phases"],
    },
    FieldSpec {
        name: "MaxLoadPerPhase",
        synonyms: &["max_load", "load", "capacity", "max_capacity"],
    },
    FieldSpec {
        name: "WorkerGroup",
        synonyms: &["group", "team", "department", "worker_group"],
    },
    FieldSpec {
        name: "QualificationLevel",
        synonyms: &["qualification", "level", "seniority", "experience"],
    },
];

const TASK_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "TaskID",
        synonyms: &["task_id", "taskid", "id", "task"],
    },
    FieldSpec {
        name: "TaskName",
        synonyms: &["task_name", "taskname", "name", "title"],
    },
    FieldSpec {
        name: "Category",
        synonyms: &["category", "type", "classification"],
    },
    FieldSpec {
        name: "Duration",
        synonyms: &["duration", "time", "phases", "length"],
    },
    FieldSpec {
        name: "RequiredSkills",
        synonyms: &["required_skills", "skills", "requirements"],
    },
    FieldSpec {
        name: "PreferredPhases",
        synonyms: &["preferred_phases", "phases", "schedule"],
    },
    FieldSpec {
        name: "MaxConcurrent",
        synonyms: &["max_concurrent", "concurrent", "parallel", "max_parallel"],
    },
];

/// Canonical field specs for a given entity kind, in schema order
pub fn canonical_fields(kind: EntityKind) -> &'static [FieldSpec] {
    match kind {
        EntityKind::Clients => CLIENT_FIELDS,
        EntityKind::Workers => WORKER_FIELDS,
        EntityKind::Tasks => TASK_FIELDS,
    }
}

// ============================================================================
// SHARED LIST HELPERS
// ============================================================================

/// Split a semicolon-delimited list, trimming entries and skipping blanks
pub fn split_list(value: &str) -> Vec<&str> {
    value
        .split(';')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse a phase list encoding into phase numbers.
///
/// Accepts a JSON array (`[1,2,3]`), an inclusive range (`2-4`), or a
/// delimited list (`1;2;3` / `1,2,3`). Returns None if nothing parses.
pub fn parse_phase_list(value: &str) -> Option<Vec<i64>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    // JSON array form: [1,2,3]
    if trimmed.starts_with('[') {
        let parsed: Vec<i64> = serde_json::from_str(trimmed).ok()?;
        return Some(parsed);
    }

    // Range form: 2-4 (inclusive)
    if let Some((start, end)) = trimmed.split_once('-') {
        if let (Ok(a), Ok(b)) = (start.trim().parse::<i64>(), end.trim().parse::<i64>()) {
            if a <= b {
                return Some((a..=b).collect());
            }
            return None;
        }
    }

    // Delimited list form: 1;2;3 or 1,2,3
    let phases: Vec<i64> = trimmed
        .split(|c: char| c == ';' || c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<i64>())
        .collect::<Result<_, _>>()
        .ok()?;

    if phases.is_empty() {
        None
    } else {
        Some(phases)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_names() {
        assert_eq!(EntityKind::Clients.name(), "clients");
        assert_eq!(EntityKind::Workers.code(), "worker");
        assert_eq!(EntityKind::Tasks.id_field(), "TaskID");
    }

    #[test]
    fn test_classification_order_favors_clients() {
        assert_eq!(EntityKind::CLASSIFICATION_ORDER[0], EntityKind::Clients);
        assert_eq!(EntityKind::CLASSIFICATION_ORDER[1], EntityKind::Workers);
    }

    #[test]
    fn test_canonical_field_counts() {
        assert_eq!(canonical_fields(EntityKind::Clients).len(), 6);
        assert_eq!(canonical_fields(EntityKind::Workers).len(), 7);
        assert_eq!(canonical_fields(EntityKind::Tasks).len(), 7);
    }

    #[test]
    fn test_split_list_trims_and_skips_blanks() {
        assert_eq!(split_list("T1; T2 ;;T3;"), vec!["T1", "T2", "T3"]);
        assert_eq!(split_list("  "), Vec::<&str>::new());
    }

    #[test]
    fn test_parse_phase_list_json_array() {
        assert_eq!(parse_phase_list("[1,2,5]"), Some(vec![1, 2, 5]));
    }

    #[test]
    fn test_parse_phase_list_range() {
        assert_eq!(parse_phase_list("2-4"), Some(vec![2, 3, 4]));
        assert_eq!(parse_phase_list("4-2"), None);
    }

    #[test]
    fn test_parse_phase_list_delimited() {
        assert_eq!(parse_phase_list("1;2;3"), Some(vec![1, 2, 3]));
        assert_eq!(parse_phase_list("1, 2, 3"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_parse_phase_list_garbage() {
        assert_eq!(parse_phase_list("soon"), None);
        assert_eq!(parse_phase_list(""), None);
        assert_eq!(parse_phase_list("[1,\"x\"]"), None);
    }
}
