// ✅ Validation Engine - Structural & Referential Checks
// Fixed battery of checks over the three collections. Total and
// deterministic: malformed input degrades to a typed finding, never a panic,
// and every run recomputes the full list from scratch.

use crate::schema::{split_list, EntityKind};
use crate::store::{Client, Task, Worker};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// FINDING TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Finding taxonomy. Warnings never block downstream use; only errors are
/// expected to gate "proceed" actions in a surrounding UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationKind {
    /// Malformed JSON or out-of-range numeric field
    Structural,
    /// Dangling ID reference
    Referential,
    /// Non-unique entity ID
    DuplicateKey,
    /// Required skill with no matching worker
    Coverage,
}

/// One validation finding. The id is a stable synthetic key derived from
/// entity id + field (+ discriminator) so consumers can deduplicate and
/// re-display targeted findings across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub id: String,
    pub severity: Severity,
    pub kind: ValidationKind,
    pub entity: EntityKind,
    pub entity_id: String,
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationError {
    fn error(
        id: String,
        kind: ValidationKind,
        entity: EntityKind,
        entity_id: &str,
        field: &str,
        message: String,
        suggestion: String,
    ) -> Self {
        ValidationError {
            id,
            severity: Severity::Error,
            kind,
            entity,
            entity_id: entity_id.to_string(),
            field: field.to_string(),
            message,
            suggestion: Some(suggestion),
        }
    }

    fn warning(
        id: String,
        kind: ValidationKind,
        entity: EntityKind,
        entity_id: &str,
        field: &str,
        message: String,
        suggestion: String,
    ) -> Self {
        ValidationError {
            id,
            severity: Severity::Warning,
            kind,
            entity,
            entity_id: entity_id.to_string(),
            field: field.to_string(),
            message,
            suggestion: Some(suggestion),
        }
    }
}

// ============================================================================
// VALIDATION RUN
// ============================================================================

/// Run the full battery: clients, then workers, then tasks, then duplicate
/// IDs. Findings append in that fixed pass order - no sorting by severity.
pub fn run_validation(
    clients: &[Client],
    workers: &[Worker],
    tasks: &[Task],
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    validate_clients(clients, tasks, &mut errors);
    validate_workers(workers, &mut errors);
    validate_tasks(tasks, workers, &mut errors);
    validate_duplicate_ids(clients, workers, tasks, &mut errors);

    errors
}

fn validate_clients(clients: &[Client], tasks: &[Task], errors: &mut Vec<ValidationError>) {
    for client in clients {
        // Priority level range
        if client.priority_level < 1 || client.priority_level > 5 {
            errors.push(ValidationError::error(
                format!("{}-priority", client.client_id),
                ValidationKind::Structural,
                EntityKind::Clients,
                &client.client_id,
                "PriorityLevel",
                "Priority level must be between 1 and 5".to_string(),
                "Set priority level to a value between 1-5".to_string(),
            ));
        }

        // Every requested task must exist
        for task_id in split_list(&client.requested_task_ids) {
            if !tasks.iter().any(|t| t.task_id == task_id) {
                errors.push(ValidationError::error(
                    format!("{}-task-{}", client.client_id, task_id),
                    ValidationKind::Referential,
                    EntityKind::Clients,
                    &client.client_id,
                    "RequestedTaskIDs",
                    format!("Referenced task {} does not exist", task_id),
                    format!("Remove {} or add it to tasks data", task_id),
                ));
            }
        }

        // Attributes must parse as JSON
        if serde_json::from_str::<Value>(&client.attributes_json).is_err() {
            errors.push(ValidationError::error(
                format!("{}-json", client.client_id),
                ValidationKind::Structural,
                EntityKind::Clients,
                &client.client_id,
                "AttributesJSON",
                "Invalid JSON format".to_string(),
                "Fix JSON syntax".to_string(),
            ));
        }
    }
}

fn validate_workers(workers: &[Worker], errors: &mut Vec<ValidationError>) {
    for worker in workers {
        if worker.max_load_per_phase < 1 {
            errors.push(ValidationError::error(
                format!("{}-load", worker.worker_id),
                ValidationKind::Structural,
                EntityKind::Workers,
                &worker.worker_id,
                "MaxLoadPerPhase",
                "Max load per phase must be at least 1".to_string(),
                "Set max load to a positive number".to_string(),
            ));
        }

        // AvailableSlots: JSON array of numbers >= 1, one aggregated finding
        if !slots_are_valid(&worker.available_slots) {
            errors.push(ValidationError::error(
                format!("{}-slots", worker.worker_id),
                ValidationKind::Structural,
                EntityKind::Workers,
                &worker.worker_id,
                "AvailableSlots",
                "Available slots must be a valid array of positive numbers".to_string(),
                "Format as [1,2,3,4,5]".to_string(),
            ));
        }
    }
}

fn slots_are_valid(encoded: &str) -> bool {
    match serde_json::from_str::<Value>(encoded) {
        Ok(Value::Array(items)) => items
            .iter()
            .all(|item| item.as_f64().map(|n| n >= 1.0).unwrap_or(false)),
        _ => false,
    }
}

fn validate_tasks(tasks: &[Task], workers: &[Worker], errors: &mut Vec<ValidationError>) {
    // All skill tags any worker offers, trimmed
    let available_skills: Vec<&str> = workers
        .iter()
        .flat_map(|w| split_list(&w.skills))
        .collect();

    for task in tasks {
        if task.duration < 1 {
            errors.push(ValidationError::error(
                format!("{}-duration", task.task_id),
                ValidationKind::Structural,
                EntityKind::Tasks,
                &task.task_id,
                "Duration",
                "Duration must be at least 1".to_string(),
                "Set duration to a positive number".to_string(),
            ));
        }

        if task.max_concurrent < 1 {
            errors.push(ValidationError::error(
                format!("{}-concurrent", task.task_id),
                ValidationKind::Structural,
                EntityKind::Tasks,
                &task.task_id,
                "MaxConcurrent",
                "Max concurrent must be at least 1".to_string(),
                "Set max concurrent to a positive number".to_string(),
            ));
        }

        // Uncovered skills are warnings, not errors
        for skill in split_list(&task.required_skills) {
            if !available_skills.contains(&skill) {
                errors.push(ValidationError::warning(
                    format!("{}-skill-{}", task.task_id, skill),
                    ValidationKind::Coverage,
                    EntityKind::Tasks,
                    &task.task_id,
                    "RequiredSkills",
                    format!("No workers have skill: {}", skill),
                    format!("Add workers with {} skill or remove from requirements", skill),
                ));
            }
        }
    }
}

fn validate_duplicate_ids(
    clients: &[Client],
    workers: &[Worker],
    tasks: &[Task],
    errors: &mut Vec<ValidationError>,
) {
    let client_ids: Vec<&str> = clients.iter().map(|c| c.client_id.as_str()).collect();
    let worker_ids: Vec<&str> = workers.iter().map(|w| w.worker_id.as_str()).collect();
    let task_ids: Vec<&str> = tasks.iter().map(|t| t.task_id.as_str()).collect();

    push_duplicates(&client_ids, EntityKind::Clients, errors);
    push_duplicates(&worker_ids, EntityKind::Workers, errors);
    push_duplicates(&task_ids, EntityKind::Tasks, errors);
}

/// "Appears again" semantics: an occurrence is a duplicate when an earlier
/// index holds the same ID, so N copies of one ID yield N-1 findings.
fn push_duplicates(ids: &[&str], kind: EntityKind, errors: &mut Vec<ValidationError>) {
    for (index, id) in ids.iter().enumerate() {
        if ids[..index].contains(id) {
            errors.push(ValidationError::error(
                format!("duplicate-{}-{}", kind.code(), id),
                ValidationKind::DuplicateKey,
                kind,
                id,
                kind.id_field(),
                format!("Duplicate {}: {}", kind.id_field(), id),
                format!("Ensure all {}s are unique", kind.id_field()),
            ));
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
