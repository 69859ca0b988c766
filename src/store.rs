// 🗄️ Data Store - Entity Collections & Session State
// Single authoritative owner of clients/workers/tasks plus derived state:
// validation findings, business rules, and priority weights. In-memory only,
// no persistence layer - every collection lives for one session.

use crate::rules::BusinessRule;
use crate::schema::EntityKind;
use crate::validation::{self, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// ENTITY RECORDS
// ============================================================================

/// Client - requests tasks, carries a priority and free-form attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(rename = "ClientID")]
    pub client_id: String,

    #[serde(rename = "ClientName")]
    pub client_name: String,

    /// Invariant (validated, not enforced here): 1-5
    #[serde(rename = "PriorityLevel")]
    pub priority_level: i64,

    /// Semicolon-delimited Task IDs; referential integrity is the
    /// validator's job, not the store's
    #[serde(rename = "RequestedTaskIDs")]
    pub requested_task_ids: String,

    #[serde(rename = "GroupTag")]
    pub group_tag: String,

    /// Must parse as JSON (validated)
    #[serde(rename = "AttributesJSON")]
    pub attributes_json: String,
}

/// Worker - offers skills and per-phase availability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    #[serde(rename = "WorkerID")]
    pub worker_id: String,

    #[serde(rename = "WorkerName")]
    pub worker_name: String,

    /// Semicolon-delimited skill tags
    #[serde(rename = "Skills")]
    pub skills: String,

    /// String encoding a JSON array of phase numbers, e.g. "[1,3,5]"
    #[serde(rename = "AvailableSlots")]
    pub available_slots: String,

    /// Invariant (validated): >= 1
    #[serde(rename = "MaxLoadPerPhase")]
    pub max_load_per_phase: i64,

    #[serde(rename = "WorkerGroup")]
    pub worker_group: String,

    #[serde(rename = "QualificationLevel")]
    pub qualification_level: String,
}

/// Task - a unit of work with skill requirements and phase preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "TaskID")]
    pub task_id: String,

    #[serde(rename = "TaskName")]
    pub task_name: String,

    #[serde(rename = "Category")]
    pub category: String,

    /// Invariant (validated): >= 1, unit = phases
    #[serde(rename = "Duration")]
    pub duration: i64,

    /// Semicolon-delimited skill tags
    #[serde(rename = "RequiredSkills")]
    pub required_skills: String,

    /// Phase list or range encoding, e.g. "[2,3,4]" or "2-4"
    #[serde(rename = "PreferredPhases")]
    pub preferred_phases: String,

    /// Invariant (validated): >= 1
    #[serde(rename = "MaxConcurrent")]
    pub max_concurrent: i64,
}

// ============================================================================
// ENTITY RECORD TRAIT
// ============================================================================

/// Uniform field access for search scoring and CSV export
pub trait EntityRecord {
    fn kind(&self) -> EntityKind;

    /// Value of this record's unique key column
    fn record_id(&self) -> &str;

    /// All fields as (canonical name, stringified value), in schema order
    fn fields(&self) -> Vec<(&'static str, String)>;

    /// Stringified value of a single canonical field
    fn field(&self, name: &str) -> Option<String> {
        self.fields()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// Build a record from a canonical-keyed row. Missing fields degrade to
    /// defaults; unparsable integers degrade to 0 so the validator reports
    /// them as typed findings instead of ingest failing.
    fn from_row(row: &HashMap<String, String>) -> Self
    where
        Self: Sized;
}

fn row_str(row: &HashMap<String, String>, key: &str) -> String {
    row.get(key).map(|v| v.trim().to_string()).unwrap_or_default()
}

fn row_int(row: &HashMap<String, String>, key: &str) -> i64 {
    row.get(key)
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(0)
}

impl EntityRecord for Client {
    fn kind(&self) -> EntityKind {
        EntityKind::Clients
    }

    fn record_id(&self) -> &str {
        &self.client_id
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ClientID", self.client_id.clone()),
            ("ClientName", self.client_name.clone()),
            ("PriorityLevel", self.priority_level.to_string()),
            ("RequestedTaskIDs", self.requested_task_ids.clone()),
            ("GroupTag", self.group_tag.clone()),
            ("AttributesJSON", self.attributes_json.clone()),
        ]
    }

    fn from_row(row: &HashMap<String, String>) -> Self {
        Client {
            client_id: row_str(row, "ClientID"),
            client_name: row_str(row, "ClientName"),
            priority_level: row_int(row, "PriorityLevel"),
            requested_task_ids: row_str(row, "RequestedTaskIDs"),
            group_tag: row_str(row, "GroupTag"),
            attributes_json: row_str(row, "AttributesJSON"),
        }
    }
}

impl EntityRecord for Worker {
    fn kind(&self) -> EntityKind {
        EntityKind::Workers
    }

    fn record_id(&self) -> &str {
        &self.worker_id
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("WorkerID", self.worker_id.clone()),
            ("WorkerName", self.worker_name.clone()),
            ("Skills", self.skills.clone()),
            ("AvailableSlots", self.available_slots.clone()),
            ("MaxLoadPerPhase", self.max_load_per_phase.to_string()),
            ("WorkerGroup", self.worker_group.clone()),
            ("QualificationLevel", self.qualification_level.clone()),
        ]
    }

    fn from_row(row: &HashMap<String, String>) -> Self {
        Worker {
            worker_id: row_str(row, "WorkerID"),
            worker_name: row_str(row, "WorkerName"),
            skills: row_str(row, "Skills"),
            available_slots: row_str(row, "AvailableSlots"),
            max_load_per_phase: row_int(row, "MaxLoadPerPhase"),
            worker_group: row_str(row, "WorkerGroup"),
            qualification_level: row_str(row, "QualificationLevel"),
        }
    }
}

impl EntityRecord for Task {
    fn kind(&self) -> EntityKind {
        EntityKind::Tasks
    }

    fn record_id(&self) -> &str {
        &self.task_id
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("TaskID", self.task_id.clone()),
            ("TaskName", self.task_name.clone()),
            ("Category", self.category.clone()),
            ("Duration", self.duration.to_string()),
            ("RequiredSkills", self.required_skills.clone()),
            ("PreferredPhases", self.preferred_phases.clone()),
            ("MaxConcurrent", self.max_concurrent.to_string()),
        ]
    }

    fn from_row(row: &HashMap<String, String>) -> Self {
        Task {
            task_id: row_str(row, "TaskID"),
            task_name: row_str(row, "TaskName"),
            category: row_str(row, "Category"),
            duration: row_int(row, "Duration"),
            required_skills: row_str(row, "RequiredSkills"),
            preferred_phases: row_str(row, "PreferredPhases"),
            max_concurrent: row_int(row, "MaxConcurrent"),
        }
    }
}

// ============================================================================
// PRIORITY CRITERIA
// ============================================================================

/// One prioritization criterion; weights are expected (not enforced) to sum
/// to 100 across the collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityCriteria {
    pub id: String,
    pub name: String,
    pub weight: f64,
    pub description: String,
}

fn default_priority_criteria() -> Vec<PriorityCriteria> {
    let defaults = [
        ("1", "Priority Level", 25.0, "Client priority level (1-5)"),
        ("2", "Task Fulfillment", 30.0, "Percentage of requested tasks fulfilled"),
        ("3", "Resource Efficiency", 20.0, "Optimal use of worker capacity"),
        ("4", "Fairness", 15.0, "Equal distribution across clients"),
        ("5", "Speed", 10.0, "Minimize overall completion time"),
    ];

    defaults
        .iter()
        .map(|(id, name, weight, description)| PriorityCriteria {
            id: id.to_string(),
            name: name.to_string(),
            weight: *weight,
            description: description.to_string(),
        })
        .collect()
}

// ============================================================================
// DATA STORE
// ============================================================================

/// Session state container. Components receive it by reference; mutations go
/// through the setters and validation is an explicit synchronous call after
/// a state change - no deferred triggers.
#[derive(Debug, Clone)]
pub struct DataStore {
    clients: Vec<Client>,
    workers: Vec<Worker>,
    tasks: Vec<Task>,
    validation_errors: Vec<ValidationError>,
    business_rules: Vec<BusinessRule>,
    priority_criteria: Vec<PriorityCriteria>,
}

impl DataStore {
    pub fn new() -> Self {
        DataStore {
            clients: Vec::new(),
            workers: Vec::new(),
            tasks: Vec::new(),
            validation_errors: Vec::new(),
            business_rules: Vec::new(),
            priority_criteria: default_priority_criteria(),
        }
    }

    // ------------------------------------------------------------------
    // Entity collections (wholesale replace, never merge)
    // ------------------------------------------------------------------

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn set_clients(&mut self, clients: Vec<Client>) {
        self.clients = clients;
    }

    pub fn set_workers(&mut self, workers: Vec<Worker>) {
        self.workers = workers;
    }

    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    /// Recompute all validation findings from scratch, synchronously.
    /// Returns the findings; they are also retained on the store.
    pub fn run_validation(&mut self) -> &[ValidationError] {
        self.validation_errors =
            validation::run_validation(&self.clients, &self.workers, &self.tasks);
        &self.validation_errors
    }

    pub fn validation_errors(&self) -> &[ValidationError] {
        &self.validation_errors
    }

    // ------------------------------------------------------------------
    // Business rules
    // ------------------------------------------------------------------

    pub fn business_rules(&self) -> &[BusinessRule] {
        &self.business_rules
    }

    pub fn add_business_rule(&mut self, rule: BusinessRule) {
        self.business_rules.push(rule);
    }

    /// Remove a rule by id. Returns false if no rule carried that id.
    pub fn remove_business_rule(&mut self, rule_id: &str) -> bool {
        let before = self.business_rules.len();
        self.business_rules.retain(|rule| rule.id != rule_id);
        self.business_rules.len() != before
    }

    // ------------------------------------------------------------------
    // Priority criteria
    // ------------------------------------------------------------------

    pub fn priority_criteria(&self) -> &[PriorityCriteria] {
        &self.priority_criteria
    }

    pub fn set_priority_criteria(&mut self, criteria: Vec<PriorityCriteria>) {
        self.priority_criteria = criteria;
    }

    pub fn total_priority_weight(&self) -> f64 {
        self.priority_criteria.iter().map(|c| c.weight).sum()
    }

    /// Whether the weights sum to 100. Surfaced as a warning by callers,
    /// never blocks anything.
    pub fn weights_balanced(&self) -> bool {
        (self.total_priority_weight() - 100.0).abs() < 0.1
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleConfig;

    fn test_client(id: &str) -> Client {
        Client {
            client_id: id.to_string(),
            client_name: format!("Client {}", id),
            priority_level: 3,
            requested_task_ids: String::new(),
            group_tag: "Enterprise".to_string(),
            attributes_json: "{}".to_string(),
        }
    }

    #[test]
    fn test_new_store_seeds_default_criteria() {
        let store = DataStore::new();
        assert_eq!(store.priority_criteria().len(), 5);
        assert!(store.weights_balanced());
    }

    #[test]
    fn test_set_clients_replaces_wholesale() {
        let mut store = DataStore::new();
        store.set_clients(vec![test_client("C1"), test_client("C2")]);
        assert_eq!(store.clients().len(), 2);

        store.set_clients(vec![test_client("C9")]);
        assert_eq!(store.clients().len(), 1);
        assert_eq!(store.clients()[0].client_id, "C9");
    }

    #[test]
    fn test_run_validation_is_synchronous() {
        let mut store = DataStore::new();
        let mut bad = test_client("C1");
        bad.priority_level = 9;
        store.set_clients(vec![bad]);

        let errors = store.run_validation();
        assert_eq!(errors.len(), 1);
        assert_eq!(store.validation_errors().len(), 1);
    }

    #[test]
    fn test_add_and_remove_business_rule() {
        let mut store = DataStore::new();
        store.add_business_rule(BusinessRule {
            id: "rule-1".to_string(),
            name: "Co-run T1 and T2".to_string(),
            description: "T1 and T2 run together".to_string(),
            config: RuleConfig::CoRun {
                tasks: vec!["T1".to_string(), "T2".to_string()],
            },
            active: true,
        });

        assert_eq!(store.business_rules().len(), 1);
        assert!(store.remove_business_rule("rule-1"));
        assert!(!store.remove_business_rule("rule-1"));
        assert!(store.business_rules().is_empty());
    }

    #[test]
    fn test_unbalanced_weights_detected() {
        let mut store = DataStore::new();
        let mut criteria = store.priority_criteria().to_vec();
        criteria[0].weight = 60.0;
        store.set_priority_criteria(criteria);
        assert!(!store.weights_balanced());
        assert_eq!(store.total_priority_weight(), 135.0);
    }

    #[test]
    fn test_entity_from_row_degrades_bad_numbers_to_zero() {
        let mut row = HashMap::new();
        row.insert("TaskID".to_string(), "T1".to_string());
        row.insert("Duration".to_string(), "not-a-number".to_string());
        row.insert("MaxConcurrent".to_string(), "2".to_string());

        let task = Task::from_row(&row);
        assert_eq!(task.task_id, "T1");
        assert_eq!(task.duration, 0);
        assert_eq!(task.max_concurrent, 2);
    }

    #[test]
    fn test_entity_field_lookup() {
        let client = test_client("C1");
        assert_eq!(client.field("ClientID").as_deref(), Some("C1"));
        assert_eq!(client.field("PriorityLevel").as_deref(), Some("3"));
        assert_eq!(client.field("Nope"), None);
    }

    #[test]
    fn test_entity_serde_uses_canonical_names() {
        let json = serde_json::to_value(test_client("C1")).unwrap();
        assert_eq!(json["ClientID"], "C1");
        assert_eq!(json["PriorityLevel"], 3);
    }
}
