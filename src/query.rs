// 🔎 Query Engine - Natural Language Search
// Converts a free-text query plus an entity filter into a ranked list of
// matching records. Additive heuristic scoring, not probabilistic: literal
// substring hits layered with field-aware bonuses. Fully deterministic.

use crate::schema::{parse_phase_list, split_list, EntityKind};
use crate::store::{Client, DataStore, EntityRecord, Task, Worker};
use regex::Regex;
use serde::Serialize;

// ============================================================================
// SEARCH TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityFilter {
    All,
    Clients,
    Workers,
    Tasks,
}

impl EntityFilter {
    pub fn includes(&self, kind: EntityKind) -> bool {
        match self {
            EntityFilter::All => true,
            EntityFilter::Clients => kind == EntityKind::Clients,
            EntityFilter::Workers => kind == EntityKind::Workers,
            EntityFilter::Tasks => kind == EntityKind::Tasks,
        }
    }

    /// Parse a CLI/UI filter name; anything unrecognized means All
    pub fn from_name(name: &str) -> EntityFilter {
        match name.to_lowercase().as_str() {
            "clients" => EntityFilter::Clients,
            "workers" => EntityFilter::Workers,
            "tasks" => EntityFilter::Tasks,
            _ => EntityFilter::All,
        }
    }
}

/// One ranked hit. `record` carries the full entity for display.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub entity: EntityKind,
    pub record: serde_json::Value,
    pub relevance_score: i64,
    pub matching_fields: Vec<String>,
}

// ============================================================================
// SCORE WEIGHTS
// ============================================================================

const FIELD_MATCH: i64 = 10;
const PRIORITY_MATCH: i64 = 15;
const TASK_COUNT_MATCH: i64 = 12;
const GROUP_MATCH: i64 = 10;
const SKILL_OVERLAP: i64 = 8;
const PHASE_MATCH: i64 = 12;
const DURATION_MATCH: i64 = 15;
const CATEGORY_MATCH: i64 = 10;
const CONCURRENT_MATCH: i64 = 12;
const QUALIFICATION_MATCH: i64 = 8;

const QUALIFICATION_KEYWORDS: [&str; 4] = ["senior", "junior", "lead", "mid"];

// ============================================================================
// QUERY ENGINE
// ============================================================================

/// Compiled query extractors. Build once, search many times.
pub struct QueryEngine {
    priority_num: Regex,
    duration_num: Regex,
    query_phases: Regex,
    more_than: Regex,
    less_than: Regex,
    concurrent_less: Regex,
    group_before: Regex,
    group_after: Regex,
    category_before: Regex,
    category_after: Regex,
}

impl QueryEngine {
    pub fn new() -> Self {
        QueryEngine {
            priority_num: Regex::new(
                r"(?i)(?:priority|level)\s*(?:of|is|equals?|[><=]+|more\s+than|less\s+than|greater\s+than|at\s+least|exactly)?\s*(\d+)",
            )
            .unwrap(),
            duration_num: Regex::new(
                r"(?i)(?:duration|time)\s*(?:of|is|equals?|[><=]+|more\s+than|less\s+than|greater\s+than|at\s+least|exactly)?\s*(\d+)",
            )
            .unwrap(),
            query_phases: Regex::new(
                r"(?i)(?:phases?|available\s+in)\s*(?:in|during|at)?\s*[\[\(]?(\d+\s*-\s*\d+|\d+(?:[,;\s]+\d+)*)[\]\)]?",
            )
            .unwrap(),
            more_than: Regex::new(r"(?i)(?:more\s+than|greater\s+than|above|>)\s*(\d+)").unwrap(),
            less_than: Regex::new(r"(?i)(?:less\s+than|below|under|<)\s*(\d+)").unwrap(),
            concurrent_less: Regex::new(r"(?i)(?:concurrent|parallel).*?(?:less\s+than|<)\s*(\d+)")
                .unwrap(),
            group_before: Regex::new(r"(?i)\b([a-z0-9][a-z0-9\-]*)[\s-]+(?:group|team|department)\b")
                .unwrap(),
            group_after: Regex::new(r"(?i)(?:group|team|department)\s+(?:is\s+|of\s+)?([a-z0-9][a-z0-9\-]*)")
                .unwrap(),
            category_before: Regex::new(r"(?i)\b([a-z0-9][a-z0-9\-]*)\s+category\b").unwrap(),
            category_after: Regex::new(r"(?i)(?:category|type)\s+(?:is\s+|of\s+)?([a-z0-9][a-z0-9\-]*)")
                .unwrap(),
        }
    }

    /// Search the three collections. Results sort descending by relevance;
    /// ties keep insertion order (clients, workers, tasks, collection order).
    pub fn search(
        &self,
        query: &str,
        filter: EntityFilter,
        clients: &[Client],
        workers: &[Worker],
        tasks: &[Task],
    ) -> Vec<SearchResult> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }

        let mut results = Vec::new();

        if filter.includes(EntityKind::Clients) {
            for client in clients {
                self.push_result(&mut results, client, self.score_client(client, &q));
            }
        }

        if filter.includes(EntityKind::Workers) {
            for worker in workers {
                self.push_result(&mut results, worker, self.score_worker(worker, &q));
            }
        }

        if filter.includes(EntityKind::Tasks) {
            for task in tasks {
                self.push_result(&mut results, task, self.score_task(task, &q));
            }
        }

        // Stable sort keeps insertion order for equal scores
        results.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
        results
    }

    /// Convenience wrapper over a store snapshot
    pub fn search_store(&self, query: &str, filter: EntityFilter, store: &DataStore) -> Vec<SearchResult> {
        self.search(query, filter, store.clients(), store.workers(), store.tasks())
    }

    fn push_result<T: EntityRecord + Serialize>(
        &self,
        results: &mut Vec<SearchResult>,
        record: &T,
        score: Score,
    ) {
        // Zero accumulated score excludes the record entirely
        if score.total <= 0 {
            return;
        }

        results.push(SearchResult {
            id: format!("{}-{}", record.kind().code(), record.record_id()),
            entity: record.kind(),
            record: serde_json::to_value(record).unwrap_or(serde_json::Value::Null),
            relevance_score: score.total,
            matching_fields: score.fields,
        });
    }

    // ------------------------------------------------------------------
    // Per-entity scoring
    // ------------------------------------------------------------------

    fn score_client(&self, client: &Client, q: &str) -> Score {
        let mut score = Score::new();
        score.add_field_matches(client, q);

        // Priority keywords: high/low/exact numeric
        if q.contains("priority") || q.contains("level") {
            let exact = self.capture_int(&self.priority_num, q);
            let hit = (q.contains("high") && client.priority_level >= 4)
                || (q.contains("low") && client.priority_level <= 2)
                || exact == Some(client.priority_level);
            if hit {
                score.add(PRIORITY_MATCH, "PriorityLevel");
            }
        }

        // Requested-task-count comparison: "more than N"
        if q.contains("task") {
            if let Some(n) = self.capture_int(&self.more_than, q) {
                let count = split_list(&client.requested_task_ids).len() as i64;
                if count > n {
                    score.add(TASK_COUNT_MATCH, "RequestedTaskIDs");
                }
            }
        }

        // Group tag substring
        if let Some(term) = self.group_term(q) {
            if client.group_tag.to_lowercase().contains(&term) {
                score.add(GROUP_MATCH, "GroupTag");
            }
        }

        score
    }

    fn score_worker(&self, worker: &Worker, q: &str) -> Score {
        let mut score = Score::new();
        score.add_field_matches(worker, q);

        // Skill-token overlap
        if q.contains("skill") || q.contains("require") {
            let overlap = skill_overlap(&worker.skills, q);
            if overlap > 0 {
                score.add(SKILL_OVERLAP * overlap, "Skills");
            }
        }

        // Phase availability intersection; bad JSON contributes nothing
        if q.contains("phase") || q.contains("available") {
            if let Ok(slots) = serde_json::from_str::<Vec<i64>>(&worker.available_slots) {
                if let Some(wanted) = self.query_phase_list(q) {
                    if wanted.iter().any(|p| slots.contains(p)) {
                        score.add(PHASE_MATCH, "AvailableSlots");
                    }
                }
            }
        }

        // Worker group substring
        if let Some(term) = self.group_term(q) {
            if worker.worker_group.to_lowercase().contains(&term) {
                score.add(GROUP_MATCH, "WorkerGroup");
            }
        }

        // Qualification keywords
        let qualification = worker.qualification_level.to_lowercase();
        for keyword in QUALIFICATION_KEYWORDS {
            if q.contains(keyword) && qualification.contains(keyword) {
                score.add(QUALIFICATION_MATCH, "QualificationLevel");
                break;
            }
        }

        score
    }

    fn score_task(&self, task: &Task, q: &str) -> Score {
        let mut score = Score::new();
        score.add_field_matches(task, q);

        // Duration comparison: more than / less than / exact
        if let Some(n) = self.capture_int(&self.duration_num, q) {
            let hit = if q.contains("more than") || q.contains('>') {
                task.duration > n
            } else if q.contains("less than") || q.contains('<') {
                task.duration < n
            } else {
                task.duration == n
            };
            if hit {
                score.add(DURATION_MATCH, "Duration");
            }
        }

        // Required-skill overlap
        if q.contains("skill") || q.contains("require") {
            let overlap = skill_overlap(&task.required_skills, q);
            if overlap > 0 {
                score.add(SKILL_OVERLAP * overlap, "RequiredSkills");
            }
        }

        // Preferred-phase intersection; unparsable encodings contribute nothing
        if q.contains("phase") || q.contains("available") {
            if let Some(preferred) = parse_phase_list(&task.preferred_phases) {
                if let Some(wanted) = self.query_phase_list(q) {
                    if wanted.iter().any(|p| preferred.contains(p)) {
                        score.add(PHASE_MATCH, "PreferredPhases");
                    }
                }
            }
        }

        // Category substring
        if let Some(term) = self.category_term(q) {
            if task.category.to_lowercase().contains(&term) {
                score.add(CATEGORY_MATCH, "Category");
            }
        }

        // MaxConcurrent threshold
        if q.contains("concurrent") || q.contains("parallel") {
            if let Some(n) = self.capture_int(&self.concurrent_less, q) {
                if task.max_concurrent < n {
                    score.add(CONCURRENT_MATCH, "MaxConcurrent");
                }
            }
        }

        score
    }

    // ------------------------------------------------------------------
    // Extractors
    // ------------------------------------------------------------------

    fn capture_int(&self, re: &Regex, q: &str) -> Option<i64> {
        re.captures(q)?.get(1)?.as_str().parse().ok()
    }

    /// Phase numbers mentioned in the query, ranges expanded
    fn query_phase_list(&self, q: &str) -> Option<Vec<i64>> {
        let caps = self.query_phases.captures(q)?;
        parse_phase_list(caps.get(1)?.as_str())
    }

    /// Group/team/department name mentioned in the query, lowercased.
    /// "<name> group" phrasing wins over "group <name>".
    fn group_term(&self, q: &str) -> Option<String> {
        if let Some(caps) = self.group_before.captures(q) {
            return Some(caps[1].to_lowercase());
        }
        self.group_after
            .captures(q)
            .map(|caps| caps[1].to_lowercase())
    }

    /// Category name mentioned in the query, lowercased
    fn category_term(&self, q: &str) -> Option<String> {
        if let Some(caps) = self.category_before.captures(q) {
            return Some(caps[1].to_lowercase());
        }
        self.category_after
            .captures(q)
            .map(|caps| caps[1].to_lowercase())
    }
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SCORING HELPERS
// ============================================================================

struct Score {
    total: i64,
    fields: Vec<String>,
}

impl Score {
    fn new() -> Self {
        Score {
            total: 0,
            fields: Vec::new(),
        }
    }

    fn add(&mut self, points: i64, field: &str) {
        self.total += points;
        if !self.fields.iter().any(|f| f == field) {
            self.fields.push(field.to_string());
        }
    }

    /// Literal substring pass: +10 per field whose lowercased value contains
    /// the query or vice versa. Empty values never match.
    fn add_field_matches<T: EntityRecord>(&mut self, record: &T, q: &str) {
        for (name, value) in record.fields() {
            let lowered = value.to_lowercase();
            if lowered.is_empty() {
                continue;
            }
            if lowered.contains(q) || q.contains(&lowered) {
                self.add(FIELD_MATCH, name);
            }
        }
    }
}

/// Count overlapping tokens between the query's words and a semicolon skill
/// list. Symmetric substring per pair; short query words are noise, skip them.
fn skill_overlap(skills: &str, q: &str) -> i64 {
    let skill_tags: Vec<String> = split_list(skills)
        .iter()
        .map(|s| s.to_lowercase())
        .collect();

    let mut overlap = 0;
    for term in q.split_whitespace() {
        let term = term.trim_matches(|c: char| !c.is_alphanumeric());
        if term.len() < 3 {
            continue;
        }
        for tag in &skill_tags {
            if tag.contains(term) || term.contains(tag.as_str()) {
                overlap += 1;
            }
        }
    }
    overlap
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: &str, priority: i64, tasks: &str, group: &str) -> Client {
        Client {
            client_id: id.to_string(),
            client_name: format!("{} Corp", id),
            priority_level: priority,
            requested_task_ids: tasks.to_string(),
            group_tag: group.to_string(),
            attributes_json: "{}".to_string(),
        }
    }

    fn worker(id: &str, skills: &str, slots: &str) -> Worker {
        Worker {
            worker_id: id.to_string(),
            worker_name: format!("{} Person", id),
            skills: skills.to_string(),
            available_slots: slots.to_string(),
            max_load_per_phase: 2,
            worker_group: "AI-Team".to_string(),
            qualification_level: "Senior".to_string(),
        }
    }

    fn task(id: &str, category: &str, duration: i64, skills: &str) -> Task {
        Task {
            task_id: id.to_string(),
            task_name: format!("{} Job", id),
            category: category.to_string(),
            duration,
            required_skills: skills.to_string(),
            preferred_phases: "[1,2]".to_string(),
            max_concurrent: 4,
        }
    }

    #[test]
    fn test_skill_query_includes_matching_worker_only() {
        let engine = QueryEngine::new();
        let workers = vec![
            worker("W1", "Python;SQL", "[1,2]"),
            worker("W2", "Java", "[1,2]"),
        ];

        let results = engine.search("workers with Python skills", EntityFilter::Workers, &[], &workers, &[]);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "worker-W1");
        assert!(results[0].relevance_score >= 8);
        assert!(results[0].matching_fields.contains(&"Skills".to_string()));
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let engine = QueryEngine::new();
        let workers = vec![worker("W1", "Python", "[1]")];
        assert!(engine.search("   ", EntityFilter::All, &[], &workers, &[]).is_empty());
    }

    #[test]
    fn test_high_priority_clients() {
        let engine = QueryEngine::new();
        let clients = vec![
            client("C1", 5, "", "Enterprise"),
            client("C2", 2, "", "Startup"),
        ];

        let results = engine.search("high priority clients", EntityFilter::Clients, &clients, &[], &[]);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "client-C1");
        assert_eq!(results[0].relevance_score, 15);
        assert_eq!(results[0].matching_fields, vec!["PriorityLevel"]);
    }

    #[test]
    fn test_exact_priority_level() {
        let engine = QueryEngine::new();
        let clients = vec![client("C1", 3, "", ""), client("C2", 4, "", "")];

        let results = engine.search("clients with priority level 3", EntityFilter::Clients, &clients, &[], &[]);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "client-C1");
    }

    #[test]
    fn test_task_count_comparison() {
        let engine = QueryEngine::new();
        let clients = vec![
            client("C1", 5, "T1;T2;T3;T4", ""),
            client("C2", 5, "T1", ""),
        ];

        let results = engine.search(
            "clients requesting more than 3 tasks",
            EntityFilter::Clients,
            &clients,
            &[],
            &[],
        );

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "client-C1");
        assert_eq!(results[0].relevance_score, 12);
    }

    #[test]
    fn test_duration_more_than() {
        let engine = QueryEngine::new();
        let tasks = vec![
            task("T1", "Development", 3, "Python"),
            task("T2", "Development", 1, "Python"),
        ];

        let results = engine.search(
            "tasks with duration more than 2",
            EntityFilter::Tasks,
            &[],
            &[],
            &tasks,
        );

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "task-T1");
        assert_eq!(results[0].matching_fields, vec!["Duration"]);
    }

    #[test]
    fn test_category_extraction() {
        let engine = QueryEngine::new();
        let tasks = vec![
            task("T1", "Development", 2, ""),
            task("T2", "Testing", 2, ""),
        ];

        let results = engine.search(
            "show everything in the Development category",
            EntityFilter::Tasks,
            &[],
            &[],
            &tasks,
        );

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "task-T1");
    }

    #[test]
    fn test_phase_intersection_for_workers() {
        let engine = QueryEngine::new();
        let workers = vec![
            worker("W1", "", "[1,3]"),
            worker("W2", "", "[2]"),
            worker("W3", "", "not json"),
        ];

        let results = engine.search(
            "who is available in phases 1 and 3",
            EntityFilter::Workers,
            &[],
            &workers,
            &[],
        );

        // Bad JSON is a local no-match, not an abort
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "worker-W1");
        assert_eq!(results[0].matching_fields, vec!["AvailableSlots"]);
    }

    #[test]
    fn test_group_term_matching() {
        let engine = QueryEngine::new();
        let workers = vec![worker("W1", "", "[1]")];

        let results = engine.search(
            "find people in the AI-Team group",
            EntityFilter::Workers,
            &[],
            &workers,
            &[],
        );

        assert_eq!(results.len(), 1);
        assert!(results[0].matching_fields.contains(&"WorkerGroup".to_string()));
    }

    #[test]
    fn test_client_group_tag_matching() {
        let engine = QueryEngine::new();
        let clients = vec![
            client("C1", 3, "", "Enterprise"),
            client("C2", 3, "", "Startup"),
        ];

        let results = engine.search(
            "clients in the Enterprise group",
            EntityFilter::Clients,
            &clients,
            &[],
            &[],
        );

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "client-C1");
        // literal field hit plus the group-term bonus on the same field
        assert_eq!(results[0].relevance_score, 20);
        assert_eq!(results[0].matching_fields, vec!["GroupTag"]);
    }

    #[test]
    fn test_qualification_keyword_bonus() {
        let engine = QueryEngine::new();
        let mut junior = worker("W2", "", "[1]");
        junior.qualification_level = "Junior".to_string();
        let workers = vec![worker("W1", "", "[1]"), junior];

        let results = engine.search(
            "find workers with senior qualification",
            EntityFilter::Workers,
            &[],
            &workers,
            &[],
        );

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "worker-W1");
        // literal field hit plus the keyword bonus on the same field
        assert_eq!(results[0].relevance_score, 18);
        assert_eq!(results[0].matching_fields, vec!["QualificationLevel"]);
    }

    #[test]
    fn test_concurrent_threshold() {
        let engine = QueryEngine::new();
        let mut limited = task("T1", "Ops", 2, "");
        limited.max_concurrent = 2;
        let tasks = vec![limited];

        let results = engine.search(
            "tasks with concurrent workers less than 3",
            EntityFilter::Tasks,
            &[],
            &[],
            &tasks,
        );

        assert_eq!(results.len(), 1);
        assert!(results[0].matching_fields.contains(&"MaxConcurrent".to_string()));
    }

    #[test]
    fn test_literal_field_match() {
        let engine = QueryEngine::new();
        let mut acme = client("C7", 3, "", "Enterprise");
        acme.client_name = "Acme".to_string();

        let results = engine.search("C7", EntityFilter::All, &[acme], &[], &[]);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].relevance_score, 10);
        assert_eq!(results[0].matching_fields, vec!["ClientID"]);
    }

    #[test]
    fn test_results_sorted_descending_stable() {
        let engine = QueryEngine::new();
        let workers = vec![
            worker("W1", "Python", "[1]"),
            worker("W2", "Python;MicroPython", "[1]"),
            worker("W3", "Python", "[1]"),
        ];

        let results = engine.search(
            "workers with Python skills",
            EntityFilter::Workers,
            &[],
            &workers,
            &[],
        );

        assert_eq!(results.len(), 3);
        // "python" overlaps both of W2's tags, so W2 ranks first;
        // the W1/W3 tie keeps collection order
        assert_eq!(results[0].id, "worker-W2");
        assert_eq!(results[1].id, "worker-W1");
        assert_eq!(results[2].id, "worker-W3");
    }

    #[test]
    fn test_score_monotonicity() {
        let engine = QueryEngine::new();
        let plain = vec![worker("W1", "Python", "[2]")];
        let enriched = vec![worker("W1", "Python", "[1]")]; // adds a phase hit

        let q = "workers with Python skills available in phase 1";
        let base = engine.search(q, EntityFilter::Workers, &[], &plain, &[]);
        let more = engine.search(q, EntityFilter::Workers, &[], &enriched, &[]);

        assert!(more[0].relevance_score >= base[0].relevance_score);
    }

    #[test]
    fn test_filter_excludes_other_entities() {
        let engine = QueryEngine::new();
        let clients = vec![client("C1", 5, "", "")];
        let tasks = vec![task("T1", "Development", 2, "")];

        let results = engine.search(
            "high priority level 5",
            EntityFilter::Tasks,
            &clients,
            &[],
            &tasks,
        );

        assert!(results.iter().all(|r| r.entity == EntityKind::Tasks));
    }
}
