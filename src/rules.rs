// 🏷️ Business Rules - Typed Configs, Templates & NL Parser
// Converts free-text rule descriptions into structured rule records via an
// ordered chain of pattern detectors; falls back to a generic pattern-match
// rule so parsing never hard-fails.

use regex::Regex;
use serde::{Deserialize, Serialize};

// ============================================================================
// RULE DEFINITION
// ============================================================================

/// Type-specific rule configuration. Tagged union keyed by rule type - each
/// variant carries its own strongly-typed config record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config")]
pub enum RuleConfig {
    #[serde(rename = "coRun", rename_all = "camelCase")]
    CoRun { tasks: Vec<String> },

    #[serde(rename = "slotRestriction", rename_all = "camelCase")]
    SlotRestriction { group: String, min_common_slots: i64 },

    #[serde(rename = "loadLimit", rename_all = "camelCase")]
    LoadLimit {
        worker_group: String,
        max_slots_per_phase: i64,
    },

    #[serde(rename = "phaseWindow", rename_all = "camelCase")]
    PhaseWindow {
        task_id: String,
        allowed_phases: Vec<i64>,
    },

    #[serde(rename = "patternMatch", rename_all = "camelCase")]
    PatternMatch { pattern: String },

    #[serde(rename = "precedence", rename_all = "camelCase")]
    Precedence {
        prerequisite: String,
        dependent: String,
    },
}

impl RuleConfig {
    /// Rule type tag as exposed to consumers (camelCase, matches serde)
    pub fn rule_type(&self) -> &'static str {
        match self {
            RuleConfig::CoRun { .. } => "coRun",
            RuleConfig::SlotRestriction { .. } => "slotRestriction",
            RuleConfig::LoadLimit { .. } => "loadLimit",
            RuleConfig::PhaseWindow { .. } => "phaseWindow",
            RuleConfig::PatternMatch { .. } => "patternMatch",
            RuleConfig::Precedence { .. } => "precedence",
        }
    }
}

/// A session-scoped business rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRule {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(flatten)]
    pub config: RuleConfig,
    pub active: bool,
}

// ============================================================================
// RULE TEMPLATES
// ============================================================================

/// Fixed template surface consumed by a UI to pre-fill the rule input
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RuleTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub rule_type: &'static str,
    pub template: &'static str,
    pub parameters: &'static [&'static str],
}

pub const RULE_TEMPLATES: [RuleTemplate; 5] = [
    RuleTemplate {
        id: "coRun",
        name: "Co-Run Tasks",
        description: "Ensure specific tasks run together in the same phase",
        rule_type: "coRun",
        template: "Tasks {task1} and {task2} should run together",
        parameters: &["task1", "task2"],
    },
    RuleTemplate {
        id: "slotRestriction",
        name: "Slot Restriction",
        description: "Limit available slots for specific groups",
        rule_type: "slotRestriction",
        template: "{group} should have at least {minSlots} common slots",
        parameters: &["group", "minSlots"],
    },
    RuleTemplate {
        id: "loadLimit",
        name: "Load Limit",
        description: "Set maximum workload per phase for workers",
        rule_type: "loadLimit",
        template: "{workerGroup} should not exceed {maxSlots} slots per phase",
        parameters: &["workerGroup", "maxSlots"],
    },
    RuleTemplate {
        id: "phaseWindow",
        name: "Phase Window",
        description: "Restrict tasks to specific phases",
        rule_type: "phaseWindow",
        template: "Task {taskId} should only run in phases {phases}",
        parameters: &["taskId", "phases"],
    },
    RuleTemplate {
        id: "precedence",
        name: "Task Precedence",
        description: "Define task dependencies and order",
        rule_type: "precedence",
        template: "Task {task1} must complete before {task2} can start",
        parameters: &["task1", "task2"],
    },
];

// ============================================================================
// NL RULE PARSER
// ============================================================================

/// A parsed-but-not-yet-persisted rule. `into_rule` mints the session id.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRule {
    pub name: String,
    pub description: String,
    pub config: RuleConfig,
}

impl ParsedRule {
    pub fn into_rule(self) -> BusinessRule {
        BusinessRule {
            id: format!("rule-{}", uuid::Uuid::new_v4()),
            name: self.name,
            description: self.description,
            config: self.config,
            active: true,
        }
    }
}

/// Ordered detector chain over free-text rule descriptions.
///
/// Detector order is the tie-break: the first detector whose trigger words
/// and extractions both fire wins. No ranking across detectors.
pub struct RuleParser {
    task_id: Regex,
    integer: Regex,
    named_group: Regex,
    word: Regex,
    phase_list: Regex,
}

impl RuleParser {
    pub fn new() -> Self {
        RuleParser {
            // Task-ID-shaped token: one letter followed by digits
            task_id: Regex::new(r"(?i)\b([A-Za-z]\d+)\b").unwrap(),
            integer: Regex::new(r"\d+").unwrap(),
            named_group: Regex::new(r"(?i)\b([A-Za-z][A-Za-z0-9_-]*)[\s-]+(?:team|group)\b")
                .unwrap(),
            word: Regex::new(r"[A-Za-z][A-Za-z0-9_-]*").unwrap(),
            phase_list: Regex::new(r"(?i)phases?\s+(\d+(?:\s*(?:,|;|-|and)\s*\d+)*)").unwrap(),
        }
    }

    /// Apply the detector chain. None means no specific pattern matched;
    /// callers wanting total behavior use `parse_or_fallback`.
    pub fn parse(&self, text: &str) -> Option<ParsedRule> {
        let lower = text.to_lowercase();

        self.detect_co_run(text, &lower)
            .or_else(|| self.detect_load_limit(text, &lower))
            .or_else(|| self.detect_phase_window(text, &lower))
            .or_else(|| self.detect_precedence(text, &lower))
            .or_else(|| self.detect_slot_restriction(text, &lower))
    }

    /// Total variant: unmatched input becomes a generic pattern-match rule
    /// storing the raw text.
    pub fn parse_or_fallback(&self, text: &str) -> ParsedRule {
        self.parse(text).unwrap_or_else(|| ParsedRule {
            name: "Custom Rule".to_string(),
            description: text.to_string(),
            config: RuleConfig::PatternMatch {
                pattern: text.to_string(),
            },
        })
    }

    fn task_ids(&self, text: &str) -> Vec<String> {
        self.task_id
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn first_integer(&self, text: &str) -> Option<i64> {
        self.integer.find(text)?.as_str().parse().ok()
    }

    /// Group name token: prefer "<name> team/group"; otherwise the first
    /// plain word in the text.
    fn group_name(&self, text: &str) -> Option<String> {
        if let Some(caps) = self.named_group.captures(text) {
            return Some(caps[1].to_string());
        }
        self.word.find(text).map(|m| m.as_str().to_string())
    }

    fn detect_co_run(&self, text: &str, lower: &str) -> Option<ParsedRule> {
        if !(lower.contains("together")
            || lower.contains("same time")
            || lower.contains("simultaneously"))
        {
            return None;
        }

        let tasks = self.task_ids(text);
        if tasks.len() < 2 {
            return None;
        }

        Some(ParsedRule {
            name: format!("Co-run {}", tasks.join(" and ")),
            description: text.to_string(),
            config: RuleConfig::CoRun { tasks },
        })
    }

    fn detect_load_limit(&self, text: &str, lower: &str) -> Option<ParsedRule> {
        if !(lower.contains("not exceed") || lower.contains("maximum") || lower.contains("limit"))
        {
            return None;
        }

        let group = self.group_name(text)?;
        let max_slots = self.first_integer(text)?;

        Some(ParsedRule {
            name: format!("Load limit for {}", group),
            description: text.to_string(),
            config: RuleConfig::LoadLimit {
                worker_group: group,
                max_slots_per_phase: max_slots,
            },
        })
    }

    fn detect_phase_window(&self, text: &str, lower: &str) -> Option<ParsedRule> {
        if !(lower.contains("only in phase")
            || lower.contains("restrict to phase")
            || lower.contains("must run in"))
        {
            return None;
        }

        let task_id = self.task_ids(text).into_iter().next()?;
        let caps = self.phase_list.captures(text)?;
        let phases: Vec<i64> = self
            .integer
            .find_iter(&caps[1])
            .filter_map(|m| m.as_str().parse().ok())
            .collect();

        if phases.is_empty() {
            return None;
        }

        Some(ParsedRule {
            name: format!("Phase restriction for {}", task_id),
            description: text.to_string(),
            config: RuleConfig::PhaseWindow {
                task_id,
                allowed_phases: phases,
            },
        })
    }

    fn detect_precedence(&self, text: &str, lower: &str) -> Option<ParsedRule> {
        if !(lower.contains("before") || lower.contains("after") || lower.contains("depends on"))
        {
            return None;
        }

        let mut tasks = self.task_ids(text).into_iter();
        let prerequisite = tasks.next()?;
        let dependent = tasks.next()?;

        Some(ParsedRule {
            name: format!("{} before {}", prerequisite, dependent),
            description: text.to_string(),
            config: RuleConfig::Precedence {
                prerequisite,
                dependent,
            },
        })
    }

    fn detect_slot_restriction(&self, text: &str, lower: &str) -> Option<ParsedRule> {
        if !(lower.contains("common slots") || lower.contains("shared availability")) {
            return None;
        }

        let group = self.group_name(text)?;
        let min_slots = self.first_integer(text)?;

        Some(ParsedRule {
            name: format!("Slot restriction for {}", group),
            description: text.to_string(),
            config: RuleConfig::SlotRestriction {
                group,
                min_common_slots: min_slots,
            },
        })
    }
}

impl Default for RuleParser {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
