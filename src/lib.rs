// Data Alchemist - Core Library
// Column mapping, validation, business rules, and natural-language search
// over client/worker/task collections. Exposes all modules for the CLI,
// an embedding UI shell, and tests.

pub mod schema;     // Schema Registry - canonical fields & synonyms
pub mod mapper;     // Column Mapper - header mapping & classification
pub mod store;      // Data Store - entities & session state
pub mod validation; // Validation Engine - structural/referential checks
pub mod rules;      // Business Rules - typed configs & NL parser
pub mod query;      // Query Engine - natural-language search
pub mod ingest;     // Ingest - CSV decoding & row conversion
pub mod export;     // Export - CSV text & priority configuration

// Re-export commonly used types
pub use schema::{canonical_fields, parse_phase_list, split_list, EntityKind, FieldSpec};
pub use mapper::{classify_and_map, map_columns, remap_row, Classification, ColumnMapping};
pub use store::{Client, DataStore, EntityRecord, PriorityCriteria, Task, Worker};
pub use validation::{run_validation, Severity, ValidationError, ValidationKind};
pub use rules::{BusinessRule, ParsedRule, RuleConfig, RuleParser, RuleTemplate, RULE_TEMPLATES};
pub use query::{EntityFilter, QueryEngine, SearchResult};
pub use ingest::{
    ingest_csv_file, ingest_table, parse_csv_str, read_csv_table, DataTable, Ingest,
    IngestedEntities,
};
pub use export::{collection_to_csv, export_priority_config};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
