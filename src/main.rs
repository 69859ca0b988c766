// Data Alchemist CLI - import, validate, search, rules
// Thin demo shell over the core library; all real logic lives in the modules.

use anyhow::{bail, Result};
use data_alchemist::{
    ingest_csv_file, DataStore, EntityFilter, QueryEngine, RuleParser, Severity, RULE_TEMPLATES,
};
use std::env;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("validate") if args.len() > 2 => run_validate(&args[2..]),
        Some("search") if args.len() > 3 => run_search(&args[2], &args[3..]),
        Some("rule") if args.len() > 2 => run_rule(&args[2]),
        Some("templates") => run_templates(),
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn print_usage() {
    println!("🧪 Data Alchemist v{}", data_alchemist::VERSION);
    println!();
    println!("Usage:");
    println!("  data-alchemist validate <file.csv>...          import & validate");
    println!("  data-alchemist search <query> <file.csv>...    natural-language search");
    println!("  data-alchemist rule <text>                     parse a business rule");
    println!("  data-alchemist templates                       list rule templates");
}

/// Load each CSV into the store (auto-classified), then validate
fn load_files(files: &[String]) -> Result<DataStore> {
    let mut store = DataStore::new();

    for file in files {
        let ingest = ingest_csv_file(file, &mut store)?;
        println!(
            "📂 {} → {} ({} rows, mapping confidence {:.0}%)",
            file,
            ingest.entity_kind.name(),
            ingest.entities.len(),
            ingest.confidence
        );
    }

    Ok(store)
}

fn run_validate(files: &[String]) -> Result<()> {
    let mut store = load_files(files)?;
    let errors = store.run_validation();

    let error_count = errors.iter().filter(|e| e.severity == Severity::Error).count();
    let warning_count = errors.len() - error_count;

    println!();
    if errors.is_empty() {
        println!("✅ All checks passed");
        return Ok(());
    }

    println!("⚠️  {} errors, {} warnings", error_count, warning_count);
    for error in errors {
        let icon = match error.severity {
            Severity::Error => "✗",
            Severity::Warning => "!",
        };
        println!(
            "  {} [{}] {} / {}: {}",
            icon,
            error.entity.name(),
            error.entity_id,
            error.field,
            error.message
        );
        if let Some(suggestion) = &error.suggestion {
            println!("      → {}", suggestion);
        }
    }

    Ok(())
}

fn run_search(query: &str, rest: &[String]) -> Result<()> {
    // Optional entity filter as first arg: clients/workers/tasks
    let (filter, files) = match rest.first().map(String::as_str) {
        Some("clients") | Some("workers") | Some("tasks") => {
            (EntityFilter::from_name(&rest[0]), &rest[1..])
        }
        _ => (EntityFilter::All, rest),
    };

    if files.is_empty() {
        bail!("search needs at least one CSV file to load");
    }

    let store = load_files(files)?;
    let engine = QueryEngine::new();
    let results = engine.search_store(query, filter, &store);

    println!();
    if results.is_empty() {
        println!("No matches for \"{}\"", query);
        return Ok(());
    }

    println!("🔎 {} matches for \"{}\"", results.len(), query);
    for result in results {
        println!(
            "  {:>3}  {}  (fields: {})",
            result.relevance_score,
            result.id,
            result.matching_fields.join(", ")
        );
    }

    Ok(())
}

fn run_rule(text: &str) -> Result<()> {
    let parser = RuleParser::new();
    let rule = parser.parse_or_fallback(text).into_rule();

    println!("🏷️  Parsed rule ({})", rule.config.rule_type());
    println!("{}", serde_json::to_string_pretty(&rule)?);
    Ok(())
}

fn run_templates() -> Result<()> {
    println!("📋 Rule templates:");
    for template in RULE_TEMPLATES {
        println!("  {} - {}", template.name, template.description);
        println!("      \"{}\"", template.template);
    }
    Ok(())
}
