// 📂 Ingest - CSV Decoding & Row Conversion
// Turns uploaded CSV text into canonical entity collections: decode to
// (headers, rows), classify the header set, remap keys, build typed records.

use crate::mapper::{classify_and_map, remap_row, ColumnMapping};
use crate::schema::EntityKind;
use crate::store::{Client, DataStore, EntityRecord, Task, Worker};
use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;

// ============================================================================
// RAW TABLE
// ============================================================================

/// A decoded tabular upload: header row plus stringly rows. Spreadsheet
/// decoders hand over the same shape, so everything downstream is
/// format-agnostic.
#[derive(Debug, Clone)]
pub struct DataTable {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

/// Read a CSV file into a DataTable
pub fn read_csv_table<P: AsRef<Path>>(path: P) -> Result<DataTable> {
    let mut reader = csv::Reader::from_path(path.as_ref())
        .with_context(|| format!("Failed to open CSV file: {:?}", path.as_ref()))?;

    table_from_reader(&mut reader)
}

/// Parse CSV text already in memory (tests, external decoders)
pub fn parse_csv_str(text: &str) -> Result<DataTable> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    table_from_reader(&mut reader)
}

fn table_from_reader<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<DataTable> {
    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("Failed to read CSV record")?;
        let row: HashMap<String, String> = headers
            .iter()
            .cloned()
            .zip(record.iter().map(|v| v.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(DataTable { headers, rows })
}

// ============================================================================
// INGESTED COLLECTIONS
// ============================================================================

/// Typed output of an ingest run
#[derive(Debug, Clone)]
pub enum IngestedEntities {
    Clients(Vec<Client>),
    Workers(Vec<Worker>),
    Tasks(Vec<Task>),
}

impl IngestedEntities {
    pub fn len(&self) -> usize {
        match self {
            IngestedEntities::Clients(v) => v.len(),
            IngestedEntities::Workers(v) => v.len(),
            IngestedEntities::Tasks(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of classifying and converting one uploaded table
#[derive(Debug, Clone)]
pub struct Ingest {
    pub entity_kind: EntityKind,
    pub confidence: f64,
    pub mapping: ColumnMapping,
    pub entities: IngestedEntities,
}

impl Ingest {
    /// Load the ingested collection into the store (wholesale replace).
    /// The caller runs validation afterwards - loading does not.
    pub fn apply_to_store(&self, store: &mut DataStore) {
        match &self.entities {
            IngestedEntities::Clients(clients) => store.set_clients(clients.clone()),
            IngestedEntities::Workers(workers) => store.set_workers(workers.clone()),
            IngestedEntities::Tasks(tasks) => store.set_tasks(tasks.clone()),
        }
    }
}

/// Classify a decoded table and convert its rows into typed entities.
///
/// An unclassifiable header set is a usage error (the caller must
/// disambiguate), reported through the Result channel - distinct from the
/// validator's data findings.
pub fn ingest_table(table: &DataTable) -> Result<Ingest> {
    let classification = classify_and_map(&table.headers);

    let Some(kind) = classification.entity_kind else {
        bail!(
            "Could not classify headers as clients, workers, or tasks: {:?}",
            table.headers
        );
    };

    let mapping = classification.mapping;
    let canonical_rows: Vec<HashMap<String, String>> = table
        .rows
        .iter()
        .map(|row| remap_row(row, &mapping))
        .collect();

    let entities = match kind {
        EntityKind::Clients => {
            IngestedEntities::Clients(canonical_rows.iter().map(Client::from_row).collect())
        }
        EntityKind::Workers => {
            IngestedEntities::Workers(canonical_rows.iter().map(Worker::from_row).collect())
        }
        EntityKind::Tasks => {
            IngestedEntities::Tasks(canonical_rows.iter().map(Task::from_row).collect())
        }
    };

    Ok(Ingest {
        entity_kind: kind,
        confidence: mapping.confidence,
        mapping,
        entities,
    })
}

/// One-call convenience: decode, classify, convert, load
pub fn ingest_csv_file<P: AsRef<Path>>(path: P, store: &mut DataStore) -> Result<Ingest> {
    let table = read_csv_table(path)?;
    let ingest = ingest_table(&table)?;
    ingest.apply_to_store(store);
    Ok(ingest)
}

// ============================================================================
// TESTS
// ============================================================================
