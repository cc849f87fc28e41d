//! Import command - loads employee records from a JSON Lines file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use attrition_structs::{FeatureMap, NewEmployee};
use database::insert_employee;
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::info;

/// Number of records committed per transaction.
const BATCH_SIZE: usize = 100;

/// Outcome of an import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Runs the import command.
///
/// Each non-empty line must be a JSON object. `target_field` is removed from
/// the features and stored as the ground-truth label. Records are identified
/// as `RECORD_{n}` in file order; identifiers already present are skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a line is not a JSON object,
/// or a database operation fails.
pub async fn run(pool: &SqlitePool, file: &Path, target_field: &str) -> Result<ImportSummary> {
    info!(file = %file.display(), target_field, "Importing employees");

    let reader = BufReader::new(
        File::open(file).with_context(|| format!("Failed to open {}", file.display()))?,
    );

    let mut summary = ImportSummary::default();
    let mut batch = Vec::with_capacity(BATCH_SIZE);
    let mut record_index = 0;

    for (line_number, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_number + 1))?;
        if line.trim().is_empty() {
            continue;
        }

        let employee = parse_record(record_index, &line, target_field)
            .with_context(|| format!("Invalid record on line {}", line_number + 1))?;
        record_index += 1;
        batch.push(employee);

        if batch.len() == BATCH_SIZE {
            flush(pool, &mut batch, &mut summary).await?;
            info!(imported = summary.inserted, skipped = summary.skipped, "Import progress");
        }
    }

    flush(pool, &mut batch, &mut summary).await?;

    info!(
        inserted = summary.inserted,
        skipped = summary.skipped,
        "Import completed"
    );

    Ok(summary)
}

/// Parses one JSON Lines record into an employee.
///
/// # Errors
///
/// Returns an error if the line is not a JSON object.
pub fn parse_record(index: usize, line: &str, target_field: &str) -> Result<NewEmployee> {
    let record: FeatureMap =
        serde_json::from_str(line).context("Record is not a JSON object")?;

    let mut target = None;
    let mut features = FeatureMap::new();
    for (key, value) in record {
        if key == target_field {
            target = label_text(value);
        } else {
            features.insert(key, value);
        }
    }

    Ok(NewEmployee {
        identifier: format!("RECORD_{index}"),
        features,
        target,
    })
}

fn label_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

async fn flush(
    pool: &SqlitePool,
    batch: &mut Vec<NewEmployee>,
    summary: &mut ImportSummary,
) -> Result<()> {
    if batch.is_empty() {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    for employee in batch.drain(..) {
        if insert_employee(&mut *tx, &employee).await? {
            summary.inserted += 1;
        } else {
            summary.skipped += 1;
        }
    }
    tx.commit().await.context("Failed to commit import batch")?;

    Ok(())
}
