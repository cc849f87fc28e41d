//! Aggregate queries over employees and prediction logs.

use attrition_structs::{LabelCounts, Stats};
use sqlx::SqlitePool;

/// Computes totals and label breakdowns for both tables.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub async fn get_stats(pool: &SqlitePool) -> Result<Stats, sqlx::Error> {
    let employee_groups: Vec<(Option<String>, i64)> =
        sqlx::query_as("SELECT target, COUNT(*) FROM employees GROUP BY target")
            .fetch_all(pool)
            .await?;

    let prediction_groups: Vec<(Option<String>, i64)> = sqlx::query_as(
        "SELECT prediction_result, COUNT(*) FROM prediction_logs GROUP BY prediction_result",
    )
    .fetch_all(pool)
    .await?;

    Ok(Stats {
        employees: LabelCounts::from_groups(&employee_groups),
        predictions: LabelCounts::from_groups(&prediction_groups),
    })
}
