//! Read access to stored employees and aggregate statistics.

use attrition_structs::{Employee, FeatureMap, Stats, decode_features};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::error::WorkflowError;

/// A stored employee with its features decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeRecord {
    pub id: i64,
    pub identifier: String,
    pub features: FeatureMap,
    pub target: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<Employee> for EmployeeRecord {
    type Error = WorkflowError;

    fn try_from(employee: Employee) -> Result<Self, Self::Error> {
        let features =
            decode_features(&employee.features).map_err(|source| WorkflowError::CorruptFeatures {
                record: "employee",
                id: employee.id,
                source,
            })?;

        Ok(Self {
            id: employee.id,
            identifier: employee.identifier,
            features,
            target: employee.target,
            created_at: employee.created_at,
        })
    }
}

/// Lists employees ordered by ID.
///
/// Rows whose stored features do not decode are logged and skipped.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn list_employees(
    pool: &SqlitePool,
    skip: i64,
    limit: i64,
) -> Result<Vec<EmployeeRecord>, WorkflowError> {
    let employees = database::list_employees(pool, skip, limit)
        .await?
        .into_iter()
        .filter_map(|employee| match EmployeeRecord::try_from(employee) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(error = %err, "Skipping employee with malformed features");
                None
            }
        })
        .collect();

    Ok(employees)
}

/// Fetches one employee.
///
/// # Errors
///
/// Returns [`WorkflowError::EmployeeNotFound`] if absent, or an error if the
/// query fails or the stored features do not decode.
pub async fn get_employee(pool: &SqlitePool, id: i64) -> Result<EmployeeRecord, WorkflowError> {
    database::find_employee_by_id(pool, id)
        .await?
        .ok_or(WorkflowError::EmployeeNotFound(id))?
        .try_into()
}

/// Counts stored employees.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn count_employees(pool: &SqlitePool) -> Result<i64, WorkflowError> {
    Ok(database::count_employees(pool).await?)
}

/// Totals and label breakdowns for employees and logged predictions.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn stats(pool: &SqlitePool) -> Result<Stats, WorkflowError> {
    Ok(database::get_stats(pool).await?)
}

#[cfg(test)]
mod tests {
    use attrition_structs::NewEmployee;
    use database::{create_memory_pool, insert_employee, run_migrations};
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_get_employee_decodes_features() {
        let pool = create_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();

        let mut features = FeatureMap::new();
        features.insert("age".to_string(), json!(30));
        features.insert("poste".to_string(), json!("Cadre Commercial"));
        insert_employee(
            &pool,
            &NewEmployee {
                identifier: "RECORD_0".to_string(),
                features: features.clone(),
                target: Some("Oui".to_string()),
            },
        )
        .await
        .unwrap();

        let employee = get_employee(&pool, 1).await.unwrap();
        assert_eq!(employee.features, features);
        assert_eq!(employee.target.as_deref(), Some("Oui"));
        assert_eq!(count_employees(&pool).await.unwrap(), 1);
        assert_eq!(list_employees(&pool, 0, 10).await.unwrap(), vec![employee]);

        let err = get_employee(&pool, 2).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_employees_skips_malformed_rows() {
        let pool = create_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();

        for (identifier, features) in [
            ("RECORD_0", r#"{"age": 30}"#),
            ("RECORD_1", "not json"),
            ("RECORD_2", r#"{"age": 45}"#),
        ] {
            sqlx::query("INSERT INTO employees (identifier, features, created_at) VALUES (?, ?, ?)")
                .bind(identifier)
                .bind(features)
                .bind(Utc::now())
                .execute(&pool)
                .await
                .unwrap();
        }

        let identifiers: Vec<String> = list_employees(&pool, 0, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|employee| employee.identifier)
            .collect();
        assert_eq!(identifiers, vec!["RECORD_0", "RECORD_2"]);
        assert_eq!(count_employees(&pool).await.unwrap(), 3);

        let err = get_employee(&pool, 2).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadState);
    }
}
