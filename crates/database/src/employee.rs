//! Repository functions for employee operations.

use attrition_structs::{Employee, NewEmployee, encode_features};
use chrono::Utc;
use sqlx::SqliteExecutor;

/// Finds an employee by its ID.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub async fn find_employee_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Employee>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Employee>(
        r"
        SELECT id, identifier, features, target, created_at
        FROM employees
        WHERE id = ?
        ",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Lists employees ordered by ID.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub async fn list_employees<'e, E>(
    executor: E,
    skip: i64,
    limit: i64,
) -> Result<Vec<Employee>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Employee>(
        r"
        SELECT id, identifier, features, target, created_at
        FROM employees
        ORDER BY id
        LIMIT ? OFFSET ?
        ",
    )
    .bind(limit)
    .bind(skip)
    .fetch_all(executor)
    .await
}

/// Counts all employees.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub async fn count_employees<'e, E>(executor: E) -> Result<i64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar("SELECT COUNT(*) FROM employees")
        .fetch_one(executor)
        .await
}

/// Inserts an employee, skipping it if the identifier already exists.
///
/// Returns `true` if a row was inserted.
///
/// # Errors
///
/// Returns an error if the features cannot be encoded or the database
/// operation fails.
pub async fn insert_employee<'e, E>(executor: E, employee: &NewEmployee) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let features =
        encode_features(&employee.features).map_err(|err| sqlx::Error::Encode(Box::new(err)))?;

    let result = sqlx::query(
        r"
        INSERT INTO employees (identifier, features, target, created_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (identifier) DO NOTHING
        ",
    )
    .bind(&employee.identifier)
    .bind(features)
    .bind(&employee.target)
    .bind(Utc::now())
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}
