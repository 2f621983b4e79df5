//! Monthly spending limits per category.

use rusqlite::{Connection, Row};
use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;

use crate::{Error, auth::UserID, money::parse_decimal};

/// A monthly spending limit for one category.
///
/// Categories are unique per user ignoring case. The spelling used when the
/// budget was first created is kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBudget {
    /// The category, as the user first spelled it.
    pub category: String,
    /// The most that should be spent in the category each month.
    pub monthly_limit: Decimal,
}

/// Create the category budget table.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_category_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category_budget (
                user_id INTEGER NOT NULL,
                category TEXT NOT NULL,
                category_key TEXT NOT NULL,
                monthly_limit TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY(user_id, category_key),
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// The key budgets are matched on, `category` lowercased with full Unicode case mapping.
///
/// SQLite's `NOCASE` collation only folds ASCII letters, so the key is computed here.
fn category_key(category: &str) -> String {
    category.to_lowercase()
}

fn map_budget_row(row: &Row) -> Result<Option<CategoryBudget>, rusqlite::Error> {
    let category: String = row.get(0)?;
    let raw_limit: String = row.get(1)?;

    let Some(monthly_limit) = parse_decimal(&raw_limit) else {
        tracing::warn!("Skipping budget for {category:?} with malformed limit {raw_limit:?}");
        return Ok(None);
    };

    Ok(Some(CategoryBudget {
        category,
        monthly_limit,
    }))
}

/// List the budgets of `user_id` alphabetically, ignoring case.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn list_category_budgets(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<CategoryBudget>, Error> {
    connection
        .prepare(
            "SELECT category, monthly_limit FROM category_budget WHERE user_id = :user_id
             ORDER BY category_key ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_budget_row)?
        .filter_map(|row| row.map_err(Error::from).transpose())
        .collect()
}

/// Create a budget for `category`, or replace the limit of the budget whose
/// category matches ignoring case.
///
/// Returns the stored budget, which keeps the existing category spelling.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyCategory] if `category` is blank,
/// - [Error::InvalidBudgetLimit] if `monthly_limit` is not positive,
/// - or [Error::SqlError] if there is some SQL error.
pub fn upsert_category_budget(
    user_id: UserID,
    category: &str,
    monthly_limit: Decimal,
    connection: &Connection,
) -> Result<CategoryBudget, Error> {
    let category = category.trim();

    if category.is_empty() {
        return Err(Error::EmptyCategory);
    }

    if monthly_limit <= Decimal::ZERO {
        return Err(Error::InvalidBudgetLimit);
    }

    let budget = connection
        .prepare(
            "INSERT INTO category_budget (user_id, category, category_key, monthly_limit, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id, category_key) DO UPDATE SET
                monthly_limit = excluded.monthly_limit,
                updated_at = excluded.updated_at
             RETURNING category, monthly_limit",
        )?
        .query_row(
            (
                user_id.as_i64(),
                category,
                category_key(category),
                monthly_limit.to_string(),
                OffsetDateTime::now_utc(),
            ),
            map_budget_row,
        )?;

    budget.ok_or(Error::InvalidBudgetLimit)
}

/// Delete the budget whose category matches `category` ignoring case.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingBudget] if there is no such budget,
/// - or [Error::SqlError] if there is some SQL error.
pub fn delete_category_budget(
    user_id: UserID,
    category: &str,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM category_budget WHERE user_id = ?1 AND category_key = ?2",
        (user_id.as_i64(), category_key(category.trim())),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingBudget);
    }

    Ok(())
}

/// Delete every budget owned by `user_id`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn delete_all_category_budgets(user_id: UserID, connection: &Connection) -> Result<usize, Error> {
    connection
        .execute(
            "DELETE FROM category_budget WHERE user_id = ?1",
            [user_id.as_i64()],
        )
        .map_err(|error| error.into())
}
