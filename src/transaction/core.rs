//! Defines the core data models and database queries for transactions.

use std::fmt::Display;

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};

use crate::{
    Error,
    auth::UserID,
    database_id::{DatabaseId, TransactionId},
    money::parse_decimal,
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money left (debit) or entered (credit) the user's pocket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money spent.
    Debit,
    /// Money earned.
    Credit,
}

impl TransactionKind {
    /// The lowercase name used in JSON, SQL and CSV.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }

    /// Parse the lowercase name of a kind.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "debit" => Some(Self::Debit),
            "credit" => Some(Self::Credit),
            _ => None,
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_str()?;

        Self::parse(raw).ok_or_else(|| FromSqlError::Other(format!("unknown kind {raw}").into()))
    }
}

/// A single debit or credit in a user's ledger.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseId,
    /// The amount of money spent or earned, always positive.
    pub amount: Decimal,
    /// Whether the amount was spent or earned.
    pub kind: TransactionKind,
    /// What the money was for, e.g. "Groceries".
    pub category: String,
    /// When the transaction happened.
    ///
    /// `None` if the stored timestamp could not be parsed. Such transactions
    /// only count towards all-time figures.
    #[serde(with = "time::serde::rfc3339::option")]
    pub occurred_at: Option<OffsetDateTime>,
    /// An optional free text note.
    pub note: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(amount: Decimal, kind: TransactionKind, category: &str) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            kind,
            category: category.to_owned(),
            note: None,
            occurred_at: None,
        }
    }

    /// The amount with its sign: debits are negative, credits positive.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Debit => -self.amount,
            TransactionKind::Credit => self.amount,
        }
    }
}

/// The user supplied fields of a [Transaction].
///
/// Used both to create transactions and to replace the fields of an existing one.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The amount of money, must be positive.
    pub amount: Decimal,
    /// Whether the amount was spent or earned.
    pub kind: TransactionKind,
    /// The category, already trimmed.
    pub category: String,
    /// An optional note, `None` rather than an empty string.
    pub note: Option<String>,
    /// When the transaction happened. Defaults to the time it is stored.
    ///
    /// Ignored by [update_transaction], which keeps the original timestamp.
    pub occurred_at: Option<OffsetDateTime>,
}

impl TransactionBuilder {
    /// Set the note for the transaction.
    pub fn note(mut self, note: Option<&str>) -> Self {
        self.note = note.map(str::to_owned);
        self
    }

    /// Set when the transaction happened.
    pub fn occurred_at(mut self, occurred_at: OffsetDateTime) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const TRANSACTION_COLUMNS: &str = "id, amount, kind, category, occurred_at, note";

/// Format a timestamp the way it is stored, RFC 3339 in UTC.
pub(crate) fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, Error> {
    timestamp
        .to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|error| Error::InvalidTransaction(vec![format!("invalid timestamp: {error}")]))
}

/// Create a new transaction for `user_id` in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidTransaction] if the timestamp cannot be formatted,
/// - or [Error::SqlError] if there is some SQL error.
pub fn create_transaction(
    user_id: UserID,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let occurred_at = builder.occurred_at.unwrap_or_else(OffsetDateTime::now_utc);

    let row = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (user_id, amount, kind, category, occurred_at, note)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                user_id.as_i64(),
                builder.amount.to_string(),
                builder.kind,
                builder.category,
                format_timestamp(occurred_at)?,
                builder.note,
            ),
            map_transaction_row,
        )?;

    row.ok_or(Error::NotFound)
}

/// Retrieve the transaction `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    user_id: UserID,
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let row = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id AND user_id = :user_id"
        ))?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_transaction_row,
        )?;

    row.ok_or(Error::NotFound)
}

/// Load the full ledger of `user_id`, oldest first.
///
/// Rows with an amount that cannot be parsed are skipped.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn list_transactions(user_id: UserID, connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE user_id = :user_id
             ORDER BY occurred_at ASC, id ASC"
        ))?
        .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
        .filter_map(|row| row.map_err(Error::from).transpose())
        .collect()
}

/// Replace the amount, kind, category and note of transaction `id`.
///
/// The transaction's `occurred_at` is preserved.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    user_id: UserID,
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let row = connection
        .prepare(&format!(
            "UPDATE \"transaction\" SET amount = ?1, kind = ?2, category = ?3, note = ?4
             WHERE id = ?5 AND user_id = ?6
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                builder.amount.to_string(),
                builder.kind,
                builder.category,
                builder.note,
                id,
                user_id.as_i64(),
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
            error => error.into(),
        })?;

    row.ok_or(Error::UpdateMissingTransaction)
}

/// Delete transaction `id` and return the deleted row.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(
    user_id: UserID,
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let row = connection
        .prepare(&format!(
            "DELETE FROM \"transaction\" WHERE id = :id AND user_id = :user_id
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::DeleteMissingTransaction,
            error => error.into(),
        })?;

    row.ok_or(Error::DeleteMissingTransaction)
}

/// Delete every transaction owned by `user_id`, returning how many were removed.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn delete_all_transactions(user_id: UserID, connection: &Connection) -> Result<usize, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE user_id = ?1",
            [user_id.as_i64()],
        )
        .map_err(|error| error.into())
}

/// Get the number of transactions owned by `user_id`.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(user_id: UserID, connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM \"transaction\" WHERE user_id = ?1",
            [user_id.as_i64()],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                amount TEXT NOT NULL,
                kind TEXT NOT NULL CHECK (kind IN ('debit', 'credit')),
                category TEXT NOT NULL,
                occurred_at TEXT NOT NULL,
                note TEXT,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_occurred_at
         ON \"transaction\"(user_id, occurred_at);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a transaction.
///
/// Returns `Ok(None)` when the stored amount is not a number. An unparseable
/// timestamp keeps the row with `occurred_at` set to `None`.
pub fn map_transaction_row(row: &Row) -> Result<Option<Transaction>, rusqlite::Error> {
    let id: DatabaseId = row.get(0)?;
    let raw_amount: String = row.get(1)?;
    let kind = row.get(2)?;
    let category = row.get(3)?;
    let raw_occurred_at: String = row.get(4)?;
    let note = row.get(5)?;

    let Some(amount) = parse_decimal(&raw_amount) else {
        tracing::warn!("Skipping transaction {id} with malformed amount {raw_amount:?}");
        return Ok(None);
    };

    let occurred_at = match OffsetDateTime::parse(&raw_occurred_at, &Rfc3339) {
        Ok(occurred_at) => Some(occurred_at),
        Err(error) => {
            tracing::warn!(
                "Transaction {id} has malformed timestamp {raw_occurred_at:?}: {error}"
            );
            None
        }
    };

    Ok(Some(Transaction {
        id,
        amount,
        kind,
        category,
        occurred_at,
        note,
    }))
}
