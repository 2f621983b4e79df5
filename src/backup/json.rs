//! JSON backup and restore of everything a user has stored.

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    Error,
    auth::{UserID, get_user_by_id, update_avatar},
    budget::{
        CategoryBudget, delete_all_category_budgets, list_category_budgets,
        upsert_category_budget,
    },
    money::decimal_from_json,
    saving_goal::{delete_saving_goal, get_saving_goal, set_saving_goal},
    transaction::{
        Transaction, create_transaction, delete_all_transactions, list_transactions,
        parse_transaction_form,
    },
};

/// The format version written into every backup.
pub const BACKUP_VERSION: u32 = 1;

/// The exported profile fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackupUser {
    /// The username at the time of export.
    pub username: String,
    /// When the user registered.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// The user's avatar, if any.
    pub avatar: Option<String>,
}

/// The exported saving goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BackupSavingGoal {
    /// The monthly target.
    pub monthly_target: Decimal,
}

/// A complete copy of a user's data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Backup {
    /// Always [BACKUP_VERSION].
    pub version: u32,
    /// When the backup was made.
    #[serde(with = "time::serde::rfc3339")]
    pub exported_at: OffsetDateTime,
    /// The user's profile.
    pub user: BackupUser,
    /// The saving goal, if set.
    pub saving_goal: Option<BackupSavingGoal>,
    /// Every category budget.
    pub category_budgets: Vec<CategoryBudget>,
    /// The full ledger, oldest first.
    pub transactions: Vec<Transaction>,
}

/// How much of a backup was restored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    /// Transactions restored.
    pub transactions: usize,
    /// Category budgets restored.
    pub category_budgets: usize,
    /// Whether a saving goal was restored.
    pub saving_goal: bool,
    /// Transactions and budgets that were malformed and left out.
    pub skipped: usize,
}

/// Gather everything stored for `user_id` into a [Backup].
///
/// # Errors
/// Returns an [Error::SqlError] if there is some SQL error.
pub fn export_backup(
    user_id: UserID,
    exported_at: OffsetDateTime,
    connection: &Connection,
) -> Result<Backup, Error> {
    let user = get_user_by_id(user_id, connection)?;

    Ok(Backup {
        version: BACKUP_VERSION,
        exported_at,
        user: BackupUser {
            username: user.username,
            created_at: user.created_at,
            avatar: user.avatar,
        },
        saving_goal: get_saving_goal(user_id, connection)?
            .map(|monthly_target| BackupSavingGoal { monthly_target }),
        category_budgets: list_category_budgets(user_id, connection)?,
        transactions: list_transactions(user_id, connection)?,
    })
}

/// Replace the transactions, budgets and saving goal of `user_id` with the contents of `backup`.
///
/// Runs in a single SQL transaction so a failure leaves the existing data untouched.
/// Malformed budgets and transactions are skipped. A transaction with a missing
/// or unreadable `occurred_at` is stamped with `imported_at`.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidBackup] if `backup` is not a JSON object,
/// - or [Error::SqlError] if there is some SQL error.
pub fn import_backup(
    user_id: UserID,
    backup: &Value,
    imported_at: OffsetDateTime,
    connection: &Connection,
) -> Result<ImportSummary, Error> {
    let Some(backup) = backup.as_object() else {
        return Err(Error::InvalidBackup);
    };

    let tx = connection.unchecked_transaction()?;
    let mut summary = ImportSummary::default();

    delete_all_transactions(user_id, &tx)?;
    delete_all_category_budgets(user_id, &tx)?;
    delete_saving_goal(user_id, &tx)?;

    if let Some(avatar) = backup
        .get("user")
        .and_then(|user| user.get("avatar"))
        .and_then(Value::as_str)
    {
        update_avatar(user_id, Some(avatar).filter(|avatar| !avatar.is_empty()), &tx)?;
    }

    if let Some(target) = backup
        .get("saving_goal")
        .and_then(|goal| goal.get("monthly_target"))
        .filter(|target| target.is_number())
        .and_then(decimal_from_json)
    {
        match set_saving_goal(user_id, Some(target), &tx) {
            Ok(stored) => summary.saving_goal = stored.is_some(),
            Err(Error::InvalidSavingGoal) => {
                tracing::warn!("Skipping invalid saving goal {target} in backup")
            }
            Err(error) => return Err(error),
        }
    }

    for budget in entries(backup, "category_budgets") {
        let category = budget.get("category").and_then(Value::as_str);
        let limit = budget
            .get("monthly_limit")
            .filter(|limit| limit.is_number())
            .and_then(decimal_from_json);

        let (Some(category), Some(limit)) = (category, limit) else {
            summary.skipped += 1;
            continue;
        };

        match upsert_category_budget(user_id, category, limit, &tx) {
            Ok(_) => summary.category_budgets += 1,
            Err(Error::EmptyCategory | Error::InvalidBudgetLimit) => summary.skipped += 1,
            Err(error) => return Err(error),
        }
    }

    for entry in entries(backup, "transactions") {
        let Ok(builder) = parse_transaction_form(entry) else {
            summary.skipped += 1;
            continue;
        };

        let occurred_at = entry
            .get("occurred_at")
            .and_then(Value::as_str)
            .and_then(|raw| OffsetDateTime::parse(raw, &Rfc3339).ok())
            .unwrap_or(imported_at);

        create_transaction(user_id, builder.occurred_at(occurred_at), &tx)?;
        summary.transactions += 1;
    }

    tx.commit()?;

    tracing::info!("Restored backup for user {user_id}: {summary:?}");

    Ok(summary)
}

/// The elements of the array at `key`, or nothing if `key` is missing or not an array.
fn entries<'a>(
    backup: &'a serde_json::Map<String, Value>,
    key: &str,
) -> impl Iterator<Item = &'a Value> {
    backup
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}
