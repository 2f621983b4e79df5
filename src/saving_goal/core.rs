use rusqlite::{Connection, OptionalExtension};
use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::{
    Error,
    auth::UserID,
    money::{MAX_AMOUNT, parse_decimal},
};

/// Create the saving goal table. Each user has at most one goal.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_saving_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS saving_goal (
                user_id INTEGER PRIMARY KEY,
                monthly_target TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Get the monthly saving target of `user_id`, or `None` if no goal is set.
///
/// A stored target that cannot be parsed is treated as unset.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_saving_goal(user_id: UserID, connection: &Connection) -> Result<Option<Decimal>, Error> {
    let raw_target: Option<String> = connection
        .query_row(
            "SELECT monthly_target FROM saving_goal WHERE user_id = ?1",
            [user_id.as_i64()],
            |row| row.get(0),
        )
        .optional()?;

    Ok(raw_target.and_then(|raw_target| {
        let target = parse_decimal(&raw_target);

        if target.is_none() {
            tracing::warn!("Ignoring malformed saving goal {raw_target:?} for user {user_id}");
        }

        target
    }))
}

/// Set the monthly saving target of `user_id`.
///
/// `None` and zero both clear the goal. Returns the goal as it is now stored.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidSavingGoal] if `target` is negative or implausibly large,
/// - or [Error::SqlError] if there is some SQL error.
pub fn set_saving_goal(
    user_id: UserID,
    target: Option<Decimal>,
    connection: &Connection,
) -> Result<Option<Decimal>, Error> {
    let target = match target {
        Some(target) if target < Decimal::ZERO || target > MAX_AMOUNT => {
            return Err(Error::InvalidSavingGoal);
        }
        Some(target) if target.is_zero() => None,
        target => target,
    };

    match target {
        None => {
            delete_saving_goal(user_id, connection)?;
        }
        Some(target) => {
            connection.execute(
                "INSERT INTO saving_goal (user_id, monthly_target, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(user_id) DO UPDATE SET
                    monthly_target = excluded.monthly_target,
                    updated_at = excluded.updated_at",
                (
                    user_id.as_i64(),
                    target.normalize().to_string(),
                    OffsetDateTime::now_utc(),
                ),
            )?;
        }
    }

    Ok(target)
}

/// Remove the saving goal of `user_id`. Does nothing if there is no goal.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn delete_saving_goal(user_id: UserID, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "DELETE FROM saving_goal WHERE user_id = ?1",
        [user_id.as_i64()],
    )?;

    Ok(())
}
