//! Creates the application's database schema.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    auth::create_user_table, budget::create_category_budget_table,
    saving_goal::create_saving_goal_table, transaction::create_transaction_table,
};

/// Create the tables for all of the domain models.
///
/// Safe to call on an existing database, tables that already exist are left untouched.
///
/// # Errors
/// Returns an error if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_category_budget_table(&transaction)?;
    create_saving_goal_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
