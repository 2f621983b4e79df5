//! Transaction management.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - Date-range filtering for the transaction list
//! - The JSON route handlers

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod list_endpoint;
pub mod range;
mod state;

pub use core::{
    Transaction, TransactionBuilder, TransactionKind, create_transaction, create_transaction_table,
    delete_all_transactions, delete_transaction, get_transaction, list_transactions,
    map_transaction_row, update_transaction,
};
#[cfg(test)]
pub(crate) use core::count_transactions;
pub(crate) use core::format_timestamp;
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use form::parse_transaction_form;
pub use list_endpoint::{TransactionList, TransactionQuery, list_transactions_endpoint};
pub use state::TransactionState;
