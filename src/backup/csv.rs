//! CSV export of the ledger.

use crate::{
    Error,
    transaction::{Transaction, format_timestamp},
};

/// The header row of the exported file.
pub const CSV_HEADER: [&str; 6] = ["id", "amount", "kind", "category", "occurred_at", "note"];

/// Line breaks would split a record across rows in spreadsheet tools.
fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

/// Write `transactions` as CSV, one row per transaction in the given order.
///
/// # Errors
/// Returns an [Error::CsvError] if a row could not be written.
pub fn transactions_to_csv(transactions: &[Transaction]) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|error| Error::CsvError(error.to_string()))?;

    for transaction in transactions {
        let occurred_at = match transaction.occurred_at {
            Some(occurred_at) => format_timestamp(occurred_at)?,
            None => String::new(),
        };

        writer
            .write_record([
                transaction.id.to_string(),
                transaction.amount.to_string(),
                transaction.kind.to_string(),
                single_line(&transaction.category),
                occurred_at,
                single_line(transaction.note.as_deref().unwrap_or_default()),
            ])
            .map_err(|error| Error::CsvError(error.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CsvError(error.to_string()))
}
