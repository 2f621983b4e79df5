//! Validation of submitted transaction fields.

use serde_json::Value;

use crate::{
    Error,
    money::positive_amount_from_json,
    transaction::{Transaction, TransactionBuilder, TransactionKind},
};

/// Validate a JSON transaction submission.
///
/// Every problem is reported, not just the first. The category and note are
/// trimmed and an empty note becomes `None`.
///
/// # Errors
/// Returns [Error::InvalidTransaction] listing every invalid field.
pub fn parse_transaction_form(body: &Value) -> Result<TransactionBuilder, Error> {
    let mut errors = Vec::new();

    let amount = match body.get("amount") {
        None | Some(Value::Null) => {
            errors.push("amount is required".to_owned());
            None
        }
        Some(raw_amount) => {
            let amount = positive_amount_from_json(raw_amount);
            if amount.is_none() {
                errors.push("amount must be a positive number".to_owned());
            }
            amount
        }
    };

    let kind = body
        .get("kind")
        .and_then(Value::as_str)
        .and_then(TransactionKind::parse);
    if kind.is_none() {
        errors.push("kind must be \"debit\" or \"credit\"".to_owned());
    }

    let category = body
        .get("category")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|category| !category.is_empty());
    if category.is_none() {
        errors.push("category is required and must be a string".to_owned());
    }

    let note = body
        .get("note")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|note| !note.is_empty());

    match (amount, kind, category) {
        (Some(amount), Some(kind), Some(category)) if errors.is_empty() => {
            Ok(Transaction::build(amount, kind, category).note(note))
        }
        _ => Err(Error::InvalidTransaction(errors)),
    }
}
