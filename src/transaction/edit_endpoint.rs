//! Defines the endpoint for replacing the fields of a transaction.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde_json::Value;

use crate::{
    Error,
    auth::UserID,
    database_id::TransactionId,
    transaction::{Transaction, TransactionState, form::parse_transaction_form, update_transaction},
};

/// A route handler for replacing the amount, kind, category and note of a transaction.
///
/// When the transaction happened is left unchanged.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    Json(body): Json<Value>,
) -> Result<Json<Transaction>, Error> {
    let builder = parse_transaction_form(&body)?;

    let connection = state.connection()?;

    update_transaction(user_id, transaction_id, builder, &connection).map(Json)
}

#[cfg(test)]
mod edit_transaction_tests {
    use axum::http::StatusCode;
    use rust_decimal_macros::dec;
    use serde_json::{Value, json};
    use time::macros::datetime;

    use crate::{
        endpoints::{self, format_endpoint},
        transaction::{
            Transaction, TransactionKind, create_transaction, get_transaction,
            state::test_utils::get_test_server,
        },
    };

    #[tokio::test]
    async fn replaces_fields_and_keeps_timestamp() {
        let (server, state, user_id) = get_test_server();
        let occurred_at = datetime!(2025-10-01 08:30 UTC);
        let original = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                user_id,
                Transaction::build(dec!(5), TransactionKind::Debit, "Coffee")
                    .occurred_at(occurred_at),
                &connection,
            )
            .unwrap()
        };

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, original.id))
            .json(&json!({
                "amount": 2500,
                "kind": "credit",
                "category": "Salary",
                "note": "   ",
            }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["category"], "Salary");

        let connection = state.db_connection.lock().unwrap();
        let updated = get_transaction(user_id, original.id, &connection).unwrap();
        assert_eq!(updated.amount, dec!(2500));
        assert_eq!(updated.kind, TransactionKind::Credit);
        assert_eq!(updated.note, None);
        assert_eq!(updated.occurred_at, Some(occurred_at));
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let (server, _, _) = get_test_server();

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, 999))
            .json(&json!({ "amount": 1, "kind": "debit", "category": "Food" }))
            .await;

        response.assert_status_not_found();
        response.assert_json(&json!({ "error": "Transaction not found" }));
    }

    #[tokio::test]
    async fn invalid_body_is_rejected_before_lookup() {
        let (server, _, _) = get_test_server();

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, 999))
            .json(&json!({ "kind": "debit", "category": "Food" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
