//! Defines the endpoint for deleting a transaction.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{
    Error,
    auth::UserID,
    database_id::TransactionId,
    transaction::{TransactionState, delete_transaction},
};

/// A route handler for deleting a transaction. Responds with the deleted transaction.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Value>, Error> {
    let connection = state.connection()?;
    let deleted = delete_transaction(user_id, transaction_id, &connection)?;

    Ok(Json(json!({ "success": true, "deleted": deleted })))
}
