//! Defines the endpoint for creating a new transaction.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;

use crate::{
    Error,
    auth::UserID,
    transaction::{TransactionState, create_transaction, form::parse_transaction_form},
};

/// A route handler for creating a new transaction, stamped with the current time.
///
/// Responds with 201 and the stored transaction, or 400 with every validation problem.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, Error> {
    let builder = parse_transaction_form(&body)?;

    let connection = state.connection()?;
    let transaction = create_transaction(user_id, builder, &connection)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}
