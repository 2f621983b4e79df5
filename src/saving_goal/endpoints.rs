//! Routes for reading and setting the monthly saving goal.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    auth::UserID,
    money::decimal_from_json,
    saving_goal::{get_saving_goal, set_saving_goal},
};

/// The state needed for the saving goal routes.
#[derive(Debug, Clone)]
pub struct SavingGoalState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SavingGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Return `{"goal": target}`, or `{"goal": null}` when no goal is set.
pub async fn get_saving_goal_endpoint(
    State(state): State<SavingGoalState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Value>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let goal = get_saving_goal(user_id, &connection)?;

    Ok(Json(json!({ "goal": goal })))
}

/// Set the goal from `{"goal": number}`. A `null` or zero goal clears it.
pub async fn put_saving_goal(
    State(state): State<SavingGoalState>,
    Extension(user_id): Extension<UserID>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Error> {
    let target = match body.get("goal") {
        Some(Value::Null) => None,
        Some(value) => Some(decimal_from_json(value).ok_or(Error::InvalidSavingGoal)?),
        None => return Err(Error::InvalidSavingGoal),
    };

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let goal = set_saving_goal(user_id, target, &connection)?;

    Ok(Json(json!({ "goal": goal })))
}
