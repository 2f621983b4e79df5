//! The dashboard route handler.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    budget::list_category_budgets,
    dashboard::overview::{Dashboard, LedgerSnapshot},
    saving_goal::get_saving_goal,
    timezone::{get_timezone, local_now},
    transaction::list_transactions,
};

/// The state needed for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for reading the ledger.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Load a snapshot of the user's ledger and compute every dashboard figure from it.
pub async fn get_dashboard(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Dashboard>, Error> {
    let timezone = get_timezone(&state.local_timezone)?;
    let now = local_now(timezone);

    let snapshot = {
        let connection = state.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })?;

        LedgerSnapshot {
            transactions: list_transactions(user_id, &connection)?,
            budgets: list_category_budgets(user_id, &connection)?,
            saving_goal: get_saving_goal(user_id, &connection)?,
        }
    };

    Ok(Json(Dashboard::compute(&snapshot, now, timezone)))
}
