//! Routes for downloading and restoring backups.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::header,
    response::IntoResponse,
};
use rusqlite::Connection;
use serde_json::{Value, json};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::UserID,
    backup::{
        csv::transactions_to_csv,
        json::{Backup, export_backup, import_backup},
    },
    transaction::list_transactions,
};

/// The state needed for the backup routes.
#[derive(Debug, Clone)]
pub struct BackupState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BackupState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

impl BackupState {
    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

/// Download the ledger as `transactions.csv`.
pub async fn export_csv(
    State(state): State<BackupState>,
    Extension(user_id): Extension<UserID>,
) -> Result<impl IntoResponse, Error> {
    let transactions = {
        let connection = state.connection()?;
        list_transactions(user_id, &connection)?
    };

    let csv = transactions_to_csv(&transactions)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"transactions.csv\"",
            ),
        ],
        csv,
    ))
}

/// Download a complete JSON backup.
pub async fn export_json(
    State(state): State<BackupState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Backup>, Error> {
    let connection = state.connection()?;

    export_backup(user_id, OffsetDateTime::now_utc(), &connection).map(Json)
}

/// Replace the user's data with an uploaded JSON backup.
pub async fn import_json(
    State(state): State<BackupState>,
    Extension(user_id): Extension<UserID>,
    Json(backup): Json<Value>,
) -> Result<Json<Value>, Error> {
    let connection = state.connection()?;

    let summary = import_backup(user_id, &backup, OffsetDateTime::now_utc(), &connection)?;

    Ok(Json(json!({ "success": true, "imported": summary })))
}

#[cfg(test)]
mod backup_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Router,
        http::{StatusCode, header},
        routing::{get, post},
    };
    use axum_test::TestServer;
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use serde_json::{Value, json};

    use crate::{
        auth::{PasswordHash, create_user},
        db::initialize,
        endpoints,
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    use super::{BackupState, export_csv, export_json, import_json};

    fn get_test_server() -> TestServer {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");
        let user = create_user("alice", PasswordHash::new_unchecked("hash"), &connection)
            .expect("Could not create test user");
        create_transaction(
            user.id,
            Transaction::build(dec!(4.20), TransactionKind::Debit, "Coffee"),
            &connection,
        )
        .unwrap();

        let app = Router::new()
            .route(endpoints::EXPORT_CSV, get(export_csv))
            .route(endpoints::EXPORT_JSON, get(export_json))
            .route(endpoints::IMPORT_JSON, post(import_json))
            .layer(Extension(user.id))
            .with_state(BackupState {
                db_connection: Arc::new(Mutex::new(connection)),
            });

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn csv_is_an_attachment() {
        let server = get_test_server();

        let response = server.get(endpoints::EXPORT_CSV).await;

        response.assert_status_ok();
        assert_eq!(
            response.header(header::CONTENT_DISPOSITION),
            "attachment; filename=\"transactions.csv\""
        );
        let text = response.text();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("id,amount,kind,category,occurred_at,note"));
        assert!(lines.next().is_some_and(|line| line.starts_with("1,4.20,debit,Coffee,")));
    }

    #[tokio::test]
    async fn json_export_round_trips_through_import() {
        let server = get_test_server();

        let backup = server.get(endpoints::EXPORT_JSON).await.json::<Value>();
        assert_eq!(backup["version"], 1);
        assert_eq!(backup["user"]["username"], "alice");

        let response = server.post(endpoints::IMPORT_JSON).json(&backup).await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["success"], true);
        assert_eq!(body["imported"]["transactions"], 1);
        assert_eq!(body["imported"]["skipped"], 0);
    }

    #[tokio::test]
    async fn non_object_backup_is_a_bad_request() {
        let server = get_test_server();

        let response = server
            .post(endpoints::IMPORT_JSON)
            .json(&json!("backup"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "Invalid backup format." }));
    }
}
