use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{AppState, Error};

/// The state needed by the transaction routes.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl TransactionState {
    pub(super) fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

#[cfg(test)]
pub(super) mod test_utils {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Router,
        routing::{get, put},
    };
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        auth::{PasswordHash, UserID, create_user},
        db::initialize,
        endpoints,
        transaction::{
            create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
            list_transactions_endpoint,
        },
    };

    use super::TransactionState;

    /// A server with every transaction route, logged in as a fresh user.
    pub(in crate::transaction) fn get_test_server() -> (TestServer, TransactionState, UserID) {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");
        let user = create_user("alice", PasswordHash::new_unchecked("hash"), &connection)
            .expect("Could not create test user");

        let state = TransactionState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let app = Router::new()
            .route(
                endpoints::TRANSACTIONS_API,
                get(list_transactions_endpoint).post(create_transaction_endpoint),
            )
            .route(
                endpoints::TRANSACTION,
                put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
            )
            .layer(Extension(user.id))
            .with_state(state.clone());

        (
            TestServer::try_new(app).expect("Could not create test server."),
            state,
            user.id,
        )
    }
}
