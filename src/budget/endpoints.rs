//! Routes for listing, creating and deleting category budgets.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    auth::UserID,
    budget::{CategoryBudget, delete_category_budget, list_category_budgets, upsert_category_budget},
    money::decimal_from_json,
};

/// The state needed for the category budget routes.
#[derive(Debug, Clone)]
pub struct BudgetState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn lock_connection(
    db_connection: &Mutex<Connection>,
) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
    db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}

/// List the budgets of the logged in user.
pub async fn get_category_budgets(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<CategoryBudget>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    list_category_budgets(user_id, &connection).map(Json)
}

/// Create a budget, or replace the limit of an existing budget for the same category.
///
/// The body is `{"category": "...", "monthly_limit": 123.45}`.
pub async fn post_category_budget(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, Error> {
    let Some(category) = body.get("category").and_then(Value::as_str) else {
        return Err(Error::MissingField("Category"));
    };

    let monthly_limit = body
        .get("monthly_limit")
        .and_then(decimal_from_json)
        .ok_or(Error::InvalidBudgetLimit)?;

    let connection = lock_connection(&state.db_connection)?;
    let budget = upsert_category_budget(user_id, category, monthly_limit, &connection)?;

    tracing::debug!("User {user_id} set budget {budget:?}");

    Ok((StatusCode::CREATED, Json(budget)))
}

/// Delete the budget for the category in the path.
pub async fn delete_category_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    Path(category): Path<String>,
) -> Result<Json<Value>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_category_budget(user_id, &category, &connection)?;

    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod budget_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Router,
        http::StatusCode,
        routing::{delete, get},
    };
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{
        auth::{PasswordHash, create_user},
        db::initialize,
        endpoints,
    };

    use super::{
        BudgetState, delete_category_budget_endpoint, get_category_budgets, post_category_budget,
    };

    fn get_test_server() -> TestServer {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");
        let user = create_user("alice", PasswordHash::new_unchecked("hash"), &connection)
            .expect("Could not create test user");

        let state = BudgetState {
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let app = Router::new()
            .route(
                endpoints::CATEGORY_BUDGETS,
                get(get_category_budgets).post(post_category_budget),
            )
            .route(
                endpoints::CATEGORY_BUDGET,
                delete(delete_category_budget_endpoint),
            )
            .layer(Extension(user.id))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn create_then_list() {
        let server = get_test_server();

        let response = server
            .post(endpoints::CATEGORY_BUDGETS)
            .json(&json!({ "category": " Food ", "monthly_limit": 200 }))
            .await;

        response.assert_status(StatusCode::CREATED);
        response.assert_json(&json!({ "category": "Food", "monthly_limit": 200 }));

        let list = server.get(endpoints::CATEGORY_BUDGETS).await;
        list.assert_json(&json!([{ "category": "Food", "monthly_limit": 200 }]));
    }

    #[tokio::test]
    async fn rejects_missing_category_and_bad_limit() {
        let server = get_test_server();

        let missing = server
            .post(endpoints::CATEGORY_BUDGETS)
            .json(&json!({ "monthly_limit": 10 }))
            .await;
        missing.assert_status(StatusCode::BAD_REQUEST);

        let blank = server
            .post(endpoints::CATEGORY_BUDGETS)
            .json(&json!({ "category": "   ", "monthly_limit": 10 }))
            .await;
        blank.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(blank.json::<Value>()["error"], "Category cannot be empty.");

        let negative = server
            .post(endpoints::CATEGORY_BUDGETS)
            .json(&json!({ "category": "Food", "monthly_limit": -5 }))
            .await;
        negative.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            negative.json::<Value>()["error"],
            "Monthly budget must be a positive number."
        );
    }

    #[tokio::test]
    async fn delete_existing_and_missing() {
        let server = get_test_server();
        server
            .post(endpoints::CATEGORY_BUDGETS)
            .json(&json!({ "category": "Food", "monthly_limit": 50 }))
            .await
            .assert_status(StatusCode::CREATED);

        let path = endpoints::CATEGORY_BUDGET.replace("{category}", "food");
        let response = server.delete(&path).await;
        response.assert_status_ok();
        response.assert_json(&json!({ "success": true }));

        server.delete(&path).await.assert_status_not_found();
    }
}
