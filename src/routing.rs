//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde_json::json;

use crate::{
    AppState,
    auth::{auth_guard, get_me, post_log_in, post_log_out, put_avatar, register_user},
    backup::{export_csv, export_json, import_json},
    budget::{delete_category_budget_endpoint, get_category_budgets, post_category_budget},
    dashboard::get_dashboard,
    endpoints,
    saving_goal::{get_saving_goal_endpoint, put_saving_goal},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        list_transactions_endpoint,
    },
};

/// The largest JSON backup accepted by the import route, in bytes.
const IMPORT_BODY_LIMIT: usize = 20 * 1024 * 1024;

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::LOG_OUT, post(post_log_out));

    let protected_routes = Router::new()
        .route(endpoints::ME, get(get_me))
        .route(endpoints::AVATAR, put(put_avatar))
        .route(
            endpoints::SAVING_GOAL,
            get(get_saving_goal_endpoint).put(put_saving_goal),
        )
        .route(
            endpoints::CATEGORY_BUDGETS,
            get(get_category_budgets).post(post_category_budget),
        )
        .route(
            endpoints::CATEGORY_BUDGET,
            delete(delete_category_budget_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS_API,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(endpoints::EXPORT_CSV, get(export_csv))
        .route(endpoints::EXPORT_JSON, get(export_json))
        .route(
            endpoints::IMPORT_JSON,
            post(import_json).layer(DefaultBodyLimit::max(IMPORT_BODY_LIMIT)),
        )
        .route(endpoints::DASHBOARD, get(get_dashboard))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Report that the server is up without touching the database.
async fn get_health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Expense Tracker backend is running",
    }))
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found" })),
    )
        .into_response()
}
