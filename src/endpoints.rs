//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}', use [format_endpoint].

/// Liveness check that does not touch the database.
pub const HEALTH: &str = "/api/health";
/// The route for registering a new user.
pub const REGISTER: &str = "/api/auth/register";
/// The route for logging in a user.
pub const LOG_IN: &str = "/api/auth/login";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/auth/logout";
/// The route for fetching the profile of the logged in user.
pub const ME: &str = "/api/auth/me";
/// The route for replacing the avatar of the logged in user.
pub const AVATAR: &str = "/api/user/avatar";
/// The route to read and set the monthly saving goal.
pub const SAVING_GOAL: &str = "/api/saving-goal";
/// The route to list and upsert category budgets.
pub const CATEGORY_BUDGETS: &str = "/api/category-budgets";
/// The route to delete a single category budget.
pub const CATEGORY_BUDGET: &str = "/api/category-budgets/{category}";
/// The route to list and create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to download the transactions as a CSV file.
pub const EXPORT_CSV: &str = "/api/transactions/export/csv";
/// The route to download a full JSON backup.
pub const EXPORT_JSON: &str = "/api/export/json";
/// The route to restore a JSON backup.
pub const IMPORT_JSON: &str = "/api/import/json";
/// The route for the aggregated dashboard figures.
pub const DASHBOARD: &str = "/api/dashboard";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
