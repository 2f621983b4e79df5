//! The route for handling log-in requests.
//! The cookie module handles the lower level cookie auth logic.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{UserProfile, get_user_by_username, set_auth_cookie},
};

/// The state needed to log in, register and look up users.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The credentials submitted by the log-in and registration forms.
#[derive(Clone, Default, Deserialize)]
pub struct Credentials {
    /// The name the user registered with.
    #[serde(default)]
    pub username: String,
    /// The plain text password.
    #[serde(default)]
    pub password: String,
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request the auth cookie is set and the user's profile is returned.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The username or password is missing.
/// - The username is not registered or the password is not correct.
/// - An internal error occurred when verifying the password.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<Response, Error> {
    if credentials.username.is_empty() {
        return Err(Error::MissingField("Username"));
    }
    if credentials.password.is_empty() {
        return Err(Error::MissingField("Password"));
    }

    let user = {
        let connection = state.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })?;

        match get_user_by_username(&credentials.username, &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => return Err(Error::InvalidCredentials),
            Err(error) => return Err(error),
        }
    };

    let is_password_valid = user
        .password_hash
        .verify(&credentials.password)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    if !is_password_valid {
        tracing::info!("Failed log-in attempt for user {}", user.id);
        return Err(Error::InvalidCredentials);
    }

    let jar = set_auth_cookie(jar, user.id, state.cookie_duration)?;

    Ok((jar, Json(json!({ "user": UserProfile::from(user) }))).into_response())
}
