//! The route for registering new users.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use serde_json::json;

use crate::{
    Error,
    auth::{
        PasswordHash, UserProfile, ValidatedPassword, create_user,
        log_in::{Credentials, LoginState},
        set_auth_cookie,
    },
};

/// The minimum number of characters in a username.
pub const MIN_USERNAME_LENGTH: usize = 3;

/// Create a new user, log them in and return their profile with a 201 status.
///
/// # Errors
///
/// Returns a 400 error if the username or password is too short, or the username is taken.
pub async fn register_user(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<Response, Error> {
    if credentials.username.chars().count() < MIN_USERNAME_LENGTH {
        return Err(Error::UsernameTooShort(MIN_USERNAME_LENGTH));
    }

    let password = ValidatedPassword::new(&credentials.password)?;
    let password_hash = PasswordHash::new(password, PasswordHash::DEFAULT_COST)?;

    let user = {
        let connection = state.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })?;

        create_user(&credentials.username, password_hash, &connection)?
    };

    tracing::info!("Registered user {} ({})", user.username, user.id);

    let jar = set_auth_cookie(jar, user.id, state.cookie_duration)?;

    Ok((
        StatusCode::CREATED,
        jar,
        Json(json!({ "user": UserProfile::from(user) })),
    )
        .into_response())
}
