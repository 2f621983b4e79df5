//! Routes for reading and updating the logged in user's profile.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    auth::{UserID, UserProfile, get_user_by_id, update_avatar},
};

/// The longest avatar string that will be stored, in characters.
pub const MAX_AVATAR_LENGTH: usize = 300_000;

/// The state needed for the profile routes.
#[derive(Debug, Clone)]
pub struct ProfileState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProfileState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Return the profile of the logged in user.
pub async fn get_me(
    State(state): State<ProfileState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Value>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    // The token outlived the account, e.g. after a restore into a fresh database.
    let user = get_user_by_id(user_id, &connection).map_err(|error| match error {
        Error::NotFound => Error::InvalidToken,
        error => error,
    })?;

    Ok(Json(json!({ "user": UserProfile::from(user) })))
}

/// The body of an avatar update. `null` or an empty string clears the avatar.
#[derive(Debug, Deserialize)]
pub struct AvatarForm {
    #[serde(default)]
    avatar: Option<String>,
}

/// Set or clear the avatar of the logged in user.
pub async fn put_avatar(
    State(state): State<ProfileState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<AvatarForm>,
) -> Result<Json<Value>, Error> {
    let avatar = form.avatar.filter(|avatar| !avatar.is_empty());

    if avatar
        .as_ref()
        .is_some_and(|avatar| avatar.chars().count() > MAX_AVATAR_LENGTH)
    {
        return Err(Error::AvatarTooLarge);
    }

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    update_avatar(user_id, avatar.as_deref(), &connection)?;

    Ok(Json(json!({ "avatar": avatar })))
}
