//! Code for creating the user table and fetching users from the database.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, auth::PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The unique name the user logs in with.
    pub username: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// When the user registered.
    pub created_at: OffsetDateTime,
    /// An optional avatar image, usually a data URL.
    pub avatar: Option<String>,
}

/// The public view of a [User] that is safe to send to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The unique name the user logs in with.
    pub username: String,
    /// When the user registered.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// An optional avatar image, usually a data URL.
    pub avatar: Option<String>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
            avatar: user.avatar,
        }
    }
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                created_at TEXT NOT NULL,
                avatar TEXT
                )",
        (),
    )?;

    Ok(())
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_id = row.get(0)?;
    let username = row.get(1)?;
    let raw_password_hash: String = row.get(2)?;
    let created_at = row.get(3)?;
    let avatar = row.get(4)?;

    Ok(User {
        id: UserID::new(raw_id),
        username,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        created_at,
        avatar,
    })
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns a:
/// - [Error::DuplicateUsername] if `username` is already registered,
/// - or [Error::SqlError] if some other SQL related error occurred.
pub fn create_user(
    username: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection
        .prepare(
            "INSERT INTO user (username, password, created_at, avatar) VALUES (?1, ?2, ?3, NULL)
             RETURNING id, username, password, created_at, avatar",
        )?
        .query_row(
            (username, password_hash.as_ref(), created_at),
            map_user_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateUsername(username.to_owned()),
            error => error.into(),
        })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, username, password, created_at, avatar FROM user WHERE id = :id")?
        .query_row(&[(":id", &user_id.as_i64())], map_user_row)
        .map_err(|error| error.into())
}

/// Get the user from the database registered under `username`.
///
/// # Errors
///
/// This function will return an error if:
/// - `username` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_username(username: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(
            "SELECT id, username, password, created_at, avatar FROM user WHERE username = :username",
        )?
        .query_row(&[(":username", &username)], map_user_row)
        .map_err(|error| error.into())
}

/// Replace the avatar of `user_id`. Pass `None` to clear it.
///
/// # Errors
///
/// Returns an [Error::NotFound] if `user_id` does not belong to a registered user.
pub fn update_avatar(
    user_id: UserID,
    avatar: Option<&str>,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET avatar = ?1 WHERE id = ?2",
        (avatar, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Replace the password hash of `user_id`.
///
/// # Errors
///
/// Returns an [Error::NotFound] if `user_id` does not belong to a registered user.
pub fn update_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.as_ref(), user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::auth::{
        PasswordHash,
        user::{
            UserID, create_user, get_user_by_id, get_user_by_username, update_avatar,
            update_password,
        },
    };

    use super::{Error, create_user_table};

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_user_table(&conn).expect("Could not create user table");

        conn
    }

    #[test]
    fn insert_user_succeeds() {
        let db_connection = get_db_connection();
        let password_hash = PasswordHash::new_unchecked("hunter2");

        let inserted_user = create_user("alice", password_hash.clone(), &db_connection).unwrap();

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.username, "alice");
        assert_eq!(inserted_user.password_hash, password_hash);
        assert_eq!(inserted_user.avatar, None);
    }

    #[test]
    fn insert_duplicate_username_fails() {
        let db_connection = get_db_connection();
        create_user("alice", PasswordHash::new_unchecked("a"), &db_connection).unwrap();

        let result = create_user("alice", PasswordHash::new_unchecked("b"), &db_connection);

        assert_eq!(result, Err(Error::DuplicateUsername("alice".to_owned())));
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let db_connection = get_db_connection();

        let id = UserID::new(42);

        assert_eq!(get_user_by_id(id, &db_connection), Err(Error::NotFound));
    }

    #[test]
    fn get_user_succeeds_with_existing_id_and_username() {
        let db_connection = get_db_connection();
        let test_user = create_user(
            "bob",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        assert_eq!(get_user_by_id(test_user.id, &db_connection), Ok(test_user.clone()));
        assert_eq!(get_user_by_username("bob", &db_connection), Ok(test_user));
        assert_eq!(
            get_user_by_username("carol", &db_connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn avatar_can_be_set_and_cleared() {
        let db_connection = get_db_connection();
        let user = create_user("bob", PasswordHash::new_unchecked("x"), &db_connection).unwrap();

        update_avatar(user.id, Some("data:image/png;base64,AAAA"), &db_connection).unwrap();
        let with_avatar = get_user_by_id(user.id, &db_connection).unwrap();
        update_avatar(user.id, None, &db_connection).unwrap();
        let without_avatar = get_user_by_id(user.id, &db_connection).unwrap();

        assert_eq!(
            with_avatar.avatar.as_deref(),
            Some("data:image/png;base64,AAAA")
        );
        assert_eq!(without_avatar.avatar, None);
    }

    #[test]
    fn update_password_of_missing_user_fails() {
        let db_connection = get_db_connection();

        let result = update_password(
            UserID::new(7),
            &PasswordHash::new_unchecked("x"),
            &db_connection,
        );

        assert_eq!(result, Err(Error::NotFound));
    }
}
