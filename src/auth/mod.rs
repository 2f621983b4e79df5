//! User accounts and cookie based authentication.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod profile;
mod register;
mod token;
mod user;

pub use cookie::DEFAULT_COOKIE_DURATION;
pub(crate) use cookie::{invalidate_auth_cookie, set_auth_cookie};
pub use log_in::post_log_in;
pub use log_out::post_log_out;
pub use middleware::{AuthState, auth_guard};
pub use password::{PasswordHash, ValidatedPassword};
pub use profile::{get_me, put_avatar};
pub use register::register_user;
pub use user::{
    User, UserID, UserProfile, create_user, create_user_table, get_user_by_id,
    get_user_by_username, update_avatar, update_password,
};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
