use axum::{Json, response::IntoResponse};
use axum_extra::extract::PrivateCookieJar;
use serde_json::json;

use crate::auth::invalidate_auth_cookie;

/// Invalidate the auth cookie. Succeeds whether or not the client was logged in.
pub async fn post_log_out(jar: PrivateCookieJar) -> impl IntoResponse {
    (invalidate_auth_cookie(jar), Json(json!({ "success": true })))
}

#[cfg(test)]
mod log_out_tests {
    use axum::{Router, routing::post};
    use axum_extra::extract::cookie::Key;
    use axum_test::TestServer;
    use time::Duration;

    use crate::{app_state::create_cookie_key, auth::cookie::COOKIE_TOKEN, endpoints};

    use super::post_log_out;

    #[tokio::test]
    async fn log_out_expires_cookie() {
        let key: Key = create_cookie_key("foobar");
        let app = Router::new()
            .route(endpoints::LOG_OUT, post(post_log_out))
            .with_state(key);
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server.post(endpoints::LOG_OUT).await;

        response.assert_status_ok();
        let cookie = response.cookie(COOKIE_TOKEN);
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
