pub mod dashboard;
pub mod health;
pub mod root;
pub mod session;
pub mod sign_in;
pub mod sign_up;
pub mod welcome;

pub use self::dashboard::{dashboard, sign_out};
pub use self::health::health;
pub use self::root::root;
pub use self::session::session;
pub use self::sign_in::{sign_in, sign_in_page, sign_in_social};
pub use self::sign_up::{sign_up, sign_up_page};
pub use self::welcome::welcome;

// common functions for the handlers
use crate::{
    api::AppConfig,
    views::{toast::clear_flash_cookie, Toast},
};
use axum::{
    http::{header::SET_COOKIE, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::error;

pub(crate) const SIGNED_IN: &str = "Signed in successfully!";
pub(crate) const ACCOUNT_CREATED: &str = "Account created successfully!";
pub(crate) const SIGNED_OUT: &str = "Signed out successfully";
pub(crate) const FAILED_SIGN_IN: &str = "Failed to sign in";
pub(crate) const FAILED_SIGN_UP: &str = "Failed to create account";
pub(crate) const FAILED_GITHUB: &str = "Failed to sign in with GitHub";
pub(crate) const FAILED_SIGN_OUT: &str = "Failed to sign out";

fn cookie_headers(cookies: Vec<HeaderValue>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for cookie in cookies {
        headers.append(SET_COOKIE, cookie);
    }
    headers
}

/// HTML page with the given `Set-Cookie` values.
pub(crate) fn page(status: StatusCode, cookies: Vec<HeaderValue>, html: String) -> Response {
    (status, cookie_headers(cookies), Html(html)).into_response()
}

/// `303 See Other` after a form post, relaying cookies.
pub(crate) fn see_other(location: &str, cookies: Vec<HeaderValue>) -> Response {
    (cookie_headers(cookies), Redirect::to(location)).into_response()
}

pub(crate) fn render_failed(err: &anyhow::Error) -> Response {
    error!("Failed to render page: {err:#}");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

/// Flash cookie for `toast`; logged and skipped if it cannot be encoded.
pub(crate) fn flash(config: &AppConfig, toast: &Toast) -> Option<HeaderValue> {
    toast
        .flash_cookie(config.cookie_secure())
        .map_err(|err| error!("Failed to encode toast cookie: {err}"))
        .ok()
}

/// Pending toast from the request, plus the cookie that consumes it.
pub(crate) fn take_toast(headers: &HeaderMap, config: &AppConfig) -> (Option<Toast>, Vec<HeaderValue>) {
    let toast = Toast::from_headers(headers);
    let mut cookies = Vec::new();
    if toast.is_some() {
        if let Ok(cookie) = clear_flash_cookie(config.cookie_secure()) {
            cookies.push(cookie);
        }
    }
    (toast, cookies)
}
